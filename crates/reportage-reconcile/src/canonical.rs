//! Project identity canonicalization.
//!
//! Each document names projects independently, so the same project shows up
//! as `"End-user Portal"`, `"enduserportal"`, or `"End User Portal"` in
//! different periods. Identity matching runs on a canonical key: the name
//! lowercased with whitespace and hyphens stripped (no other punctuation
//! normalization).
//!
//! Display-name resolution is an ordered rule list: hard-coded overrides are
//! checked first, then first-seen-wins in ascending document-timestamp
//! order. Additional overrides are additive table entries, not new branches.

use reportage_model::{Document, ProjectRecord};
use std::collections::BTreeMap;

/// Display-name overrides, checked before the first-seen fallback.
const DISPLAY_OVERRIDES: &[(&str, &str)] = &[("enduserportal", "End-user Portal")];

/// Normalize a free-text project name into a stable lookup key.
///
/// Lowercases and strips whitespace and hyphens. Pure and total: every
/// string input yields a key (possibly empty).
pub fn canonical_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

fn display_override(key: &str) -> Option<&'static str> {
    DISPLAY_OVERRIDES
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, display)| *display)
}

/// Build the canonical-key → display-name mapping for the collection.
///
/// Rebuilt in full from the current snapshot on every change, never merged
/// incrementally. Documents are scanned in ascending `(timestamp, id)`
/// order, so the earliest document's spelling wins regardless of storage
/// order; override rules beat first-seen.
pub fn project_mapping(documents: &[Document]) -> BTreeMap<String, String> {
    let mut mapping = BTreeMap::new();

    for doc in crate::chronological(documents) {
        let Some(dev) = &doc.payload.categories.new_development else {
            continue;
        };
        for project in &dev.projects {
            let key = canonical_key(&project.name);
            if let Some(display) = display_override(&key) {
                mapping.insert(key, display.to_string());
            } else {
                mapping.entry(key).or_insert_with(|| project.name.clone());
            }
        }
    }

    tracing::debug!(projects = mapping.len(), "rebuilt project identity mapping");
    mapping
}

/// All known project display names, sorted alphabetically.
pub fn project_names(documents: &[Document]) -> Vec<String> {
    let mut names: Vec<String> = project_mapping(documents).into_values().collect();
    names.sort();
    names
}

/// The project record in `document` whose canonical key matches, if any.
pub fn project_record<'a>(document: &'a Document, project_key: &str) -> Option<&'a ProjectRecord> {
    document
        .payload
        .categories
        .new_development
        .as_ref()?
        .projects
        .iter()
        .find(|project| canonical_key(&project.name) == project_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{document, with_project};
    use proptest::prelude::*;

    #[test]
    fn key_is_case_space_and_hyphen_insensitive() {
        assert_eq!(canonical_key("End-User Portal"), "enduserportal");
        assert_eq!(canonical_key("enduserportal"), "enduserportal");
        assert_eq!(canonical_key("End user portal"), "enduserportal");
        assert_eq!(canonical_key("MOBILE APP"), "mobileapp");
    }

    #[test]
    fn key_keeps_other_punctuation() {
        assert_eq!(canonical_key("Portal (v2)"), "portal(v2)");
    }

    #[test]
    fn earliest_spelling_wins_regardless_of_slice_order() {
        let newer = with_project(document("b", 200), "Mobile App", vec![]);
        let older = with_project(document("a", 100), "mobile-app", vec![]);

        // Newer document stored first; the mapping still prefers the
        // earlier timestamp's spelling.
        let mapping = project_mapping(&[newer, older]);
        assert_eq!(mapping.get("mobileapp").map(String::as_str), Some("mobile-app"));
    }

    #[test]
    fn override_beats_first_seen() {
        let doc = with_project(document("a", 100), "End User Portal", vec![]);
        let mapping = project_mapping(&[doc]);
        assert_eq!(
            mapping.get("enduserportal").map(String::as_str),
            Some("End-user Portal")
        );
    }

    #[test]
    fn mapping_reflects_exactly_the_current_collection() {
        let one = with_project(document("a", 100), "Intranet", vec![]);
        let two = with_project(document("b", 200), "Mobile App", vec![]);

        let full = project_mapping(&[one.clone(), two]);
        assert_eq!(full.len(), 2);

        // Rebuild from a shrunk collection drops the removed project.
        let shrunk = project_mapping(&[one]);
        assert_eq!(shrunk.len(), 1);
        assert!(shrunk.contains_key("intranet"));
    }

    #[test]
    fn names_are_sorted_alphabetically() {
        let docs = vec![
            with_project(document("a", 100), "Zeta", vec![]),
            with_project(document("b", 200), "Alpha", vec![]),
        ];
        assert_eq!(project_names(&docs), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn record_lookup_matches_by_canonical_key() {
        let doc = with_project(document("a", 100), "End-user Portal", vec![]);
        assert!(project_record(&doc, "enduserportal").is_some());
        assert!(project_record(&doc, "mobileapp").is_none());
    }

    proptest! {
        #[test]
        fn key_is_idempotent(name in ".*") {
            let once = canonical_key(&name);
            prop_assert_eq!(canonical_key(&once), once.clone());
        }

        #[test]
        fn key_has_no_spaces_or_hyphens(name in ".*") {
            let key = canonical_key(&name);
            prop_assert!(!key.chars().any(|c| c.is_whitespace() || c == '-'));
        }
    }
}
