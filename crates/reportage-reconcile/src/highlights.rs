//! The weekly highlight archive.
//!
//! Highlights derive 1:1 from documents, but the archive is ordered by the
//! period-label text, not by insertion time: labels like `"22 Dec - 26 Dec
//! 2025"` carry the real period even when documents were uploaded out of
//! order.

use reportage_model::{datekey, Document, DocumentId, Highlight};
use serde::Serialize;
use std::cmp::Reverse;

/// Derive one highlight entry per document, with field-absence fallbacks.
pub fn collect_highlights(documents: &[Document]) -> Vec<Highlight> {
    documents
        .iter()
        .map(|doc| {
            let block = &doc.payload.weekly_highlight;
            Highlight {
                id: doc.id.clone(),
                week_range: if block.week_range.is_empty() {
                    "Unknown Range".to_string()
                } else {
                    block.week_range.clone()
                },
                summary: if block.summary.is_empty() {
                    "No Summary Available".to_string()
                } else {
                    block.summary.clone()
                },
                achievements: block.achievements.clone(),
                timestamp: doc.timestamp,
            }
        })
        .collect()
}

/// The archive in newest-first order, with the designated latest entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortedHighlights {
    pub entries: Vec<Highlight>,
    /// Id of the newest entry, the default initially-expanded one.
    pub latest_id: Option<DocumentId>,
}

/// Order highlights newest-first by their period-label key.
///
/// The sort is stable: entries with equal keys (including the 0 fallback
/// for labels with nothing extractable) retain their relative input order.
/// Never fails: key extraction is total.
pub fn sort_highlights(mut highlights: Vec<Highlight>) -> SortedHighlights {
    highlights.sort_by_key(|h| Reverse(datekey::week_range_sort_key(&h.week_range)));
    let latest_id = highlights.first().map(|h| h.id.clone());

    SortedHighlights {
        entries: highlights,
        latest_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{document, with_week_range};

    fn highlight(id: &str, week_range: &str) -> Highlight {
        Highlight {
            id: id.to_string(),
            week_range: week_range.to_string(),
            summary: String::new(),
            achievements: Vec::new(),
            timestamp: 0,
        }
    }

    #[test]
    fn collection_fills_absent_fields() {
        let docs = vec![document("a", 100)];
        let highlights = collect_highlights(&docs);
        assert_eq!(highlights[0].week_range, "Unknown Range");
        assert_eq!(highlights[0].summary, "No Summary Available");
        assert!(highlights[0].achievements.is_empty());
    }

    #[test]
    fn newer_period_label_sorts_first() {
        let sorted = sort_highlights(vec![
            highlight("early", "1 Dec - 5 Dec 2025"),
            highlight("late", "22 Dec - 26 Dec 2025"),
        ]);

        assert_eq!(sorted.entries[0].id, "late");
        assert_eq!(sorted.latest_id.as_deref(), Some("late"));
    }

    #[test]
    fn label_order_beats_timestamp_order() {
        // The later-uploaded document covers the earlier week.
        let docs = vec![
            with_week_range(document("upload-1", 100), "22 Dec - 26 Dec 2025"),
            with_week_range(document("upload-2", 200), "1 Dec - 5 Dec 2025"),
        ];

        let sorted = sort_highlights(collect_highlights(&docs));
        assert_eq!(sorted.entries[0].id, "upload-1");
    }

    #[test]
    fn undated_labels_key_zero_and_sort_last() {
        let sorted = sort_highlights(vec![
            highlight("mystery", "no date here"),
            highlight("dated", "1 Dec - 5 Dec 2025"),
        ]);

        assert_eq!(sorted.entries.last().unwrap().id, "mystery");
    }

    #[test]
    fn equal_keys_retain_input_order() {
        let sorted = sort_highlights(vec![
            highlight("first", "???"),
            highlight("second", "???"),
            highlight("third", "???"),
        ]);

        let ids: Vec<&str> = sorted.entries.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_archive_has_no_latest() {
        let sorted = sort_highlights(Vec::new());
        assert!(sorted.entries.is_empty());
        assert_eq!(sorted.latest_id, None);
    }
}
