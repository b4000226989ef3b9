//! Reportage data model
//!
//! Shared types for the weekly-report reconciliation pipeline:
//!
//! - [`Document`]: one reporting period's extracted facts, the unit the
//!   store persists and the reconciliation core consumes
//! - [`ReportPayload`]: the nested payload produced by the document-analysis
//!   boundary (executive summary, weekly highlight, categorized sections)
//! - [`datekey`]: free-text date/number extraction with explicit fallbacks
//!
//! Each document is an isolated, independently-produced extraction: nothing
//! guarantees naming consistency between periods, and any nested block or
//! list may be absent. Every payload field therefore deserializes with a
//! default, so a sparse document yields empty values rather than an error.

pub mod datekey;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a stored document.
pub type DocumentId = String;

/// Errors produced while decoding or interpreting model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to decode report payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown dashboard category: {0:?}")]
    UnknownCategory(String),
}

// ============================================================================
// Document
// ============================================================================

/// One reporting period's extracted facts.
///
/// Documents are immutable once stored; `timestamp` (unix millis) is the
/// period's total order within the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    /// Display name, typically the uploaded file name.
    pub name: String,
    /// Creation time, unix epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub payload: ReportPayload,
}

/// The nested extraction payload for one reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportPayload {
    pub executive_summary: String,
    pub weekly_highlight: HighlightBlock,
    pub categories: CategoryBlock,
}

impl ReportPayload {
    /// Decode a payload from the extraction service's JSON output.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a payload from an already-parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ModelError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// The period's highlight block: label, summary, achievements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightBlock {
    /// Free-text period label, e.g. `"1 Dec - 5 Dec 2025"`.
    pub week_range: String,
    pub summary: String,
    pub achievements: Vec<String>,
}

/// Categorized report sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryBlock {
    pub support_marketing: Option<OperationsBlock>,
    pub new_development: Option<DevelopmentBlock>,
}

/// A support-operations section: summary, labeled metrics, blockers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationsBlock {
    pub summary: String,
    pub metrics: Vec<LabeledMetric>,
    pub blockers: Vec<String>,
}

/// The new-development section: per-project records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevelopmentBlock {
    pub projects: Vec<ProjectRecord>,
}

/// One project's status within a single reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRecord {
    pub name: String,
    pub summary: String,
    pub metrics: Vec<LabeledMetric>,
    pub blockers: Vec<String>,
    pub releases: Vec<ReleaseFact>,
}

/// A dated version/description/story-count record for a project.
///
/// `date` is free text and not guaranteed parseable. Dedup identity across
/// documents is the exact (`version`, `date`) string pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReleaseFact {
    pub date: String,
    pub version: String,
    pub description: String,
    pub impact_score: f64,
    pub stories_count: Option<u32>,
}

/// A free-text labeled metric. No inherent identity; classification into job
/// categories happens per-use by keyword match against `label`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabeledMetric {
    pub label: String,
    /// Free text; may embed non-numeric characters (`"45 cards"`, `"N/A"`).
    pub value: String,
    pub trend: String,
    pub icon: String,
}

// ============================================================================
// Derived highlight entry
// ============================================================================

/// A period's summary and achievement list, derived 1:1 from a [`Document`].
///
/// The archive sort key derives from `week_range` text, not from
/// `timestamp`: period labels do not reliably correlate with insertion
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: DocumentId,
    pub week_range: String,
    pub summary: String,
    pub achievements: Vec<String>,
    pub timestamp: i64,
}

// ============================================================================
// Dashboard categories
// ============================================================================

/// The three fixed dashboard categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashboardCategory {
    WeeklyHighlight,
    NewDevelopment,
    SupportMarketing,
}

impl DashboardCategory {
    pub const ALL: [DashboardCategory; 3] = [
        DashboardCategory::WeeklyHighlight,
        DashboardCategory::NewDevelopment,
        DashboardCategory::SupportMarketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardCategory::WeeklyHighlight => "Weekly Highlight",
            DashboardCategory::NewDevelopment => "New Development",
            DashboardCategory::SupportMarketing => "Support & Marketing",
        }
    }
}

impl fmt::Display for DashboardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardCategory {
    type Err = ModelError;

    /// Accepts the display name or a compact alias (`highlights`,
    /// `development`, `support`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly highlight" | "highlights" | "highlight" => {
                Ok(DashboardCategory::WeeklyHighlight)
            }
            "new development" | "development" | "dev" => Ok(DashboardCategory::NewDevelopment),
            "support & marketing" | "support" | "marketing" => {
                Ok(DashboardCategory::SupportMarketing)
            }
            other => Err(ModelError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_payload_decodes_to_defaults() {
        let payload = ReportPayload::from_json_str(r#"{"executiveSummary":"ok"}"#).unwrap();
        assert_eq!(payload.executive_summary, "ok");
        assert_eq!(payload.weekly_highlight.week_range, "");
        assert!(payload.weekly_highlight.achievements.is_empty());
        assert!(payload.categories.support_marketing.is_none());
        assert!(payload.categories.new_development.is_none());
    }

    #[test]
    fn payload_round_trips_camel_case() {
        let json = r#"{
            "executiveSummary": "week in review",
            "weeklyHighlight": {
                "weekRange": "1 Dec - 5 Dec 2025",
                "summary": "shipped the portal",
                "achievements": ["portal live"]
            },
            "categories": {
                "supportMarketing": {
                    "summary": "steady volume",
                    "metrics": [
                        {"label": "Customer support", "value": "9", "trend": "up", "icon": "headset"}
                    ],
                    "blockers": []
                },
                "newDevelopment": {
                    "projects": [
                        {
                            "name": "End-user Portal",
                            "summary": "beta",
                            "metrics": [],
                            "blockers": [],
                            "releases": [
                                {"date": "2025-12-01", "version": "1.2", "description": "beta cut",
                                 "impactScore": 7.5, "storiesCount": 12}
                            ]
                        }
                    ]
                }
            }
        }"#;
        let payload = ReportPayload::from_json_str(json).unwrap();
        let dev = payload.categories.new_development.as_ref().unwrap();
        assert_eq!(dev.projects[0].releases[0].stories_count, Some(12));

        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back["weeklyHighlight"]["weekRange"], "1 Dec - 5 Dec 2025");
        assert_eq!(
            back["categories"]["newDevelopment"]["projects"][0]["releases"][0]["impactScore"],
            7.5
        );
    }

    #[test]
    fn release_without_story_count_decodes_none() {
        let json = r#"{"date": "TBD", "version": "2.0", "description": "", "impactScore": 3}"#;
        let release: ReleaseFact = serde_json::from_str(json).unwrap();
        assert_eq!(release.stories_count, None);
    }

    #[test]
    fn category_parses_aliases() {
        assert_eq!(
            "support".parse::<DashboardCategory>().unwrap(),
            DashboardCategory::SupportMarketing
        );
        assert_eq!(
            "Weekly Highlight".parse::<DashboardCategory>().unwrap(),
            DashboardCategory::WeeklyHighlight
        );
        assert!("ops".parse::<DashboardCategory>().is_err());
    }
}
