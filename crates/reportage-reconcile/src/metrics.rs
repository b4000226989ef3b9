//! Operational metric classification and aggregation.
//!
//! Support-operations metrics arrive with free-text labels that drift week
//! to week ("Customer support" one period, "Emails Responded" the next).
//! Classification maps each label into a fixed set of six job categories by
//! keyword matching, then the aggregator sums per-period contributions into
//! cumulative totals and an aligned history series per category.
//!
//! The match rule is deliberately permissive: a label matches a category
//! when it contains any configured keyword OR the first word of the
//! category title. Categories are not mutually exclusive; one metric may
//! feed several.

use reportage_model::{datekey, Document};
use serde::{Deserialize, Serialize};

/// One operational job category: title, subtitle, icon hint, and the
/// lowercase keyword substrings that capture its label variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCategory {
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub keywords: Vec<String>,
}

impl JobCategory {
    fn new(title: &str, subtitle: &str, icon: &str, keywords: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            icon: icon.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Whether an already-lowercased label belongs to this category.
    fn matches_folded(&self, folded_label: &str) -> bool {
        let title_head = self
            .title
            .to_lowercase()
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_string();

        self.keywords
            .iter()
            .any(|keyword| folded_label.contains(keyword.as_str()))
            || folded_label.contains(&title_head)
    }

    /// Whether a raw metric label belongs to this category.
    pub fn matches_label(&self, label: &str) -> bool {
        self.matches_folded(&label.to_lowercase())
    }
}

/// The classification table: configuration data, not conditionals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    categories: Vec<JobCategory>,
}

impl CategoryTable {
    /// The six fixed operational job categories.
    pub fn standard() -> Self {
        Self {
            categories: vec![
                JobCategory::new(
                    "Customer card created & sent",
                    "Loyalty & Engagement",
                    "user-plus",
                    &["customer card", "cards email"],
                ),
                JobCategory::new(
                    "Mail sent",
                    "Outreach Campaign",
                    "mail",
                    &["mail sent", "sent mail", "emails sent"],
                ),
                JobCategory::new(
                    "Customer support",
                    "Support Analysis",
                    "headset",
                    &["customer support", "emails responded", "tickets", "resolution"],
                ),
                JobCategory::new(
                    "ICT news card created",
                    "News Production",
                    "newspaper",
                    &["ict news", "create card ict news", "news card", "publications"],
                ),
                JobCategory::new(
                    "Demo sites created",
                    "Sales Enablement",
                    "globe",
                    &["demo sites", "demo portals", "demo plugit"],
                ),
                JobCategory::new(
                    "Card cover created",
                    "Creative Assets",
                    "image",
                    &["card cover", "covers", "design tasks", "design work"],
                ),
            ],
        }
    }

    pub fn categories(&self) -> &[JobCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Classify a metric label: indices of every matching category.
///
/// Pure and total; may return zero, one, or several indices.
pub fn classify(label: &str, table: &CategoryTable) -> Vec<usize> {
    let folded = label.to_lowercase();
    table
        .categories
        .iter()
        .enumerate()
        .filter(|(_, job)| job.matches_folded(&folded))
        .map(|(idx, _)| idx)
        .collect()
}

/// One period's aggregated contribution to a category's time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Period label: the first component of the document's week range, or
    /// the document display name when the range is absent.
    pub period: String,
    pub count: u64,
    /// Reserved trend slot, currently always 0.
    pub trend: i64,
}

/// A renderable stat card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub title: String,
    pub subtitle: String,
    pub value: String,
    pub trend: String,
    pub icon: String,
    pub color: String,
}

/// Cumulative totals and per-period histories for every category.
///
/// `totals`, `histories`, and `cards` are parallel to the table's category
/// order; every history has exactly one point per contributing document, so
/// all six series share the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportAggregate {
    pub totals: Vec<u64>,
    pub histories: Vec<Vec<HistoryPoint>>,
    pub cards: Vec<StatCard>,
}

impl SupportAggregate {
    /// The history series feeding the chart for the selected card.
    pub fn history_for(&self, card: usize) -> Option<&[HistoryPoint]> {
        self.histories.get(card).map(Vec::as_slice)
    }
}

/// Aggregate support-operations metrics across the whole collection.
///
/// Documents are processed in ascending `(timestamp, id)` order: history
/// order is the period order, unlike release aggregation. A document
/// without a support-operations block is skipped entirely; a document with
/// one contributes exactly one history point per category, zero or not, so
/// histories stay aligned in length.
pub fn aggregate_support_metrics(documents: &[Document], table: &CategoryTable) -> SupportAggregate {
    let mut totals = vec![0u64; table.len()];
    let mut histories: Vec<Vec<HistoryPoint>> = vec![Vec::new(); table.len()];

    for doc in crate::chronological(documents) {
        let Some(ops) = &doc.payload.categories.support_marketing else {
            continue;
        };

        let period = datekey::week_range_start(&doc.payload.weekly_highlight.week_range)
            .unwrap_or(&doc.name);

        for (idx, job) in table.categories.iter().enumerate() {
            let contribution: u64 = ops
                .metrics
                .iter()
                .filter(|metric| job.matches_label(&metric.label))
                .map(|metric| datekey::extract_count(&metric.value))
                .sum();

            totals[idx] += contribution;
            histories[idx].push(HistoryPoint {
                period: period.to_string(),
                count: contribution,
                trend: 0,
            });
        }
    }

    let weeks = documents.len();
    let cards = table
        .categories
        .iter()
        .zip(&totals)
        .map(|(job, &total)| StatCard {
            title: job.title.clone(),
            subtitle: job.subtitle.clone(),
            value: if total > 0 {
                format!("{total} Total")
            } else {
                "0".to_string()
            },
            trend: if weeks > 0 {
                format!("Aggregated across {weeks} weeks")
            } else {
                "Awaiting Data".to_string()
            },
            icon: job.icon.clone(),
            color: "blue".to_string(),
        })
        .collect();

    tracing::debug!(documents = weeks, "aggregated support metrics");

    SupportAggregate {
        totals,
        histories,
        cards,
    }
}
