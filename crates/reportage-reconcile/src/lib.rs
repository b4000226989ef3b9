//! Reportage reconciliation core
//!
//! Reconciles an in-memory collection of independently-extracted weekly
//! report documents into stable, cross-period views:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     RECONCILIATION PIPELINE                         │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │   [Document] snapshot (immutable slice)                             │
//! │        │                                                            │
//! │        ├──► canonical ──► project identity mapping                  │
//! │        │                  (key = lowercased, space/hyphen-free)     │
//! │        │                                                            │
//! │        ├──► releases ───► deduplicated release timeline             │
//! │        │                  (natural key = version + date)            │
//! │        │                                                            │
//! │        ├──► metrics ────► six-category totals + history series      │
//! │        │                  (keyword classification, per-period sums) │
//! │        │                                                            │
//! │        ├──► highlights ─► newest-first archive + latest marker      │
//! │        │                                                            │
//! │        └──► dashboard ──► active-view selection over the above      │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure, synchronous function over `&[Document]`.
//! Derived views hold no independent identity: they are recomputed from
//! scratch on every collection change, so there is no cache to invalidate.
//! Calling any aggregation twice on the same snapshot yields structurally
//! identical output.
//!
//! No function in this crate fails. Missing nested blocks are empty values,
//! unparseable text resolves to explicit fallbacks (see
//! `reportage_model::datekey`), and the empty collection produces
//! zero-valued placeholder views.

pub mod canonical;
pub mod dashboard;
pub mod highlights;
pub mod metrics;
pub mod releases;

use reportage_model::Document;

pub use canonical::{canonical_key, project_mapping, project_names, project_record};
pub use dashboard::{
    placeholder_stats, DashboardContent, DashboardState, DashboardView, ProjectPanel,
};
pub use highlights::{collect_highlights, sort_highlights, SortedHighlights};
pub use metrics::{
    aggregate_support_metrics, classify, CategoryTable, HistoryPoint, JobCategory, StatCard,
    SupportAggregate,
};
pub use releases::{aggregate_releases, release_timeline, story_point_total, TimelinePoint};

/// Documents in ascending `(timestamp, id)` order.
///
/// Storage order is incidental; every consumer that needs chronology sorts
/// explicitly so the earliest document wins deterministically.
pub(crate) fn chronological(documents: &[Document]) -> Vec<&Document> {
    let mut docs: Vec<&Document> = documents.iter().collect();
    docs.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
    docs
}

#[cfg(test)]
pub(crate) mod testutil {
    use reportage_model::{
        DevelopmentBlock, Document, HighlightBlock, LabeledMetric, OperationsBlock, ProjectRecord,
        ReleaseFact, ReportPayload,
    };

    pub fn document(id: &str, timestamp: i64) -> Document {
        Document {
            id: id.to_string(),
            name: format!("{id}.pdf"),
            timestamp,
            payload: ReportPayload::default(),
        }
    }

    pub fn with_week_range(mut doc: Document, week_range: &str) -> Document {
        doc.payload.weekly_highlight = HighlightBlock {
            week_range: week_range.to_string(),
            summary: format!("summary for {week_range}"),
            achievements: vec!["achievement".to_string()],
        };
        doc
    }

    pub fn with_project(mut doc: Document, name: &str, releases: Vec<ReleaseFact>) -> Document {
        let record = ProjectRecord {
            name: name.to_string(),
            summary: format!("{name} status"),
            metrics: Vec::new(),
            blockers: Vec::new(),
            releases,
        };
        match &mut doc.payload.categories.new_development {
            Some(dev) => dev.projects.push(record),
            None => {
                doc.payload.categories.new_development = Some(DevelopmentBlock {
                    projects: vec![record],
                })
            }
        }
        doc
    }

    pub fn with_support_metrics(mut doc: Document, metrics: Vec<(&str, &str)>) -> Document {
        doc.payload.categories.support_marketing = Some(OperationsBlock {
            summary: "support summary".to_string(),
            metrics: metrics
                .into_iter()
                .map(|(label, value)| LabeledMetric {
                    label: label.to_string(),
                    value: value.to_string(),
                    trend: String::new(),
                    icon: String::new(),
                })
                .collect(),
            blockers: Vec::new(),
        });
        doc
    }

    pub fn release(version: &str, date: &str, stories: Option<u32>) -> ReleaseFact {
        ReleaseFact {
            date: date.to_string(),
            version: version.to_string(),
            description: format!("release {version}"),
            impact_score: 5.0,
            stories_count: stories,
        }
    }
}
