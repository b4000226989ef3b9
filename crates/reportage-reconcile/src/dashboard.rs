//! Active-view selection.
//!
//! The only stateful piece of the pipeline: which category is open, which
//! project is focused under the project-scoped category, which of the six
//! job-category cards feeds the chart, and which report backs the
//! per-report summary/blocker panels. Everything else is re-derived from
//! the document snapshot on demand.

use reportage_model::{DashboardCategory, Document, DocumentId, LabeledMetric};
use serde::Serialize;

use crate::canonical::{canonical_key, project_names, project_record};
use crate::highlights::{collect_highlights, sort_highlights, SortedHighlights};
use crate::metrics::{aggregate_support_metrics, CategoryTable, StatCard};
use crate::releases::{aggregate_releases, release_timeline, story_point_total, TimelinePoint};

const SUPPORT_SUMMARY_PROMPT: &str = "Select a report for AI analysis summary.";
const EMPTY_COLLECTION_PROMPT: &str = "Select a report to see categorized AI insights.";

/// Selection state for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    category: DashboardCategory,
    /// Focused project display name; meaningful under `NewDevelopment`.
    project: Option<String>,
    /// Which job-category card feeds the chart under `SupportMarketing`.
    /// Other categories treat their first card as implicitly active.
    support_card: usize,
    /// Active report backing the per-report summary/blocker panels.
    report: Option<DocumentId>,
}

impl DashboardState {
    /// Fresh state over a snapshot: highlight archive open, newest report
    /// active, alphabetically-first project focused.
    pub fn new(documents: &[Document]) -> Self {
        let mut state = Self {
            category: DashboardCategory::WeeklyHighlight,
            project: None,
            support_card: 0,
            report: None,
        };
        state.ensure_defaults(documents);
        state
    }

    /// Selecting a category is unconditional.
    pub fn select_category(&mut self, category: DashboardCategory) {
        self.category = category;
    }

    pub fn select_project(&mut self, name: impl Into<String>) {
        self.project = Some(name.into());
    }

    pub fn select_report(&mut self, id: impl Into<DocumentId>) {
        self.report = Some(id.into());
    }

    /// Select one of the job-category cards, clamped to the table.
    pub fn select_support_card(&mut self, index: usize, table: &CategoryTable) {
        self.support_card = index.min(table.len().saturating_sub(1));
    }

    /// Fill unset selections from the snapshot: the newest report and the
    /// alphabetically-first available project. Call after every collection
    /// change; existing selections are kept.
    pub fn ensure_defaults(&mut self, documents: &[Document]) {
        if self.report.is_none() {
            self.report = documents
                .iter()
                .max_by(|a, b| {
                    a.timestamp
                        .cmp(&b.timestamp)
                        .then_with(|| a.id.cmp(&b.id))
                })
                .map(|doc| doc.id.clone());
        }
        if self.project.is_none() {
            self.project = project_names(documents).into_iter().next();
        }
    }

    pub fn category(&self) -> DashboardCategory {
        self.category
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn support_card(&self) -> usize {
        self.support_card
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    fn active_report<'a>(&self, documents: &'a [Document]) -> Option<&'a Document> {
        let id = self.report.as_deref()?;
        documents.iter().find(|doc| doc.id == id)
    }

    /// Compose the view for the active category.
    pub fn view(&self, documents: &[Document], table: &CategoryTable) -> DashboardView {
        match self.category {
            DashboardCategory::WeeklyHighlight => {
                DashboardView::Highlights(sort_highlights(collect_highlights(documents)))
            }
            DashboardCategory::NewDevelopment => {
                DashboardView::Stats(self.development_content(documents))
            }
            DashboardCategory::SupportMarketing => {
                DashboardView::Stats(self.support_content(documents, table))
            }
        }
    }

    fn support_content(&self, documents: &[Document], table: &CategoryTable) -> DashboardContent {
        let aggregate = aggregate_support_metrics(documents, table);
        let (summary, blockers) = match self
            .active_report(documents)
            .and_then(|doc| doc.payload.categories.support_marketing.as_ref())
        {
            Some(ops) => (ops.summary.clone(), ops.blockers.clone()),
            None => (SUPPORT_SUMMARY_PROMPT.to_string(), Vec::new()),
        };

        DashboardContent {
            stats: aggregate.cards,
            summary,
            blockers,
            project_panel: None,
        }
    }

    fn development_content(&self, documents: &[Document]) -> DashboardContent {
        let Some(report) = self.active_report(documents) else {
            return DashboardContent {
                stats: placeholder_stats(),
                summary: EMPTY_COLLECTION_PROMPT.to_string(),
                blockers: Vec::new(),
                project_panel: None,
            };
        };

        let panel = self.project.as_ref().map(|name| {
            let key = canonical_key(name);
            let releases = aggregate_releases(documents, &key);
            ProjectPanel {
                project: name.clone(),
                project_names: project_names(documents),
                total_stories: story_point_total(&releases),
                timeline: release_timeline(&releases),
            }
        });

        let record = self
            .project
            .as_ref()
            .and_then(|name| project_record(report, &canonical_key(name)));

        DashboardContent {
            stats: record
                .map(|r| r.metrics.iter().map(metric_card).collect())
                .unwrap_or_default(),
            summary: record.map(|r| r.summary.clone()).unwrap_or_default(),
            blockers: record.map(|r| r.blockers.clone()).unwrap_or_default(),
            project_panel: panel,
        }
    }
}

/// The composed view for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardView {
    Highlights(SortedHighlights),
    Stats(DashboardContent),
}

/// Stats, summary, and blockers for the active category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardContent {
    pub stats: Vec<StatCard>,
    pub summary: String,
    pub blockers: Vec<String>,
    /// Present only under the project-scoped category.
    pub project_panel: Option<ProjectPanel>,
}

/// The focused project's cross-period panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPanel {
    pub project: String,
    /// Every known project, alphabetical, for the project switcher.
    pub project_names: Vec<String>,
    /// Story points summed over the deduplicated release list.
    pub total_stories: u32,
    pub timeline: Vec<TimelinePoint>,
}

fn metric_card(metric: &LabeledMetric) -> StatCard {
    StatCard {
        title: metric.label.clone(),
        subtitle: "Latest Report".to_string(),
        value: metric.value.clone(),
        trend: metric.trend.clone(),
        icon: "target".to_string(),
        color: "blue".to_string(),
    }
}

/// The zero-valued placeholder card set shown before any report exists.
pub fn placeholder_stats() -> Vec<StatCard> {
    [
        ("Perfect Stack", "(Current)", "target", "emerald"),
        ("Total Cards Created", "Cumulative", "file-text", "blue"),
        ("Total Tasks Listed", "Backlog", "list-todo", "indigo"),
    ]
    .into_iter()
    .map(|(title, subtitle, icon, color)| StatCard {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        value: "0".to_string(),
        trend: "Awaiting Report".to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{document, release, with_project, with_support_metrics, with_week_range};

    fn table() -> CategoryTable {
        CategoryTable::standard()
    }

    #[test]
    fn defaults_pick_newest_report_and_first_project() {
        let docs = vec![
            with_project(document("a", 100), "Zeta", vec![]),
            with_project(document("b", 200), "Alpha", vec![]),
        ];

        let state = DashboardState::new(&docs);
        assert_eq!(state.report(), Some("b"));
        assert_eq!(state.project(), Some("Alpha"));
        assert_eq!(state.category(), DashboardCategory::WeeklyHighlight);
    }

    #[test]
    fn existing_selections_survive_refresh() {
        let docs = vec![
            with_project(document("a", 100), "Zeta", vec![]),
            with_project(document("b", 200), "Alpha", vec![]),
        ];

        let mut state = DashboardState::new(&docs);
        state.select_project("Zeta");
        state.select_report("a");
        state.ensure_defaults(&docs);

        assert_eq!(state.project(), Some("Zeta"));
        assert_eq!(state.report(), Some("a"));
    }

    #[test]
    fn support_card_selection_clamps_to_table() {
        let mut state = DashboardState::new(&[]);
        state.select_support_card(3, &table());
        assert_eq!(state.support_card(), 3);
        state.select_support_card(99, &table());
        assert_eq!(state.support_card(), 5);
    }

    #[test]
    fn highlight_view_is_the_sorted_archive() {
        let docs = vec![
            with_week_range(document("a", 100), "22 Dec - 26 Dec 2025"),
            with_week_range(document("b", 200), "1 Dec - 5 Dec 2025"),
        ];

        let state = DashboardState::new(&docs);
        match state.view(&docs, &table()) {
            DashboardView::Highlights(sorted) => {
                assert_eq!(sorted.latest_id.as_deref(), Some("a"));
            }
            DashboardView::Stats(_) => panic!("expected highlight archive"),
        }
    }

    #[test]
    fn support_view_uses_aggregate_cards_and_report_summary() {
        let docs = vec![with_support_metrics(
            with_week_range(document("a", 100), "1 Dec - 5 Dec 2025"),
            vec![("Customer support", "9")],
        )];

        let mut state = DashboardState::new(&docs);
        state.select_category(DashboardCategory::SupportMarketing);

        match state.view(&docs, &table()) {
            DashboardView::Stats(content) => {
                assert_eq!(content.stats.len(), 6);
                assert_eq!(content.stats[2].value, "9 Total");
                assert_eq!(content.summary, "support summary");
            }
            DashboardView::Highlights(_) => panic!("expected stats"),
        }
    }

    #[test]
    fn support_view_without_report_prompts_for_one() {
        let mut state = DashboardState::new(&[]);
        state.select_category(DashboardCategory::SupportMarketing);

        match state.view(&[], &table()) {
            DashboardView::Stats(content) => {
                assert_eq!(content.summary, SUPPORT_SUMMARY_PROMPT);
                assert_eq!(content.stats.len(), 6);
                assert!(content.stats.iter().all(|card| card.value == "0"));
            }
            DashboardView::Highlights(_) => panic!("expected stats"),
        }
    }

    #[test]
    fn development_view_sums_stories_across_periods() {
        let docs = vec![
            with_project(
                document("a", 100),
                "End-user Portal",
                vec![release("1.0", "2025-01-01", Some(4))],
            ),
            with_project(
                document("b", 200),
                "End User Portal",
                vec![
                    // Repeat of 1.0 plus a new cut.
                    release("1.0", "2025-01-01", Some(4)),
                    release("1.1", "2025-01-08", Some(3)),
                ],
            ),
        ];

        let mut state = DashboardState::new(&docs);
        state.select_category(DashboardCategory::NewDevelopment);

        match state.view(&docs, &table()) {
            DashboardView::Stats(content) => {
                let panel = content.project_panel.expect("project panel");
                assert_eq!(panel.project, "End-user Portal");
                assert_eq!(panel.total_stories, 7);
                assert_eq!(panel.timeline.len(), 2);
                assert_eq!(content.summary, "End User Portal status");
            }
            DashboardView::Highlights(_) => panic!("expected stats"),
        }
    }

    #[test]
    fn empty_collection_yields_placeholders_not_errors() {
        let mut state = DashboardState::new(&[]);
        state.select_category(DashboardCategory::NewDevelopment);

        match state.view(&[], &table()) {
            DashboardView::Stats(content) => {
                assert_eq!(content.stats.len(), 3);
                assert!(content.stats.iter().all(|card| card.value == "0"));
                assert_eq!(content.summary, EMPTY_COLLECTION_PROMPT);
                assert!(content.project_panel.is_none());
            }
            DashboardView::Highlights(_) => panic!("expected stats"),
        }
    }
}
