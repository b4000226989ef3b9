//! Release deduplication and the chart-facing timeline.
//!
//! Reports repeat release facts period over period ("shipped 1.2 last
//! week" shows up again in the next week's recap). The aggregate suppresses
//! repeats with a composite natural key, the exact (`version`, `date`)
//! string pair, scoped to a single aggregation pass.

use chrono::{DateTime, Utc};
use reportage_model::{datekey, Document, ReleaseFact};
use serde::Serialize;
use std::collections::HashSet;

use crate::canonical::project_record;

/// Merge one project's release facts across all documents.
///
/// Documents are visited in the order given; within that order the first
/// occurrence of each (`version`, `date`) pair is kept and later repeats
/// are dropped. The result preserves first-seen order and is NOT re-sorted
/// by date; [`release_timeline`] does that for charting. Documents that
/// do not mention the project contribute nothing.
pub fn aggregate_releases(documents: &[Document], project_key: &str) -> Vec<ReleaseFact> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut releases = Vec::new();

    for doc in documents {
        let Some(record) = project_record(doc, project_key) else {
            continue;
        };
        for release in &record.releases {
            let key = format!("{}-{}", release.version, release.date);
            if seen.insert(key) {
                releases.push(release.clone());
            }
        }
    }

    releases
}

/// One plotted release on the chronological chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// Parsed release time; unparseable dates resolve to the moment of
    /// aggregation so they plot last rather than failing.
    pub timestamp: DateTime<Utc>,
    /// Short axis label (`"1 Dec"`), or `"N/A"` when the date is opaque.
    pub axis_label: String,
    /// The original free-text date.
    pub date_text: String,
    pub version: String,
    pub description: String,
    /// Point height: the release's story count, absent → 0.
    pub stories: u32,
}

/// Sort releases chronologically for charting.
///
/// Stable ascending sort by parsed date; entries whose date cannot be
/// parsed are keyed to "now" so they land at the end in their relative
/// input order.
pub fn release_timeline(releases: &[ReleaseFact]) -> Vec<TimelinePoint> {
    let mut points: Vec<TimelinePoint> = releases
        .iter()
        .map(|release| {
            let parsed = datekey::parse_release_date(&release.date);
            let axis_label = match parsed {
                Some(ts) => ts.format("%-d %b").to_string(),
                None => "N/A".to_string(),
            };
            TimelinePoint {
                timestamp: parsed.unwrap_or_else(Utc::now),
                axis_label,
                date_text: release.date.clone(),
                version: release.version.clone(),
                description: release.description.clone(),
                stories: release.stories_count.unwrap_or(0),
            }
        })
        .collect();

    points.sort_by_key(|point| point.timestamp);
    points
}

/// Sum of story counts across a release list, absent counts as zero.
///
/// Order-insensitive, so it runs over the first-seen-order aggregate
/// directly.
pub fn story_point_total(releases: &[ReleaseFact]) -> u32 {
    releases
        .iter()
        .map(|release| release.stories_count.unwrap_or(0))
        .sum()
}
