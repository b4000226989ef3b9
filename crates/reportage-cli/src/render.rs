//! Terminal rendering for reconciled views.

use colored::Colorize;
use reportage_model::Document;
use reportage_reconcile::{
    CategoryTable, DashboardContent, DashboardState, DashboardView, SortedHighlights,
    SupportAggregate, TimelinePoint,
};

pub fn documents(docs: &[Document]) {
    if docs.is_empty() {
        println!("{}", "No reports stored.".dimmed());
        return;
    }

    println!("{}", format!("{} reports", docs.len()).bold());
    for doc in docs {
        let when = chrono::DateTime::from_timestamp_millis(doc.timestamp)
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {}  {}",
            doc.id.dimmed(),
            when.cyan(),
            doc.name.bold()
        );
    }
}

pub fn highlights(sorted: &SortedHighlights) {
    if sorted.entries.is_empty() {
        println!("{}", "No weekly highlights. Ingest reports to build the archive.".dimmed());
        return;
    }

    for entry in &sorted.entries {
        let latest = sorted.latest_id.as_deref() == Some(entry.id.as_str());
        let tag = if latest {
            " LATEST".green().bold().to_string()
        } else {
            String::new()
        };
        println!("{}{}", entry.week_range.bold(), tag);
        println!("  {}", entry.summary);
        for achievement in &entry.achievements {
            println!("    {} {achievement}", "•".purple());
        }
        println!();
    }
}

pub fn releases(project: &str, timeline: &[TimelinePoint], total_stories: u32) {
    println!(
        "{} {}  {} {}",
        "Project:".bold(),
        project,
        "Total tickets:".bold(),
        total_stories.to_string().green().bold()
    );

    if timeline.is_empty() {
        println!("{}", "No release points yet.".dimmed());
        return;
    }

    for point in timeline {
        println!(
            "  {}  {}  {}  {}",
            point.axis_label.cyan(),
            format!("v{}", point.version).bold(),
            format!("{} story points", point.stories).dimmed(),
            point.description
        );
    }
}

pub fn metric_cards(aggregate: &SupportAggregate) {
    for (idx, card) in aggregate.cards.iter().enumerate() {
        println!(
            "  [{idx}] {}  {}  {}",
            card.title.bold(),
            card.value.green().bold(),
            card.trend.dimmed()
        );
        if let Some(history) = aggregate.history_for(idx) {
            if !history.is_empty() {
                let series: Vec<String> = history
                    .iter()
                    .map(|point| format!("{}:{}", point.period, point.count))
                    .collect();
                println!("      {}", series.join("  ").dimmed());
            }
        }
    }
}

pub fn dashboard(state: &DashboardState, docs: &[Document], table: &CategoryTable) {
    println!("{}", state.category().to_string().bold().underline());

    match state.view(docs, table) {
        DashboardView::Highlights(sorted) => highlights(&sorted),
        DashboardView::Stats(content) => stats(state, &content),
    }
}

fn stats(state: &DashboardState, content: &DashboardContent) {
    if let Some(panel) = &content.project_panel {
        releases(&panel.project, &panel.timeline, panel.total_stories);
        if panel.project_names.len() > 1 {
            println!(
                "  {} {}",
                "Projects:".dimmed(),
                panel.project_names.join(", ")
            );
        }
        println!();
    }

    for (idx, card) in content.stats.iter().enumerate() {
        let marker = if idx == state.support_card() { "▸" } else { " " };
        println!(
            "  {marker} {}  {}  {}",
            card.title.bold(),
            card.value.green().bold(),
            card.trend.dimmed()
        );
    }

    println!();
    println!("{} {}", "AI Insight:".purple().bold(), content.summary.italic());

    if content.blockers.is_empty() {
        println!("{}", "No blockers detected.".green());
    } else {
        for blocker in &content.blockers {
            println!("  {} {blocker}", "!".red().bold());
        }
    }
}
