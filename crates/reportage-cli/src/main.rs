//! Reportage CLI
//!
//! Command-line front end for the weekly-report reconciliation pipeline:
//! - Ingesting raw report documents through the analysis boundary
//! - Seeding a store from a pre-built document batch (one-time, guarded)
//! - Rendering the reconciled views: highlights, releases, metrics,
//!   dashboard
//! - Advisory insight/assistant queries with placeholder degradation
//!
//! The ingest pipeline runs one analysis at a time: a single invocation is
//! a single in-flight request, and failures leave the store untouched.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use reportage_llm::{answer_or_placeholder, create_analyzer, create_insight_model, insight_or_placeholder};
use reportage_model::{DashboardCategory, Document};
use reportage_reconcile::{
    aggregate_releases, aggregate_support_metrics, canonical_key, release_timeline,
    sort_highlights, story_point_total, CategoryTable, DashboardState,
};
use reportage_store::{ReportStore, SortOrder, StoreConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod render;

/// Number of trailing history points handed to the insight model.
const INSIGHT_HISTORY_WINDOW: usize = 12;

#[derive(Parser)]
#[command(name = "reportage")]
#[command(
    author,
    version,
    about = "Reportage: weekly report reconciliation and KPI aggregation"
)]
struct Cli {
    /// Path to the report store file.
    #[arg(long, global = true, default_value = "./reports.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one raw report document and store the result.
    Ingest {
        /// Input document.
        input: PathBuf,
        /// Media type override (guessed from the extension otherwise).
        #[arg(long)]
        media_type: Option<String>,
        /// Analyzer provider: json, mock, or gemini (feature-gated).
        #[arg(long, default_value = "json")]
        analyzer: String,
    },

    /// Bulk-load a document batch (JSON array) into an empty store.
    ///
    /// Guarded by a one-time marker next to the store file; pass --force
    /// to reseed anyway.
    Seed {
        /// JSON file holding an array of documents.
        input: PathBuf,
        #[arg(long)]
        force: bool,
    },

    /// List stored reports, newest first.
    List,

    /// Show the weekly highlight archive, newest first.
    Highlights,

    /// Show a project's deduplicated release timeline.
    Releases {
        /// Project name (any spelling variant).
        project: String,
    },

    /// Show the six job-category cards and their history series.
    Metrics {
        /// Emit the aggregate as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },

    /// Render the dashboard view for a category.
    Dashboard {
        /// Category: highlights, development, or support.
        #[arg(long, default_value = "highlights")]
        category: String,
        /// Focused project under the development category.
        #[arg(long)]
        project: Option<String>,
        /// Selected job-category card under the support category.
        #[arg(long, default_value_t = 0)]
        card: usize,
    },

    /// Generate an advisory insight for one job-category metric.
    Insight {
        /// Job-category card index (0-5).
        #[arg(long, default_value_t = 0)]
        card: usize,
        /// Insight provider: mock or gemini (feature-gated).
        #[arg(long, default_value = "mock")]
        provider: String,
    },

    /// Ask the assistant a question about the reconciled data.
    Ask {
        question: String,
        /// Insight provider: mock or gemini (feature-gated).
        #[arg(long, default_value = "mock")]
        provider: String,
    },

    /// Remove every stored report.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = ReportStore::open(StoreConfig::new(&cli.store))?;
    let table = CategoryTable::standard();

    match cli.command {
        Commands::Ingest {
            input,
            media_type,
            analyzer,
        } => {
            ingest(&store, &input, media_type, &analyzer).await?;
        }

        Commands::Seed { input, force } => {
            seed(&store, &cli.store, &input, force)?;
        }

        Commands::List => {
            render::documents(&store.list(SortOrder::Descending));
        }

        Commands::Highlights => {
            let docs = store.list(SortOrder::Descending);
            let sorted = sort_highlights(reportage_reconcile::collect_highlights(&docs));
            render::highlights(&sorted);
        }

        Commands::Releases { project } => {
            let docs = store.list(SortOrder::Descending);
            let key = canonical_key(&project);
            let releases = aggregate_releases(&docs, &key);
            let timeline = release_timeline(&releases);
            render::releases(&project, &timeline, story_point_total(&releases));
        }

        Commands::Metrics { json } => {
            let docs = store.list(SortOrder::Descending);
            let aggregate = aggregate_support_metrics(&docs, &table);
            if json {
                println!("{}", serde_json::to_string_pretty(&aggregate)?);
            } else {
                render::metric_cards(&aggregate);
            }
        }

        Commands::Dashboard {
            category,
            project,
            card,
        } => {
            let docs = store.list(SortOrder::Descending);
            let mut state = DashboardState::new(&docs);
            state.select_category(category.parse::<DashboardCategory>()?);
            if let Some(name) = project {
                state.select_project(name);
            }
            state.select_support_card(card, &table);
            render::dashboard(&state, &docs, &table);
        }

        Commands::Insight { card, provider } => {
            let docs = store.list(SortOrder::Descending);
            let aggregate = aggregate_support_metrics(&docs, &table);
            let index = card.min(table.len().saturating_sub(1));
            let title = &aggregate.cards[index].title;
            let history = aggregate.history_for(index).unwrap_or_default();
            let window = &history[history.len().saturating_sub(INSIGHT_HISTORY_WINDOW)..];

            let model = create_insight_model(&provider, &provider_config())?;
            let text = insight_or_placeholder(model.as_ref(), title, window).await;
            println!("{} {}", "Insight:".purple().bold(), text);
        }

        Commands::Ask { question, provider } => {
            let docs = store.list(SortOrder::Descending);
            let state = DashboardState::new(&docs);
            let context = serde_json::to_string(&state.view(&docs, &table))?;

            let model = create_insight_model(&provider, &provider_config())?;
            let answer = answer_or_placeholder(model.as_ref(), &question, &context).await;
            println!("{} {}", "Assistant:".purple().bold(), answer);
        }

        Commands::Clear { yes } => {
            if !yes {
                anyhow::bail!("refusing to clear without --yes");
            }
            let dropped = store.count();
            store.clear()?;
            println!("{} {dropped} reports removed", "Cleared:".yellow().bold());
        }
    }

    Ok(())
}

/// Analyze one document and append it to the store.
///
/// On analysis failure the store is untouched and the user sees a single
/// failure message.
async fn ingest(
    store: &ReportStore,
    input: &Path,
    media_type: Option<String>,
    analyzer_type: &str,
) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("reading input document {}", input.display()))?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let media = media_type.unwrap_or_else(|| guess_media_type(input));

    let analyzer = create_analyzer(analyzer_type, &provider_config())?;

    match analyzer.analyze_document(&bytes, &media, &file_name).await {
        Ok(payload) => {
            let document = Document {
                id: uuid::Uuid::new_v4().to_string(),
                name: file_name.clone(),
                timestamp: chrono::Utc::now().timestamp_millis(),
                payload,
            };
            store.add(document)?;
            println!("{} {file_name}", "Analyzed and stored:".green().bold());
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, file = %file_name, "document analysis failed");
            eprintln!("{}", "Analysis failed.".red().bold());
            std::process::exit(1);
        }
    }
}

/// Bulk-load a prepared document batch, once.
fn seed(store: &ReportStore, store_path: &Path, input: &Path, force: bool) -> Result<()> {
    let marker = seed_marker_path(store_path);

    if marker.exists() && !force {
        println!(
            "{} store already seeded (marker {})",
            "Skipped:".yellow().bold(),
            marker.display()
        );
        return Ok(());
    }

    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("reading seed batch {}", input.display()))?;
    let batch: Vec<Document> =
        serde_json::from_str(&contents).with_context(|| "decoding seed batch")?;

    let count = batch.len();
    store.bulk_add(batch)?;
    std::fs::write(&marker, b"seeded\n")
        .with_context(|| format!("writing seed marker {}", marker.display()))?;

    println!("{} {count} reports", "Seeded:".green().bold());
    Ok(())
}

fn seed_marker_path(store_path: &Path) -> PathBuf {
    let mut marker = store_path.as_os_str().to_os_string();
    marker.push(".seeded");
    PathBuf::from(marker)
}

fn guess_media_type(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("md") | Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string()
}

fn provider_config() -> HashMap<String, String> {
    let mut config = HashMap::new();
    if let Ok(key) = std::env::var("REPORTAGE_API_KEY") {
        config.insert("api_key".to_string(), key);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_guessing_covers_common_extensions() {
        assert_eq!(guess_media_type(Path::new("week.json")), "application/json");
        assert_eq!(guess_media_type(Path::new("week.pdf")), "application/pdf");
        assert_eq!(guess_media_type(Path::new("week")), "application/octet-stream");
    }

    #[test]
    fn seed_marker_sits_next_to_the_store() {
        let marker = seed_marker_path(Path::new("/tmp/data/reports.json"));
        assert_eq!(marker, Path::new("/tmp/data/reports.json.seeded"));
    }
}
