//! Reportage LLM boundary
//!
//! The reconciliation core never talks to a model; these traits are the
//! only crossing points:
//!
//! - [`DocumentAnalyzer`]: raw document bytes + media type + file name →
//!   structured [`ReportPayload`]. Failure means the collection stays
//!   unmodified and the caller surfaces one failure signal.
//! - [`InsightModel`]: already-reconciled data in, free text out. Advisory
//!   and read-only; failures degrade to placeholder strings via
//!   [`insight_or_placeholder`] / [`answer_or_placeholder`], never a hard
//!   error.
//!
//! Provider implementations live in [`providers`]; real API-backed ones are
//! feature-gated, mocks ship unconditionally.

pub mod providers;

use async_trait::async_trait;
use reportage_model::ReportPayload;
use reportage_reconcile::HistoryPoint;

/// Placeholder shown when insight generation fails.
pub const INSIGHT_PLACEHOLDER: &str = "Ready for deeper analysis.";

/// Placeholder shown when the assistant fails to answer.
pub const ASSISTANT_PLACEHOLDER: &str = "I'm having trouble processing that question right now.";

/// Turns one raw report document into a structured payload.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze_document(
        &self,
        bytes: &[u8],
        media_type: &str,
        file_name: &str,
    ) -> anyhow::Result<ReportPayload>;
}

/// Produces advisory free text from already-reconciled data.
#[async_trait]
pub trait InsightModel: Send + Sync {
    /// One high-impact insight for a metric and its recent history.
    async fn generate_insight(
        &self,
        metric: &str,
        history: &[HistoryPoint],
    ) -> anyhow::Result<String>;

    /// Answer a free-text question against a context string.
    async fn ask_question(&self, query: &str, context: &str) -> anyhow::Result<String>;
}

/// Generate an insight, degrading to the static placeholder on failure.
pub async fn insight_or_placeholder(
    model: &dyn InsightModel,
    metric: &str,
    history: &[HistoryPoint],
) -> String {
    match model.generate_insight(metric, history).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(metric, error = %err, "insight generation failed");
            INSIGHT_PLACEHOLDER.to_string()
        }
    }
}

/// Answer a question, degrading to the static placeholder on failure.
pub async fn answer_or_placeholder(model: &dyn InsightModel, query: &str, context: &str) -> String {
    match model.ask_question(query, context).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "assistant query failed");
            ASSISTANT_PLACEHOLDER.to_string()
        }
    }
}

pub use providers::{
    create_analyzer, create_insight_model, JsonAnalyzer, MockAnalyzer, MockInsight,
};
