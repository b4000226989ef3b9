//! Analyzer and insight providers.
//!
//! `JsonAnalyzer` and the mocks ship unconditionally; the Gemini-backed
//! provider is feature-gated and currently a stub; wire the actual API
//! call in when needed.

use crate::{DocumentAnalyzer, InsightModel};
use async_trait::async_trait;
use reportage_model::ReportPayload;
use reportage_reconcile::HistoryPoint;
use std::collections::HashMap;

/// Extraction instructions handed to generative providers alongside the
/// document. The six job names must match the classifier's category titles.
pub const EXTRACTION_PROMPT: &str = "\
Analyze this developer report.

EXTRACT THE REPORT DATE:
- Read the document header (e.g. \"[2025] Weekly report 1 Dec - 5 Dec\") and
  return the week range including the year, e.g. \"1 Dec - 5 Dec 2025\".

EXTRACT AND SUM THESE SIX JOBS (support & marketing section):
1. Customer card created & sent
2. Mail sent (sum all rows if multiple exist)
3. Customer support
4. ICT news card created
5. Demo sites created
6. Card cover created (prefer the cover volume in the description over the
   task count)

Return numerical values as strings and output strictly in the defined JSON
format.";

/// Decodes documents that are already structured JSON payloads.
///
/// The offline ingestion path: no model call, the bytes must be the
/// payload itself.
#[derive(Debug, Default)]
pub struct JsonAnalyzer;

#[async_trait]
impl DocumentAnalyzer for JsonAnalyzer {
    async fn analyze_document(
        &self,
        bytes: &[u8],
        media_type: &str,
        file_name: &str,
    ) -> anyhow::Result<ReportPayload> {
        if !media_type.contains("json") {
            tracing::warn!(media_type, file_name, "decoding non-JSON media type as JSON");
        }
        let text = std::str::from_utf8(bytes)?;
        Ok(ReportPayload::from_json_str(text)?)
    }
}

/// Canned-payload analyzer for tests.
pub struct MockAnalyzer {
    pub payload: ReportPayload,
}

impl MockAnalyzer {
    pub fn returning(payload: ReportPayload) -> Self {
        Self { payload }
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self {
            payload: ReportPayload::default(),
        }
    }
}

#[async_trait]
impl DocumentAnalyzer for MockAnalyzer {
    async fn analyze_document(
        &self,
        _bytes: &[u8],
        _media_type: &str,
        _file_name: &str,
    ) -> anyhow::Result<ReportPayload> {
        Ok(self.payload.clone())
    }
}

/// Canned-response insight model for tests.
pub struct MockInsight {
    pub responses: Vec<String>,
    response_idx: std::sync::atomic::AtomicUsize,
}

impl MockInsight {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            response_idx: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn always(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// A model whose every call fails, for exercising degrade paths.
    pub fn failing() -> FailingInsight {
        FailingInsight
    }

    fn next(&self) -> String {
        let idx = self
            .response_idx
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.responses
            .get(idx % self.responses.len().max(1))
            .cloned()
            .unwrap_or_else(|| "Mock insight".to_string())
    }
}

#[async_trait]
impl InsightModel for MockInsight {
    async fn generate_insight(
        &self,
        _metric: &str,
        _history: &[HistoryPoint],
    ) -> anyhow::Result<String> {
        Ok(self.next())
    }

    async fn ask_question(&self, _query: &str, _context: &str) -> anyhow::Result<String> {
        Ok(self.next())
    }
}

/// Always-failing insight model.
pub struct FailingInsight;

#[async_trait]
impl InsightModel for FailingInsight {
    async fn generate_insight(
        &self,
        _metric: &str,
        _history: &[HistoryPoint],
    ) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("insight backend unavailable"))
    }

    async fn ask_question(&self, _query: &str, _context: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("insight backend unavailable"))
    }
}

/// Gemini-backed provider (stub).
#[cfg(feature = "gemini")]
pub struct GeminiProvider {
    pub api_key: String,
    pub extraction_model: String,
    pub insight_model: String,
}

#[cfg(feature = "gemini")]
impl GeminiProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            extraction_model: "gemini-3-pro-preview".to_string(),
            insight_model: "gemini-3-flash-preview".to_string(),
        }
    }
}

#[cfg(feature = "gemini")]
#[async_trait]
impl DocumentAnalyzer for GeminiProvider {
    async fn analyze_document(
        &self,
        bytes: &[u8],
        media_type: &str,
        file_name: &str,
    ) -> anyhow::Result<ReportPayload> {
        // Would call the Gemini API with EXTRACTION_PROMPT, the inline
        // document, and a response schema matching ReportPayload.
        // For now, stub.
        let _ = (bytes, media_type, file_name, EXTRACTION_PROMPT);
        anyhow::bail!(
            "Gemini extraction not wired up (model {})",
            self.extraction_model
        )
    }
}

#[cfg(feature = "gemini")]
#[async_trait]
impl InsightModel for GeminiProvider {
    async fn generate_insight(
        &self,
        metric: &str,
        history: &[HistoryPoint],
    ) -> anyhow::Result<String> {
        // Would call the Gemini API with the metric's recent history.
        Ok(format!(
            "[Gemini {}] Insight for {} over {} periods",
            self.insight_model,
            metric,
            history.len()
        ))
    }

    async fn ask_question(&self, query: &str, _context: &str) -> anyhow::Result<String> {
        Ok(format!(
            "[Gemini {}] Response to: {}",
            self.insight_model,
            query.chars().take(50).collect::<String>()
        ))
    }
}

/// Select an analyzer based on configuration.
pub fn create_analyzer(
    provider_type: &str,
    config: &HashMap<String, String>,
) -> anyhow::Result<Box<dyn DocumentAnalyzer>> {
    match provider_type {
        "json" => Ok(Box::new(JsonAnalyzer)),
        "mock" => Ok(Box::new(MockAnalyzer::default())),
        #[cfg(feature = "gemini")]
        "gemini" => {
            let api_key = config
                .get("api_key")
                .ok_or_else(|| anyhow::anyhow!("Gemini requires api_key"))?;
            Ok(Box::new(GeminiProvider::new(api_key)))
        }
        _ => {
            let _ = config;
            Err(anyhow::anyhow!("Unknown analyzer: {}", provider_type))
        }
    }
}

/// Select an insight model based on configuration.
pub fn create_insight_model(
    provider_type: &str,
    config: &HashMap<String, String>,
) -> anyhow::Result<Box<dyn InsightModel>> {
    match provider_type {
        "mock" => {
            let response = config
                .get("response")
                .map(|s| s.as_str())
                .unwrap_or("Mock insight");
            Ok(Box::new(MockInsight::always(response)))
        }
        #[cfg(feature = "gemini")]
        "gemini" => {
            let api_key = config
                .get("api_key")
                .ok_or_else(|| anyhow::anyhow!("Gemini requires api_key"))?;
            Ok(Box::new(GeminiProvider::new(api_key)))
        }
        _ => Err(anyhow::anyhow!("Unknown insight model: {}", provider_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{answer_or_placeholder, insight_or_placeholder, ASSISTANT_PLACEHOLDER, INSIGHT_PLACEHOLDER};

    #[tokio::test]
    async fn json_analyzer_decodes_payload_bytes() {
        let analyzer = JsonAnalyzer;
        let payload = analyzer
            .analyze_document(
                br#"{"executiveSummary": "good week"}"#,
                "application/json",
                "week.json",
            )
            .await
            .unwrap();

        assert_eq!(payload.executive_summary, "good week");
    }

    #[tokio::test]
    async fn json_analyzer_rejects_malformed_bytes() {
        let analyzer = JsonAnalyzer;
        let result = analyzer
            .analyze_document(b"not json", "application/json", "week.json")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn mock_insight_cycles_responses() {
        let model = MockInsight::new(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(model.generate_insight("Mail sent", &[]).await.unwrap(), "one");
        assert_eq!(model.ask_question("how?", "{}").await.unwrap(), "two");
        assert_eq!(model.generate_insight("Mail sent", &[]).await.unwrap(), "one");
    }

    #[tokio::test]
    async fn failures_degrade_to_placeholders() {
        let failing = MockInsight::failing();
        assert_eq!(
            insight_or_placeholder(&failing, "Mail sent", &[]).await,
            INSIGHT_PLACEHOLDER
        );
        assert_eq!(
            answer_or_placeholder(&failing, "how?", "{}").await,
            ASSISTANT_PLACEHOLDER
        );
    }

    #[test]
    fn factories_reject_unknown_providers() {
        let config = HashMap::new();
        assert!(create_analyzer("nope", &config).is_err());
        assert!(create_insight_model("nope", &config).is_err());
        assert!(create_analyzer("json", &config).is_ok());
        assert!(create_insight_model("mock", &config).is_ok());
    }
}
