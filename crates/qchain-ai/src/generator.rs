//! The text-generation seam.

use async_trait::async_trait;
use qchain_core::{AnalysisRequest, AnalysisResult};
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::{AiError, AiResult};
use crate::prompt::CHAT_FALLBACK;

/// A hosted or local model able to analyse job submissions and chat.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier for logs.
    fn model(&self) -> &str;

    /// Title, complexity, summary and optimization hint for a submission.
    async fn analyse(&self, request: &AnalysisRequest) -> AiResult<AnalysisResult>;

    /// Free-form answer to a single prompt.
    async fn chat(&self, prompt: &str) -> AiResult<String>;
}

/// Analyse, logging and swallowing failures. Submissions proceed without analysis.
pub async fn analyse_or_skip(
    generator: &dyn TextGenerator,
    request: &AnalysisRequest,
) -> Option<AnalysisResult> {
    match generator.analyse(request).await {
        Ok(result) => Some(result),
        Err(e) => {
            warn!(model = generator.model(), error = %e, "AI analysis failed");
            None
        }
    }
}

/// Chat, replacing any failure with the fixed apology.
pub async fn chat_or_apologise(generator: &dyn TextGenerator, prompt: &str) -> String {
    match generator.chat(prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(model = generator.model(), error = %e, "AI chat failed");
            CHAT_FALLBACK.to_string()
        }
    }
}

/// Generator with canned answers, for offline runs and tests.
///
/// Records every prompt it receives.
#[derive(Debug, Default)]
pub struct StaticGenerator {
    analysis: Option<AnalysisResult>,
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl StaticGenerator {
    /// Generator that answers every call.
    pub fn new(analysis: AnalysisResult, reply: impl Into<String>) -> Self {
        Self {
            analysis: Some(analysis),
            reply: Some(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Generator whose every call fails.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Prompts and inputs seen so far.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    fn model(&self) -> &str {
        "static"
    }

    async fn analyse(&self, request: &AnalysisRequest) -> AiResult<AnalysisResult> {
        self.prompts.lock().await.push(request.user_input.clone());
        self.analysis
            .clone()
            .ok_or_else(|| AiError::Unavailable("no canned analysis".to_string()))
    }

    async fn chat(&self, prompt: &str) -> AiResult<String> {
        self.prompts.lock().await.push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| AiError::Unavailable("no canned reply".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use qchain_core::SubmissionType;

    use super::*;

    fn bell() -> AnalysisResult {
        AnalysisResult {
            title: "Bell State Generation".into(),
            complexity: "Low".into(),
            analysis_summary: "Entangles two qubits.".into(),
            optimization_suggestion: "None".into(),
        }
    }

    #[tokio::test]
    async fn test_static_generator_answers() {
        let generator = StaticGenerator::new(bell(), "Superposition is...");
        let req = AnalysisRequest::new("h q[0];", SubmissionType::Qasm);
        assert_eq!(analyse_or_skip(&generator, &req).await, Some(bell()));
        assert_eq!(
            chat_or_apologise(&generator, "what is a qubit?").await,
            "Superposition is..."
        );
        assert_eq!(generator.prompts().await, vec!["h q[0];", "what is a qubit?"]);
    }

    #[tokio::test]
    async fn test_failures_degrade() {
        let generator = StaticGenerator::unavailable();
        let req = AnalysisRequest::new("anything", SubmissionType::Prompt);
        assert!(generator.analyse(&req).await.is_err());
        assert_eq!(analyse_or_skip(&generator, &req).await, None);
        assert_eq!(chat_or_apologise(&generator, "hi").await, CHAT_FALLBACK);
    }
}
