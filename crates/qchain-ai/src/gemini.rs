//! Google Generative Language API client.
//!
//! Both operations go through `POST {endpoint}/models/{model}:generateContent`.
//! Analysis asks for a JSON answer constrained by a response schema; chat
//! replays a fixed two-turn preamble before the user's prompt.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use qchain_core::{AiSettings, AnalysisRequest, AnalysisResult};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{AiError, AiResult};
use crate::generator::TextGenerator;
use crate::prompt::{CHAT_GREETING, CHAT_PREAMBLE, analysis_prompt, analysis_schema};

/// Gemini client.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn user(text: &'a str) -> Self {
        Self {
            role: "user",
            parts: vec![Part { text }],
        }
    }

    fn model(text: &'a str) -> Self {
        Self {
            role: "model",
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    /// Create a client for `model` at `endpoint`.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: &str,
    ) -> AiResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            header::HeaderValue::from_str(api_key.trim()).map_err(|_| AiError::InvalidApiKey)?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let endpoint: String = endpoint.into();
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Create a client from configuration.
    pub fn from_settings(settings: &AiSettings) -> AiResult<Self> {
        let key = settings.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        Self::new(&settings.endpoint, &settings.model, key)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn generate(&self, body: &Value) -> AiResult<String> {
        let response = self.client.post(self.url()).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(AiError::Api { status, message });
        }

        let parsed: GenerateResponse = response.json().await?;
        extract_text(parsed)
    }
}

fn analysis_body(request: &AnalysisRequest) -> Value {
    let prompt = analysis_prompt(request);
    json!({
        "contents": [Content::user(&prompt)],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": analysis_schema(),
        },
    })
}

fn chat_body(prompt: &str) -> Value {
    json!({
        "contents": [
            Content::user(CHAT_PREAMBLE),
            Content::model(CHAT_GREETING),
            Content::user(prompt),
        ],
    })
}

fn extract_text(response: GenerateResponse) -> AiResult<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

/// Parse the model's JSON answer, tolerating a Markdown code fence around it.
fn parse_analysis(text: &str) -> AiResult<AnalysisResult> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str(body).map_err(|e| AiError::InvalidOutput(e.to_string()))
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn analyse(&self, request: &AnalysisRequest) -> AiResult<AnalysisResult> {
        debug!(model = %self.model, kind = %request.submission_type, "Requesting analysis");
        let text = self.generate(&analysis_body(request)).await?;
        parse_analysis(&text)
    }

    async fn chat(&self, prompt: &str) -> AiResult<String> {
        debug!(model = %self.model, "Requesting chat reply");
        self.generate(&chat_body(prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use qchain_core::SubmissionType;

    use super::*;

    #[test]
    fn test_requires_key() {
        assert!(matches!(
            GeminiClient::new("https://example.test", "m", " "),
            Err(AiError::MissingApiKey)
        ));
        assert!(matches!(
            GeminiClient::from_settings(&AiSettings::default()),
            Err(AiError::MissingApiKey)
        ));
    }

    #[test]
    fn test_url_and_debug() {
        let client = GeminiClient::new("https://example.test/v1beta/", "gemini-2.0-flash", "k").unwrap();
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        let dbg = format!("{client:?}");
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn test_chat_body_has_preamble() {
        let body = chat_body("What is entanglement?");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], CHAT_PREAMBLE);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "What is entanglement?");
    }

    #[test]
    fn test_analysis_body_requests_json() {
        let body = analysis_body(&AnalysisRequest::new("h q[0];", SubmissionType::Qasm));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!(
            body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("h q[0];")
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let resp: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "Hello, "}, {"text": "world"}]}}]
        }))
        .unwrap();
        assert_eq!(extract_text(resp).unwrap(), "Hello, world");

        let empty: GenerateResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(matches!(extract_text(empty), Err(AiError::EmptyResponse)));
    }

    #[test]
    fn test_parse_analysis() {
        let raw = r#"{"title":"Bell State Generation","complexity":"Low","analysis":"Creates an entangled pair.","optimizations":"None"}"#;
        let parsed = parse_analysis(raw).unwrap();
        assert_eq!(parsed.title, "Bell State Generation");
        assert_eq!(parsed.optimization_suggestion, "None");

        let fenced = format!("```json\n{raw}\n```");
        assert_eq!(parse_analysis(&fenced).unwrap(), parsed);

        assert!(matches!(
            parse_analysis(r#"{"title":"x"}"#),
            Err(AiError::InvalidOutput(_))
        ));
    }
}
