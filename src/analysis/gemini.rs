//! Generative Language API client (`models/{model}:generateContent`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AnalysisClient, AnalysisResult};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

/// Longest error body kept in [`AnalysisError::HttpStatus`]
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Header carrying the API credential
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Analysis client backed by a hosted Gemini model
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    response_language: String,
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// A missing credential is not an error here; every call then fails with
    /// [`AnalysisError::MissingCredential`] and the session falls back.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            http,
            endpoint,
            api_key: config.credential().map(str::to_string),
            response_language: config.response_language.clone(),
        })
    }

    fn analysis_prompt(&self, url: &str) -> String {
        format!(
            "As a web content expert, analyze this link (simulation): {url}. \
             Give me a catchy title for the video and a short description, and \
             summarize the expected content in 3 key points. \
             Answer exclusively in {} and in JSON format.",
            self.response_language
        )
    }

    fn recommendation_prompt(&self, topic: &str) -> String {
        format!(
            "Suggest 3 topics similar to \"{topic}\" that the user could download videos about. \
             Answer in {}.",
            self.response_language
        )
    }

    async fn generate(
        &self,
        request: &GenerateRequest<'_>,
    ) -> std::result::Result<String, AnalysisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AnalysisError::MissingCredential)?;

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(AnalysisError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Malformed(e.to_string()))?;
        body.first_text().ok_or(AnalysisError::EmptyResponse)
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn analyze(&self, url: &str) -> std::result::Result<AnalysisResult, AnalysisError> {
        let prompt = self.analysis_prompt(url);
        let request = GenerateRequest {
            contents: vec![Content::text(&prompt)],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: analysis_schema(),
            }),
        };

        let text = self.generate(&request).await?;
        tracing::debug!(url, bytes = text.len(), "analysis response received");
        AnalysisResult::parse(&text)
    }

    async fn recommend(&self, topic: &str) -> std::result::Result<String, AnalysisError> {
        let prompt = self.recommendation_prompt(topic);
        let request = GenerateRequest {
            contents: vec![Content::text(&prompt)],
            generation_config: None,
        };

        let text = self.generate(&request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Response schema requiring the four analysis fields
fn analysis_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "summary": { "type": "ARRAY", "items": { "type": "STRING" } },
            "description": { "type": "STRING" },
            "category": { "type": "STRING" }
        },
        "required": super::REQUIRED_FIELDS
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if any
    fn first_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}
