//! Remote content analysis
//!
//! An [`AnalysisClient`] turns a submitted URL into an [`AnalysisResult`]
//! (title, summary points, description, category). Clients report every
//! failure as an [`AnalysisError`] value and never retry; the controller
//! decides whether to retry and substitutes the fallback record when the
//! call ultimately fails.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::SessionConfig;
use crate::error::AnalysisError;
use crate::types::VideoMetadata;

mod gemini;

pub use gemini::GeminiClient;

/// Fields every analysis payload must contain
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "summary", "description", "category"];

/// Pluggable analysis backend
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Name of the client (for logging)
    fn name(&self) -> &'static str;

    /// Analyze the content behind `url`. `url` is trimmed and non-empty.
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalysisError>;

    /// Suggest related topics the user could download videos about.
    async fn recommend(&self, topic: &str) -> Result<String, AnalysisError>;
}

/// Structured result of a successful analysis
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    /// Catchy title
    pub title: String,
    /// Key points, in order
    pub summary: Vec<String>,
    /// Short description
    pub description: String,
    /// Category label
    pub category: String,
}

impl AnalysisResult {
    /// Parse the model's JSON text, enforcing the four required fields.
    ///
    /// Markdown code fences around the document are tolerated.
    pub fn parse(text: &str) -> Result<Self, AnalysisError> {
        let text = strip_code_fence(text);
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| AnalysisError::Malformed(e.to_string()))?;

        let object = value
            .as_object()
            .ok_or_else(|| AnalysisError::Malformed("expected a JSON object".to_string()))?;
        for field in REQUIRED_FIELDS {
            if object.get(field).is_none_or(|v| v.is_null()) {
                return Err(AnalysisError::MissingField(field));
            }
        }

        let result: AnalysisResult =
            serde_json::from_value(value).map_err(|e| AnalysisError::Malformed(e.to_string()))?;
        if result.title.trim().is_empty() {
            return Err(AnalysisError::MissingField("title"));
        }
        Ok(result)
    }

    /// Merge with the configured display defaults into a metadata record.
    pub fn into_metadata(self, session: &SessionConfig) -> VideoMetadata {
        VideoMetadata {
            title: self.title.trim().to_string(),
            author: session.default_author.clone(),
            duration: session.default_duration.clone(),
            thumbnail: synthetic_thumbnail(&session.thumbnail_template),
            description: Some(self.description),
            summary: Some(self.summary),
            category: Some(self.category),
        }
    }
}

/// Fill `{seed}` in the template with a random number.
pub fn synthetic_thumbnail(template: &str) -> String {
    let seed: u32 = rand::thread_rng().gen_range(0..u32::MAX);
    template.replace("{seed}", &seed.to_string())
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_payload() {
        let result = AnalysisResult::parse(
            r#"{"title":"T","summary":["a","b"],"description":"d","category":"c"}"#,
        )
        .unwrap();

        assert_eq!(result.title, "T");
        assert_eq!(result.summary, vec!["a", "b"]);
        assert_eq!(result.description, "d");
        assert_eq!(result.category, "c");
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let err =
            AnalysisResult::parse(r#"{"title":"T","summary":[],"description":"d"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField("category")));
    }

    #[test]
    fn null_field_counts_as_missing() {
        let err = AnalysisResult::parse(
            r#"{"title":"T","summary":null,"description":"d","category":"c"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField("summary")));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let err = AnalysisResult::parse(
            r#"{"title":"T","summary":"not a list","description":"d","category":"c"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = AnalysisResult::parse(
            r#"{"title":"  ","summary":[],"description":"d","category":"c"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField("title")));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            AnalysisResult::parse("Sure! Here is your analysis."),
            Err(AnalysisError::Malformed(_))
        ));
        assert!(matches!(
            AnalysisResult::parse("[1, 2, 3]"),
            Err(AnalysisError::Malformed(_))
        ));
    }

    #[test]
    fn code_fenced_payload_is_accepted() {
        let text = "```json\n{\"title\":\"T\",\"summary\":[\"a\"],\"description\":\"d\",\"category\":\"c\"}\n```";
        assert_eq!(AnalysisResult::parse(text).unwrap().title, "T");
    }

    #[test]
    fn metadata_uses_session_defaults() {
        let session = SessionConfig::default();
        let metadata = AnalysisResult {
            title: " T ".into(),
            summary: vec!["a".into()],
            description: "d".into(),
            category: "c".into(),
        }
        .into_metadata(&session);

        assert_eq!(metadata.title, "T");
        assert_eq!(metadata.author, session.default_author);
        assert_eq!(metadata.duration, "12:45");
        assert!(metadata.thumbnail.starts_with("https://picsum.photos/seed/"));
        assert!(!metadata.thumbnail.contains("{seed}"));
        assert_eq!(metadata.category.as_deref(), Some("c"));
    }
}
