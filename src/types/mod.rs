use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Body of `POST /api/summarize`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    /// Study topics, one per line, in any language.
    pub topics: String,
    /// Ask for a progressive frame stream instead of a single JSON envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl SummarizeRequest {
    /// Validate an untyped JSON body.
    ///
    /// Rejects a missing or non-text `topics` field and a `stream` flag that is
    /// present but not a boolean. Blank topic text is *not* rejected here; the
    /// orchestrator turns it into a "no topics found" terminal signal.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| AppError::InvalidInput("Request body must be a JSON object".into()))?;

        let topics = match object.get("topics") {
            Some(Value::String(text)) => text.clone(),
            Some(_) => {
                return Err(AppError::InvalidInput(
                    "'topics' must be a string with one topic per line".into(),
                ));
            }
            None => return Err(AppError::InvalidInput("Missing 'topics' field".into())),
        };

        let stream = match object.get("stream") {
            None | Some(Value::Null) => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(_) => {
                return Err(AppError::InvalidInput("'stream' must be a boolean".into()));
            }
        };

        Ok(Self { topics, stream })
    }

    /// Whether the client asked for a streamed response
    pub fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

/// Non-streaming response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: SubmissionResult,
}

// ============= Research Types =============

/// Research outcome for a single input line.
///
/// Field names and order are part of the wire contract consumed by the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TopicResult {
    /// The topic exactly as the user typed it (trimmed)
    pub topic: String,
    /// English rendering used for search and summarization
    pub translated: String,
    pub summary: String,
    /// Deduplicated source URLs in collection order
    pub sources: Vec<String>,
}

/// Ordered results of one submission, one entry per input topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResult(pub Vec<TopicResult>);

impl SubmissionResult {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TopicResult> {
        self.0.iter()
    }

    /// Serialize to the wire format (a JSON array)
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| AppError::Serialization(e.to_string()))
    }

    /// Parse the wire format produced by [`SubmissionResult::to_json`]
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| AppError::Serialization(e.to_string()))
    }
}

impl From<Vec<TopicResult>> for SubmissionResult {
    fn from(results: Vec<TopicResult>) -> Self {
        Self(results)
    }
}

impl IntoIterator for SubmissionResult {
    type Item = TopicResult;
    type IntoIter = std::vec::IntoIter<TopicResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Split raw input into topics: one per line, trimmed, blank lines dropped.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No topics found")]
    NoTopics,

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::InvalidInput(_) | AppError::NoTopics => axum::http::StatusCode::BAD_REQUEST,
            AppError::LLM(_) => axum::http::StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
