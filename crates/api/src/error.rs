use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Remote error {status} for {endpoint}: {message}")]
    Remote {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Fields checked, in order, when digging a human-readable message out
/// of a JSON error body. Covers GitHub (`message`) and Confluence v1/v2
/// (`errorMessage`, `errors[].title`) shapes.
const MESSAGE_FIELDS: &[&str] = &["message", "error", "errorMessage", "detail", "title"];

const RAW_BODY_LIMIT: usize = 200;

/// Extract a displayable message from an error response body.
///
/// Falls back to the raw body, truncated, when it is not JSON or none
/// of the known fields are present.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in MESSAGE_FIELDS {
            if let Some(msg) = value.get(field).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
        if let Some(first) = value.get("errors").and_then(|e| e.get(0)) {
            for field in ["title", "message"] {
                if let Some(msg) = first.get(field).and_then(|v| v.as_str()) {
                    return msg.to_string();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    let mut message: String = trimmed.chars().take(RAW_BODY_LIMIT).collect();
    if message.len() < trimmed.len() {
        message.push_str("...");
    }
    message
}
