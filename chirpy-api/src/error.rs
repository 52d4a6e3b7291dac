use serde::{Deserialize, Serialize};

/// Public API error body.
///
/// `error` is the human readable message, `code` a stable machine readable tag.
/// Neither ever carries internal detail such as *why* a token was rejected.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.to_string()),
        }
    }
}
