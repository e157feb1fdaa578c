//! Error taxonomy for a single backend request.

use thiserror::Error;

/// Every failure a request can end in. All of them are terminal; nothing
/// is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No file selected or an empty query. Never reaches the network.
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// Connection refused, DNS failure and the like.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx answer. `detail` holds the backend's `error` field if it sent one.
    #[error("HTTP {status} {status_text}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    HttpStatus {
        status: u16,
        status_text: String,
        detail: Option<String>,
    },

    /// Body was not JSON or lacked the expected fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("request cancelled")]
    Cancelled,

    /// Reading the selected file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_input_validation(&self) -> bool {
        matches!(self, ClientError::InputValidation(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
