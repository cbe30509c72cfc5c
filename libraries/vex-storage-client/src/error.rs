//! Error types for the storage client.

use thiserror::Error;

/// Errors that can occur when talking to the storage API.
#[derive(Error, Debug)]
pub enum StorageClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Storage API returned an error response
    #[error("Storage API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid storage URL or object name
    #[error("Invalid storage URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse an API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Upload source directory does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    /// IO error while reading upload sources
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rate limited by the API
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

impl StorageClientError {
    /// Build the error for a non-success response.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Self::RateLimited { retry_after_secs };
        }

        let body = response.text().await.unwrap_or_default();
        Self::Api {
            status,
            message: api_message(&body),
        }
    }
}

/// Storage errors come back as `{"statusCode", "error", "message"}`; fall back
/// to the raw body for anything else.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Result type for storage client operations.
pub type Result<T> = std::result::Result<T, StorageClientError>;
