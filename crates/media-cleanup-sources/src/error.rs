use reqwest::Response;
use thiserror::Error;

/// Failure of a single call to an external service
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context} failed: {status} - {body}")]
    Status {
        context: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    #[error("Credential store error: {0}")]
    Credentials(String),

    #[error("{0}")]
    Unsupported(String),
}

/// Turn a non-2xx response into [`SourceError::Status`], keeping the body for the log
pub(crate) async fn ensure_success(response: Response, context: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Status {
        context: context.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON body, naming the call on failure
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, SourceError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode {
        context: context.to_string(),
        message: e.to_string(),
    })
}
