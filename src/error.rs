use thiserror::Error;

/// Errors that can occur while talking to the backend services
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport failure (connect, timeout, body read)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code from a service
    #[error("Unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    /// Response body did not match the expected shape
    #[error("Malformed payload from {endpoint}: {detail}")]
    Payload { endpoint: String, detail: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
