pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error {status}: {error}")]
    Api {
        status: u16,
        error: String,
        message: String,
    },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
