use thiserror::Error;

#[derive(Debug, Error)]
pub enum BionodeError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream {url} returned HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Response for {node} does not match its schema: {source}")]
    SchemaMismatch {
        node: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response for {node} is missing required field `{field}`")]
    MissingField { node: &'static str, field: &'static str },

    #[error("No {node} record found for {query}")]
    NotFound { node: &'static str, query: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sandbox error: {0}")]
    Sandbox(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External process error: {0}")]
    ExternalProcess(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BionodeError>;
