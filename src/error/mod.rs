use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Cannot read credential file {}: {source}", .path.display())]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential file {} is empty", .path.display())]
    EmptyCredential { path: PathBuf },

    #[error("Credential already initialized")]
    AlreadyInitialized,
}

/// Errors from the external step/answer generators
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Langbase unavailable: {message}")]
    Unavailable { message: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Response does not match schema {schema}: {message}")]
    Schema { schema: String, message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Thought tree errors
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Representation shape {shape:?} does not hold {len} values")]
    ShapeMismatch { shape: Vec<usize>, len: usize },

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Serialized tree is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for capability calls
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Result type alias for tree operations
pub type TreeResult<T> = Result<T, TreeError>;
