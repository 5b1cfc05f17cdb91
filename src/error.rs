//! Error types for the pixiv-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Transport errors
    #[error("Request failed while {stage}: HTTP {status}")]
    Transport { stage: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Session errors
    #[error("Session error: {0}")]
    Session(String),

    // Markup errors
    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Unsupported work: {0}")]
    Unsupported(String),

    // File system errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Build a transport error for a non-200 response.
    pub fn transport(stage: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Error::Transport {
            stage: stage.into(),
            status: status.as_u16(),
        }
    }

    /// Build an extraction error for a missing or malformed marker.
    pub fn extraction(what: impl Into<String>) -> Self {
        Error::Extraction(what.into())
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const SESSION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
