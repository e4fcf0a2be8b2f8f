//! Error types for the sharefetch application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Browser session errors
    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Transient UI failure: {0}")]
    TransientUi(String),

    #[error("Listing never rendered: no element matched '{selector}' after {waited_ms} ms")]
    RenderTimeout { selector: String, waited_ms: u64 },

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the browser session itself is unusable and the run must stop.
    pub fn is_fatal_session(&self) -> bool {
        matches!(self, Error::Session(_))
    }

    /// True when a fresh retry round may recover from this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::TransientUi(_))
    }
}
