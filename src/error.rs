//! Error types for dnsveto.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for dnsveto operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configured list file could not be opened
    #[error("failed to open list file {path:?}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured list directory could not be read
    #[error("failed to read list directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Domains could not be extracted from a local list file
    #[error("failed to extract domains from {path:?}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// HTTP transport error
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Remote source answered with an error status
    #[error("unexpected response from {url}, code: {code}")]
    Status { url: String, code: u16 },

    /// Gzip decompression failed
    #[error("gzip decompression failed: {0}")]
    Decompress(std::io::Error),

    /// Unparseable line under strict extraction
    #[error("malformed line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Environment variable with an unusable value
    #[error("invalid value {value:?} for environment variable {var}")]
    Env { var: String, value: String },
}

/// Result type alias for dnsveto operations.
pub type Result<T> = std::result::Result<T, Error>;
