//! Error types for orgsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while locating, parsing, or validating the
/// configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.orgsync/`.
    #[error("cannot determine home directory; set $HOME or pass --config")]
    HomeNotFound,

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// A declared label has an empty name.
    #[error("label with empty name in {location}")]
    EmptyLabelName { location: String },

    /// A declared label color is not six hex digits.
    #[error("label '{label}' has invalid color '{color}'; expected six hex digits")]
    InvalidColor { label: String, color: String },

    /// A repository reference is not of the form `owner/name`.
    #[error("invalid repository '{0}'; expected owner/name")]
    InvalidRepository(String),
}

/// Failure of a single remote API call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-success status code.
    #[error("{method} {url} returned {status}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The response body could not be decoded.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl RemoteError {
    /// HTTP status of the failed call, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
