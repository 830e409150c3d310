//! Error types for orgsync-roster.

use thiserror::Error;

use orgsync_core::{ConfigError, RemoteError};

/// All errors that can arise while building or publishing the roster.
#[derive(Debug, Error)]
pub enum RosterError {
    /// A remote call failed, annotated with what was being attempted.
    #[error("{operation} failed: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    /// An error from the configuration layer.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Databag serialization error.
    #[error("databag JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`RosterError::Remote`].
pub(crate) fn remote_err(operation: &'static str) -> impl FnOnce(RemoteError) -> RosterError {
    move |source| RosterError::Remote { operation, source }
}
