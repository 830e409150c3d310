//! Error types for orgsync-labels.

use thiserror::Error;

use orgsync_core::{ConfigError, RemoteError};

/// All errors that can arise from label reconciliation.
#[derive(Debug, Error)]
pub enum LabelError {
    /// A label API call failed, annotated with the repository and operation.
    #[error("{operation} failed for {repo}: {source}")]
    Remote {
        repo: String,
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    /// An error from the configuration layer.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A repository named on the command line is not part of the organisation.
    #[error("repository '{repo}' not found in organisation '{org}'")]
    UnknownRepository { org: String, repo: String },
}

/// Convenience constructor for [`LabelError::Remote`].
pub(crate) fn remote_err(
    repo: impl ToString,
    operation: &'static str,
) -> impl FnOnce(RemoteError) -> LabelError {
    let repo = repo.to_string();
    move |source| LabelError::Remote {
        repo,
        operation,
        source,
    }
}
