//! # orgsync-labels
//!
//! Label reconciliation across the repositories of an organisation.
//!
//! Call [`reconcile`] to converge a single repository, or [`driver::run`] to
//! process every repository in a [`RepoScope`].

pub mod api;
pub mod driver;
pub mod error;
pub mod github;
pub mod plan;
pub mod reconcile;

#[cfg(test)]
mod fake;

pub use api::{LabelApi, Repository, RepositorySource};
pub use driver::{DriverOptions, FailurePolicy, RepoOutcome, RepoScope, SyncSummary};
pub use error::LabelError;
pub use plan::{plan, LabelOp, LabelPlan};
pub use reconcile::{apply, reconcile, ReconcileOptions, ReconcileReport};
