//! orgsync core library: domain types, configuration, HTTP plumbing, errors.
//!
//! - [`types`]: repository newtypes
//! - [`label`]: [`Label`], [`LabelKey`], [`LabelSet`]
//! - [`roster`]: roster entries and the published [`Databag`]
//! - [`config`]: YAML configuration load / validation
//! - [`remote`]: blocking JSON API client shared by every service
//! - [`github`]: authenticated GitHub client handle
//! - [`error`]: [`ConfigError`], [`RemoteError`]

pub mod config;
pub mod error;
pub mod github;
pub mod label;
pub mod remote;
pub mod roster;
pub mod types;

pub use config::{Config, GitHubSettings, LabelCatalog, PublishTarget, RosterFields, RosterSettings};
pub use error::{ConfigError, RemoteError};
pub use github::GitHubClient;
pub use label::{Label, LabelKey, LabelSet};
pub use remote::ApiClient;
pub use roster::{Databag, Member, ProjectAssociation, ProjectGroup, RosterEntry};
pub use types::{RepoName, RepoRef};
