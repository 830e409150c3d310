//! # orgsync-roster
//!
//! Builds the team roster databag from task-tracker records and publishes it
//! to a content repository.
//!
//! - [`tasks`]: task records and the [`TaskSource`] seam
//! - [`asana`]: Asana-backed [`TaskSource`]
//! - [`publish`]: hash-gated commits through [`ContentRepo`]
//! - [`github`]: GitHub contents API [`ContentRepo`]
//! - [`diff`]: unified diff against the published file
//! - [`pipeline`]: fetch, group, render, publish

pub mod asana;
pub mod diff;
pub mod error;
pub mod github;
pub mod pipeline;
pub mod publish;
pub mod tasks;

pub use asana::AsanaClient;
pub use diff::{diff_databag, DatabagDiff};
pub use error::RosterError;
pub use pipeline::{diff_roster, publish_roster, snapshot, RosterSnapshot};
pub use publish::{content_digest, publish, CommitInfo, ContentRepo, FileUpdate, PublishResult, RemoteFile};
pub use tasks::{collect_entries, CustomField, TaskRecord, TaskSource, TASK_FIELDS};
