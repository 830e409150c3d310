//! End-to-end roster runs: fetch, group, render, then publish or diff.

use orgsync_core::{Databag, RosterEntry, RosterSettings};

use crate::diff::{diff_databag, DatabagDiff};
use crate::error::RosterError;
use crate::publish::{publish, ContentRepo, PublishResult};
use crate::tasks::{collect_entries, TaskSource};

/// Everything derived from one fetch of the roster section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshot {
    pub entries: Vec<RosterEntry>,
    pub databag: Databag,
    /// `databag` serialized exactly as it would be committed.
    pub rendered: String,
}

pub fn snapshot<S>(source: &S, settings: &RosterSettings) -> Result<RosterSnapshot, RosterError>
where
    S: TaskSource + ?Sized,
{
    let entries = collect_entries(source, settings)?;
    let databag = Databag::from_entries(&entries);
    let rendered = databag.to_json()?;
    tracing::debug!(
        members = entries.len(),
        projects = databag.projects.len(),
        "rendered databag"
    );
    Ok(RosterSnapshot {
        entries,
        databag,
        rendered,
    })
}

/// Fetch the roster and publish it to the configured target.
pub fn publish_roster<S, R>(
    source: &S,
    store: &R,
    settings: &RosterSettings,
    dry_run: bool,
) -> Result<(RosterSnapshot, PublishResult), RosterError>
where
    S: TaskSource + ?Sized,
    R: ContentRepo + ?Sized,
{
    let snap = snapshot(source, settings)?;
    let result = publish(store, &settings.target, &snap.rendered, dry_run)?;
    Ok((snap, result))
}

/// Fetch the roster and diff it against the published file.
pub fn diff_roster<S, R>(
    source: &S,
    store: &R,
    settings: &RosterSettings,
) -> Result<(RosterSnapshot, Option<DatabagDiff>), RosterError>
where
    S: TaskSource + ?Sized,
    R: ContentRepo + ?Sized,
{
    let snap = snapshot(source, settings)?;
    let diff = diff_databag(store, &settings.target, &snap.rendered)?;
    Ok((snap, diff))
}
