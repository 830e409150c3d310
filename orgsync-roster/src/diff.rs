//! Unified diff of the published databag against a fresh rendering.

use similar::TextDiff;

use orgsync_core::PublishTarget;

use crate::error::{remote_err, RosterError};
use crate::publish::{normalize_line_endings, ContentRepo};

/// The difference between the remote databag and what would be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabagDiff {
    pub path: String,
    pub unified_diff: String,
}

/// Compare `rendered` with the file on the target branch.
///
/// Returns `None` when they match. A missing remote file diffs against empty
/// content. Nothing is written.
pub fn diff_databag<R>(
    store: &R,
    target: &PublishTarget,
    rendered: &str,
) -> Result<Option<DatabagDiff>, RosterError>
where
    R: ContentRepo + ?Sized,
{
    let repo = target.repo()?;
    let existing = store
        .read_file(&repo, &target.path, &target.branch)
        .map_err(remote_err("read databag"))?
        .map(|f| normalize_line_endings(&f.content))
        .unwrap_or_default();
    let rendered = normalize_line_endings(rendered);

    if existing == rendered {
        return Ok(None);
    }

    Ok(Some(DatabagDiff {
        path: target.path.clone(),
        unified_diff: unified(&target.path, &existing, &rendered),
    }))
}

fn unified(path: &str, old: &str, new: &str) -> String {
    let old_header = format!("a/{path}");
    let new_header = format!("b/{path}");
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}
