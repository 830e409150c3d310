//! Hash-gated publishing of the rendered databag.
//!
//! ## `publish` protocol
//!
//! 1. Render content (already done by caller).
//! 2. SHA-256 hash the rendered content.
//! 3. Fetch the file currently on the target branch, if any.
//! 4. Compare digests; skip if identical.
//! 5. Stop here under `--dry-run`.
//! 6. Commit the new content, passing the prior blob SHA when updating.
//! 7. Report the resulting commit.

use sha2::{Digest, Sha256};

use orgsync_core::{PublishTarget, RemoteError, RepoRef};

use crate::error::{remote_err, RosterError};

// ---------------------------------------------------------------------------
// Content store seam
// ---------------------------------------------------------------------------

/// A file as it currently exists on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Blob SHA, required by the host to update the file.
    pub sha: String,
    pub content: String,
}

/// A create-or-update request for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub message: String,
    pub content: String,
    pub branch: String,
    /// `None` creates the file.
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub html_url: Option<String>,
}

/// Read and write single files in a hosted repository.
pub trait ContentRepo {
    /// `Ok(None)` when the file does not exist on `branch`.
    fn read_file(
        &self,
        repo: &RepoRef,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFile>, RemoteError>;

    fn write_file(
        &self,
        repo: &RepoRef,
        path: &str,
        update: &FileUpdate,
    ) -> Result<CommitInfo, RemoteError>;
}

// ---------------------------------------------------------------------------
// Publish result
// ---------------------------------------------------------------------------

/// Outcome of a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishResult {
    /// A commit was made.
    Written { path: String, commit: CommitInfo },
    /// Remote content already matches; nothing was committed.
    Unchanged { path: String },
    /// `--dry-run` mode: the file *would* have been committed.
    WouldWrite { path: String },
}

impl PublishResult {
    pub fn path(&self) -> &str {
        match self {
            Self::Written { path, .. } | Self::Unchanged { path } | Self::WouldWrite { path } => {
                path
            }
        }
    }
}

// ---------------------------------------------------------------------------
// publish
// ---------------------------------------------------------------------------

/// Hex SHA-256 of `content` with CRLF folded to LF.
pub fn content_digest(content: &str) -> String {
    let mut h = Sha256::new();
    h.update(normalize_line_endings(content).as_bytes());
    hex::encode(h.finalize())
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Commit `content` to the target file unless it is already there.
pub fn publish<R>(
    store: &R,
    target: &PublishTarget,
    content: &str,
    dry_run: bool,
) -> Result<PublishResult, RosterError>
where
    R: ContentRepo + ?Sized,
{
    let repo = target.repo()?;
    let path = target.path.clone();
    let digest = content_digest(content);

    let current = store
        .read_file(&repo, &path, &target.branch)
        .map_err(remote_err("read databag"))?;

    if let Some(file) = &current {
        if content_digest(&file.content) == digest {
            tracing::debug!(%repo, %path, "databag unchanged");
            return Ok(PublishResult::Unchanged { path });
        }
    }

    if dry_run {
        tracing::info!(%repo, %path, "[dry-run] would commit databag");
        return Ok(PublishResult::WouldWrite { path });
    }

    let update = FileUpdate {
        message: target.message.clone(),
        content: normalize_line_endings(content),
        branch: target.branch.clone(),
        sha: current.map(|f| f.sha),
    };
    let commit = store
        .write_file(&repo, &path, &update)
        .map_err(remote_err("commit databag"))?;

    tracing::info!(%repo, %path, commit = %commit.sha, "published databag");
    Ok(PublishResult::Written { path, commit })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryRepo {
        file: RefCell<Option<RemoteFile>>,
        writes: RefCell<Vec<FileUpdate>>,
    }

    impl MemoryRepo {
        fn with(content: &str) -> Self {
            let repo = Self::default();
            *repo.file.borrow_mut() = Some(RemoteFile {
                sha: "blob-1".to_owned(),
                content: content.to_owned(),
            });
            repo
        }
    }

    impl ContentRepo for MemoryRepo {
        fn read_file(
            &self,
            _repo: &RepoRef,
            _path: &str,
            _branch: &str,
        ) -> Result<Option<RemoteFile>, RemoteError> {
            Ok(self.file.borrow().clone())
        }

        fn write_file(
            &self,
            _repo: &RepoRef,
            _path: &str,
            update: &FileUpdate,
        ) -> Result<CommitInfo, RemoteError> {
            self.writes.borrow_mut().push(update.clone());
            *self.file.borrow_mut() = Some(RemoteFile {
                sha: format!("blob-{}", self.writes.borrow().len() + 1),
                content: update.content.clone(),
            });
            Ok(CommitInfo {
                sha: "c0ffee".to_owned(),
                html_url: None,
            })
        }
    }

    fn target() -> PublishTarget {
        PublishTarget {
            repository: "creativecommons/ccos".to_owned(),
            path: "databags/community_team_list.json".to_owned(),
            branch: "main".to_owned(),
            message: "Update roster databag".to_owned(),
        }
    }

    #[test]
    fn missing_file_is_created_without_sha() {
        let repo = MemoryRepo::default();
        let result = publish(&repo, &target(), "{}", false).unwrap();
        assert!(matches!(result, PublishResult::Written { .. }));
        let writes = repo.writes.borrow();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].sha, None);
        assert_eq!(writes[0].branch, "main");
        assert_eq!(writes[0].message, "Update roster databag");
    }

    #[test]
    fn changed_file_is_updated_with_prior_sha() {
        let repo = MemoryRepo::with("{\"projects\": []}");
        let result = publish(&repo, &target(), "{}", false).unwrap();
        assert_eq!(result.path(), "databags/community_team_list.json");
        assert_eq!(repo.writes.borrow()[0].sha.as_deref(), Some("blob-1"));
    }

    #[test]
    fn identical_content_is_not_committed() {
        let repo = MemoryRepo::with("{}");
        let result = publish(&repo, &target(), "{}", false).unwrap();
        assert!(matches!(result, PublishResult::Unchanged { .. }));
        assert!(repo.writes.borrow().is_empty());
    }

    #[test]
    fn dry_run_never_writes() {
        let repo = MemoryRepo::default();
        let result = publish(&repo, &target(), "{}", true).unwrap();
        assert!(matches!(result, PublishResult::WouldWrite { .. }));
        assert!(repo.writes.borrow().is_empty());
    }

    #[test]
    fn crlf_and_lf_content_share_the_same_digest() {
        assert_eq!(content_digest("a\r\nb\r\n"), content_digest("a\nb\n"));
        let repo = MemoryRepo::with("a\r\nb");
        let result = publish(&repo, &target(), "a\nb", false).unwrap();
        assert!(matches!(result, PublishResult::Unchanged { .. }));
    }

    #[test]
    fn second_publish_is_a_no_op() {
        let repo = MemoryRepo::default();
        publish(&repo, &target(), "{\"projects\": []}", false).unwrap();
        let second = publish(&repo, &target(), "{\"projects\": []}", false).unwrap();
        assert!(matches!(second, PublishResult::Unchanged { .. }));
        assert_eq!(repo.writes.borrow().len(), 1);
    }

    #[test]
    fn invalid_target_repository_is_a_config_error() {
        let mut t = target();
        t.repository = "no-slash".to_owned();
        let err = publish(&MemoryRepo::default(), &t, "{}", false).unwrap_err();
        assert!(matches!(err, RosterError::Config(_)));
    }
}
