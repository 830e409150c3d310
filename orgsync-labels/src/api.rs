//! Remote operations the reconciler and driver depend on.

use orgsync_core::{Label, RemoteError, RepoRef};

/// The four label operations of a hosting service.
///
/// `create` and `edit` take the full declared [`Label`]; `edit` addresses the
/// remote label by its current name so case-only renames work.
pub trait LabelApi {
    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<Label>, RemoteError>;

    fn create_label(&self, repo: &RepoRef, label: &Label) -> Result<(), RemoteError>;

    fn edit_label(&self, repo: &RepoRef, current_name: &str, label: &Label)
        -> Result<(), RemoteError>;

    fn delete_label(&self, repo: &RepoRef, name: &str) -> Result<(), RemoteError>;
}

/// Summary of an organisation repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub archived: bool,
}

/// Lists the repositories of an organisation.
pub trait RepositorySource {
    fn list_repositories(&self, org: &str) -> Result<Vec<Repository>, RemoteError>;
}
