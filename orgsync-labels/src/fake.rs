//! In-memory label host for unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use orgsync_core::{Label, RemoteError, RepoRef};

use crate::api::{LabelApi, Repository, RepositorySource};

#[derive(Debug, Default)]
pub(crate) struct FakeHost {
    labels: RefCell<BTreeMap<String, Vec<Label>>>,
    repos: Vec<Repository>,
    calls: RefCell<Vec<String>>,
    fail_on: Option<String>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_labels(self, repo: &RepoRef, labels: Vec<Label>) -> Self {
        self.labels.borrow_mut().insert(repo.to_string(), labels);
        self
    }

    pub(crate) fn with_repo(mut self, name: &str, archived: bool) -> Self {
        self.repos.push(Repository {
            name: name.to_owned(),
            archived,
        });
        self
    }

    /// Fail the call whose log line equals `call`, e.g. `"create o/r B"`.
    pub(crate) fn failing_on(mut self, call: &str) -> Self {
        self.fail_on = Some(call.to_owned());
        self
    }

    pub(crate) fn labels(&self, repo: &RepoRef) -> Vec<Label> {
        self.labels
            .borrow()
            .get(&repo.to_string())
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: String) -> Result<(), RemoteError> {
        if self.fail_on.as_deref() == Some(call.as_str()) {
            return Err(RemoteError::Status {
                method: "TEST".to_owned(),
                url: call,
                status: 500,
                message: "injected failure".to_owned(),
            });
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl LabelApi for FakeHost {
    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<Label>, RemoteError> {
        // Listing is not logged as a call; it can only be made to fail.
        let call = format!("list {repo}");
        if self.fail_on.as_deref() == Some(call.as_str()) {
            self.record(call)?;
        }
        Ok(self.labels(repo))
    }

    fn create_label(&self, repo: &RepoRef, label: &Label) -> Result<(), RemoteError> {
        self.record(format!("create {repo} {}", label.name))?;
        self.labels
            .borrow_mut()
            .entry(repo.to_string())
            .or_default()
            .push(label.clone());
        Ok(())
    }

    fn edit_label(
        &self,
        repo: &RepoRef,
        current_name: &str,
        label: &Label,
    ) -> Result<(), RemoteError> {
        self.record(format!("edit {repo} {current_name}"))?;
        let mut labels = self.labels.borrow_mut();
        let entries = labels.entry(repo.to_string()).or_default();
        if let Some(slot) = entries.iter_mut().find(|l| l.name == current_name) {
            *slot = label.clone();
        }
        Ok(())
    }

    fn delete_label(&self, repo: &RepoRef, name: &str) -> Result<(), RemoteError> {
        self.record(format!("delete {repo} {name}"))?;
        if let Some(entries) = self.labels.borrow_mut().get_mut(&repo.to_string()) {
            entries.retain(|l| l.name != name);
        }
        Ok(())
    }
}

impl RepositorySource for FakeHost {
    fn list_repositories(&self, _org: &str) -> Result<Vec<Repository>, RemoteError> {
        Ok(self.repos.clone())
    }
}
