//! GitHub REST implementation of [`LabelApi`] and [`RepositorySource`].

use serde::{Deserialize, Serialize};

use orgsync_core::github::PER_PAGE;
use orgsync_core::{GitHubClient, Label, RemoteError, RepoRef};

use crate::api::{LabelApi, Repository, RepositorySource};

#[derive(Debug, Deserialize)]
struct GitHubLabel {
    name: String,
    color: String,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateLabel<'a> {
    name: &'a str,
    color: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct EditLabel<'a> {
    new_name: &'a str,
    color: &'a str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    name: String,
    #[serde(default)]
    archived: bool,
}

fn label_path(repo: &RepoRef, name: &str) -> String {
    GitHubClient::repo_path(repo, &format!("/labels/{}", urlencoding::encode(name)))
}

/// Fetch every page of a `per_page`/`page` listing until a short page.
fn paginate<T>(
    client: &GitHubClient,
    path: &str,
    extra: &[(&str, &str)],
) -> Result<Vec<T>, RemoteError>
where
    T: serde::de::DeserializeOwned,
{
    let per_page = PER_PAGE.to_string();
    let mut items = Vec::new();
    for page in 1.. {
        let page = page.to_string();
        let mut query = vec![("per_page", per_page.as_str()), ("page", page.as_str())];
        query.extend_from_slice(extra);
        let batch: Vec<T> = client.api().get_json(path, &query)?;
        let done = batch.len() < PER_PAGE;
        items.extend(batch);
        if done {
            break;
        }
    }
    Ok(items)
}

impl LabelApi for GitHubClient {
    fn list_labels(&self, repo: &RepoRef) -> Result<Vec<Label>, RemoteError> {
        let path = GitHubClient::repo_path(repo, "/labels");
        let labels: Vec<GitHubLabel> = paginate(self, &path, &[])?;
        Ok(labels
            .into_iter()
            .map(|l| Label::new(l.name, &l.color, l.description.as_deref()))
            .collect())
    }

    fn create_label(&self, repo: &RepoRef, label: &Label) -> Result<(), RemoteError> {
        let body = CreateLabel {
            name: &label.name,
            color: &label.color,
            description: &label.description,
        };
        let path = GitHubClient::repo_path(repo, "/labels");
        self.api()
            .send_json::<_, serde_json::Value>("POST", &path, &body)?;
        Ok(())
    }

    fn edit_label(
        &self,
        repo: &RepoRef,
        current_name: &str,
        label: &Label,
    ) -> Result<(), RemoteError> {
        let body = EditLabel {
            new_name: &label.name,
            color: &label.color,
            description: &label.description,
        };
        self.api()
            .send_json::<_, serde_json::Value>("PATCH", &label_path(repo, current_name), &body)?;
        Ok(())
    }

    fn delete_label(&self, repo: &RepoRef, name: &str) -> Result<(), RemoteError> {
        self.api().delete(&label_path(repo, name))
    }
}

impl RepositorySource for GitHubClient {
    fn list_repositories(&self, org: &str) -> Result<Vec<Repository>, RemoteError> {
        let path = format!("/orgs/{}/repos", urlencoding::encode(org));
        let repos: Vec<GitHubRepo> = paginate(self, &path, &[("type", "all")])?;
        Ok(repos
            .into_iter()
            .map(|r| Repository {
                name: r.name,
                archived: r.archived,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
