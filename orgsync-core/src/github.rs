//! Authenticated GitHub REST handle.
//!
//! Endpoint wrappers live next to the code that needs them: label and
//! repository listing in `orgsync-labels`, file contents in `orgsync-roster`.

use std::time::Duration;

use crate::config::GitHubSettings;
use crate::remote::ApiClient;
use crate::types::RepoRef;

/// Page size used for every paginated GitHub listing.
pub const PER_PAGE: usize = 100;

#[derive(Debug, Clone)]
pub struct GitHubClient {
    api: ApiClient,
}

impl GitHubClient {
    pub fn new(settings: &GitHubSettings, token: &str) -> Self {
        Self {
            api: ApiClient::new(
                &settings.api_url,
                token,
                Duration::from_secs(settings.timeout_secs),
            ),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `/repos/<owner>/<name>` followed by `suffix`.
    pub fn repo_path(repo: &RepoRef, suffix: &str) -> String {
        format!(
            "/repos/{}/{}{suffix}",
            urlencoding::encode(&repo.owner),
            urlencoding::encode(repo.name.as_str()),
        )
    }
}
