//! GitHub contents API implementation of [`ContentRepo`].

use std::io;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use orgsync_core::{GitHubClient, RemoteError, RepoRef};

use crate::publish::{CommitInfo, ContentRepo, FileUpdate, RemoteFile};

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    commit: CommitResponse,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
}

/// `/repos/o/r/contents/<path>` with each path segment encoded.
fn contents_path(repo: &RepoRef, path: &str) -> String {
    let encoded: Vec<_> = path
        .trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    GitHubClient::repo_path(repo, &format!("/contents/{}", encoded.join("/")))
}

fn invalid_data(url: String, message: String) -> RemoteError {
    RemoteError::Decode {
        url,
        source: io::Error::new(io::ErrorKind::InvalidData, message),
    }
}

fn decode_content(body: &ContentsResponse, url: &str) -> Result<String, RemoteError> {
    if body.encoding != "base64" {
        return Err(invalid_data(
            url.to_owned(),
            format!("unsupported content encoding {:?}", body.encoding),
        ));
    }
    // GitHub wraps the base64 payload at 60 columns.
    let packed: String = body.content.split_whitespace().collect();
    let bytes = STANDARD
        .decode(packed)
        .map_err(|e| invalid_data(url.to_owned(), e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| invalid_data(url.to_owned(), e.to_string()))
}

impl ContentRepo for GitHubClient {
    fn read_file(
        &self,
        repo: &RepoRef,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFile>, RemoteError> {
        let api_path = contents_path(repo, path);
        let Some(body) = self
            .api()
            .get_json_opt::<ContentsResponse>(&api_path, &[("ref", branch)])?
        else {
            return Ok(None);
        };
        let content = decode_content(&body, &self.api().url(&api_path))?;
        Ok(Some(RemoteFile {
            sha: body.sha,
            content,
        }))
    }

    fn write_file(
        &self,
        repo: &RepoRef,
        path: &str,
        update: &FileUpdate,
    ) -> Result<CommitInfo, RemoteError> {
        let body = PutContents {
            message: &update.message,
            content: STANDARD.encode(update.content.as_bytes()),
            branch: &update.branch,
            sha: update.sha.as_deref(),
        };
        let response: PutResponse = self
            .api()
            .send_json("PUT", &contents_path(repo, path), &body)?;
        Ok(CommitInfo {
            sha: response.commit.sha,
            html_url: response.commit.html_url,
        })
    }
}
