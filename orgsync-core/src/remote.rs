//! Blocking JSON API client shared by the GitHub and Asana integrations.
//!
//! Every call is synchronous and bounded by the agent timeout. Non-success
//! statuses become [`RemoteError::Status`] carrying the service's own error
//! message; nothing is retried.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RemoteError;

const USER_AGENT: &str = concat!("orgsync/", env!("CARGO_PKG_VERSION"));

/// Authenticated client rooted at a service base URL.
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client sending `Authorization: Bearer <token>` on every call.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            authorization: format!("Bearer {token}"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/repos/o/r/labels`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &self.authorization)
            .set("Accept", "application/json")
    }

    /// `GET path?query` and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteError> {
        let url = self.url(path);
        let request = query
            .iter()
            .fold(self.request("GET", &url), |req, (k, v)| req.query(k, v));
        tracing::trace!(%url, ?query, "GET");
        let response = check(request.call(), "GET", &url)?;
        decode(response, &url)
    }

    /// Like [`get_json`](Self::get_json) but maps `404 Not Found` to `None`.
    pub fn get_json_opt<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, RemoteError> {
        match self.get_json(path, query) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Send `body` as JSON with `method` and decode the JSON response.
    pub fn send_json<B, T>(&self, method: &str, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::trace!(%url, method, "send");
        let response = check(self.request(method, &url).send_json(body), method, &url)?;
        decode(response, &url)
    }

    /// `DELETE path`, ignoring any response body.
    pub fn delete(&self, path: &str) -> Result<(), RemoteError> {
        let url = self.url(path);
        tracing::trace!(%url, "DELETE");
        check(self.request("DELETE", &url).call(), "DELETE", &url)?;
        Ok(())
    }
}

fn check(
    result: Result<ureq::Response, ureq::Error>,
    method: &str,
    url: &str,
) -> Result<ureq::Response, RemoteError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            Err(RemoteError::Status {
                method: method.to_owned(),
                url: url.to_owned(),
                status,
                message: error_message(&body),
            })
        }
        Err(ureq::Error::Transport(transport)) => Err(RemoteError::Transport {
            method: method.to_owned(),
            url: url.to_owned(),
            source: Box::new(transport),
        }),
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response, url: &str) -> Result<T, RemoteError> {
    response.into_json().map_err(|source| RemoteError::Decode {
        url: url.to_owned(),
        source,
    })
}

/// Pull the human-readable message out of an error body.
///
/// GitHub answers `{"message": ...}`; Asana answers
/// `{"errors": [{"message": ...}]}`. Anything else is returned verbatim.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("message")
            .and_then(|m| m.as_str())
            .or_else(|| v.pointer("/errors/0/message").and_then(|m| m.as_str()))
    });
    match message {
        Some(m) => m.to_owned(),
        None => body.trim().to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
