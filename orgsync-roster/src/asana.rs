//! Asana implementation of [`TaskSource`].

use std::time::Duration;

use serde::Deserialize;

use orgsync_core::{ApiClient, RemoteError, RosterSettings};

use crate::tasks::{TaskRecord, TaskSource};

const PAGE_LIMIT: &str = "100";

#[derive(Debug, Clone)]
pub struct AsanaClient {
    api: ApiClient,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    next_page: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
struct NextPage {
    offset: String,
}

impl AsanaClient {
    pub fn new(settings: &RosterSettings, token: &str, timeout: Duration) -> Self {
        Self {
            api: ApiClient::new(&settings.api_url, token, timeout),
        }
    }
}

impl TaskSource for AsanaClient {
    fn tasks_in_section(
        &self,
        section: &str,
        fields: &[&str],
    ) -> Result<Vec<TaskRecord>, RemoteError> {
        let path = format!("/sections/{}/tasks", urlencoding::encode(section));
        let opt_fields = fields.join(",");
        let mut tasks = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut query = vec![("opt_fields", opt_fields.as_str()), ("limit", PAGE_LIMIT)];
            if let Some(offset) = offset.as_deref() {
                query.push(("offset", offset));
            }
            let page: Page<TaskRecord> = self.api.get_json(&path, &query)?;
            tasks.extend(page.data);
            match page.next_page {
                Some(next) => offset = Some(next.offset),
                None => break,
            }
        }

        Ok(tasks)
    }
}
