//! Task records from the tracking board and their roster projection.
//!
//! Custom fields are looked up by display name. A field that is missing, or
//! present without a value, reads as `None`; it is never an error.

use serde::Deserialize;

use orgsync_core::{ProjectAssociation, RemoteError, RosterEntry, RosterFields, RosterSettings};

use crate::error::{remote_err, RosterError};

/// Fields requested for every task.
pub const TASK_FIELDS: &[&str] = &[
    "name",
    "custom_fields.name",
    "custom_fields.enum_value.name",
    "custom_fields.text_value",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnumOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomField {
    pub name: String,
    #[serde(default)]
    pub enum_value: Option<EnumOption>,
    #[serde(default)]
    pub text_value: Option<String>,
}

impl CustomField {
    /// Enum option name, else text value; blank values read as `None`.
    pub fn value(&self) -> Option<&str> {
        self.enum_value
            .as_ref()
            .map(|e| e.name.as_str())
            .or(self.text_value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// One task as returned by the section query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl TaskRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|f| f.name == name)
            .and_then(CustomField::value)
    }

    /// Project the task onto a roster entry. Blank-named tasks yield `None`.
    pub fn to_entry(&self, fields: &RosterFields) -> Option<RosterEntry> {
        if self.name.trim().is_empty() {
            return None;
        }
        let projects = self
            .field(&fields.project)
            .map(|project| ProjectAssociation {
                project: project.to_owned(),
                repos: self.field(&fields.repos).map(str::to_owned),
            })
            .into_iter()
            .collect();
        Some(RosterEntry {
            name: self.name.clone(),
            role: self.field(&fields.role).map(str::to_owned),
            projects,
        })
    }
}

/// A task-tracking service that can list the tasks in a board section.
pub trait TaskSource {
    fn tasks_in_section(&self, section: &str, fields: &[&str])
        -> Result<Vec<TaskRecord>, RemoteError>;
}

/// Fetch the configured section and project every usable task onto the roster.
pub fn collect_entries<S>(source: &S, settings: &RosterSettings) -> Result<Vec<RosterEntry>, RosterError>
where
    S: TaskSource + ?Sized,
{
    let tasks = source
        .tasks_in_section(&settings.section, TASK_FIELDS)
        .map_err(remote_err("list section tasks"))?;
    tracing::info!(count = tasks.len(), section = %settings.section, "fetched roster tasks");

    let mut entries = Vec::with_capacity(tasks.len());
    for task in &tasks {
        let Some(entry) = task.to_entry(&settings.fields) else {
            continue;
        };
        if entry.projects.is_empty() {
            tracing::debug!(member = %entry.name, "no project set; not grouped");
        }
        entries.push(entry);
    }
    Ok(entries)
}
