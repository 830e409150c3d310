//! Team roster model and the JSON databag published from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One project a roster member is associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAssociation {
    pub project: String,
    /// Free-form list of repositories the member holds privileges on,
    /// comma-separated (e.g. `"cc-legal-tools-app, cc-legal-tools-data"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repos: Option<String>,
}

/// A person on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub role: Option<String>,
    #[serde(default)]
    pub projects: Vec<ProjectAssociation>,
}

impl RosterEntry {
    /// Human-readable line per project association, e.g.
    /// `"Maintainer for the Chooser project, has privileges for the chooser repository"`.
    pub fn summaries(&self) -> Vec<String> {
        let role = self.role.as_deref().unwrap_or("Member");
        self.projects
            .iter()
            .map(|p| format_project(role, &p.project, p.repos.as_deref()))
            .collect()
    }
}

/// `"<role> for the <project> project"` plus the repository clause, if any.
pub fn format_project(role: &str, project: &str, repos: Option<&str>) -> String {
    format!("{role} for the {project} project{}", format_repos(repos))
}

fn format_repos(repos: Option<&str>) -> String {
    let Some(repos) = repos else {
        return String::new();
    };
    let noun = if repos.split(',').count() == 1 {
        "repository"
    } else {
        "repositories"
    };
    format!(", has privileges for the {repos} {noun}")
}

/// Member line inside a [`ProjectGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub role: Option<String>,
}

/// Members of a single project, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGroup {
    pub members: Vec<Member>,
    pub name: String,
}

/// Root of the published JSON document: `{"projects": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Databag {
    pub projects: Vec<ProjectGroup>,
}

impl Databag {
    /// Group entries by project in a single pass. Projects keep first-seen
    /// order; members keep entry order.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a RosterEntry>,
    {
        let mut projects: Vec<ProjectGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            for association in &entry.projects {
                let slot = *index.entry(association.project.clone()).or_insert_with(|| {
                    projects.push(ProjectGroup {
                        members: Vec::new(),
                        name: association.project.clone(),
                    });
                    projects.len() - 1
                });
                projects[slot].members.push(Member {
                    name: entry.name.clone(),
                    role: entry.role.clone(),
                });
            }
        }

        Self { projects }
    }

    pub fn project(&self, name: &str) -> Option<&ProjectGroup> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Serialize with sorted keys and four-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        use serde::ser::Error as _;

        // Fields are declared alphabetically and `Value` maps sort keys.
        let value = serde_json::to_value(self)?;
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(serde_json::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
