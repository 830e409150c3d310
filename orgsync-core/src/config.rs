//! YAML configuration: organisation, declared label catalog, roster source.
//!
//! # Storage layout
//!
//! ```text
//! ~/.orgsync/
//!   config.yaml
//! ```
//!
//! # API pattern
//!
//! - `load_at(home: &Path)`: explicit home; used in tests with `TempDir`
//! - `load()`: derives home from `dirs::home_dir()`, delegates to `_at`
//! - `load_from(path)`: explicit file, used for `--config`
//!
//! Every loader validates the label catalog and the roster target before
//! returning, so configuration mistakes surface before any remote call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::label::Label;
use crate::types::{RepoName, RepoRef};

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
pub const DEFAULT_ASANA_URL: &str = "https://app.asana.com/api/1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// 1. Schema
// ---------------------------------------------------------------------------

/// Root of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub github: GitHubSettings,
    #[serde(default)]
    pub labels: LabelCatalog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<RosterSettings>,
}

/// Where the organisation lives and how to reach the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubSettings {
    pub org: String,
    #[serde(default = "default_github_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// A standalone declared label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDef {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelDef {
    pub fn to_label(&self) -> Label {
        Label::new(self.name.clone(), &self.color, self.description.as_deref())
    }
}

/// A label inside a [`LabelGroup`]; inherits the group color unless set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLabelDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Labels sharing a prefix and color, e.g. `🟥 priority: critical`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelGroup {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default)]
    pub labels: Vec<GroupLabelDef>,
}

impl LabelGroup {
    /// `"<emoji> <group>: <label>"`, without the emoji part when unset.
    pub fn qualified_name(&self, label: &str) -> String {
        match self.emoji.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(emoji) => format!("{emoji} {}: {label}", self.name),
            None => format!("{}: {label}", self.name),
        }
    }

    pub fn to_labels(&self) -> Vec<Label> {
        self.labels
            .iter()
            .map(|def| {
                Label::new(
                    self.qualified_name(&def.name),
                    def.color.as_deref().unwrap_or(&self.color),
                    def.description.as_deref(),
                )
            })
            .collect()
    }
}

/// The declared label catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelCatalog {
    #[serde(default)]
    pub standard: Vec<LabelDef>,
    #[serde(default)]
    pub groups: Vec<LabelGroup>,
    /// Extra labels per repository name.
    #[serde(default)]
    pub repositories: BTreeMap<String, Vec<LabelDef>>,
    /// Explicit repository list; when absent every organisation repository
    /// is targeted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl LabelCatalog {
    /// Standard labels followed by every group's labels.
    pub fn standard_labels(&self) -> Vec<Label> {
        self.standard
            .iter()
            .map(LabelDef::to_label)
            .chain(self.groups.iter().flat_map(LabelGroup::to_labels))
            .collect()
    }

    /// Standard labels plus the overrides declared for `repo` (none if absent).
    pub fn labels_for(&self, repo: &RepoName) -> Vec<Label> {
        let mut labels = self.standard_labels();
        if let Some(extra) = self.repositories.get(repo.as_str()) {
            labels.extend(extra.iter().map(LabelDef::to_label));
        }
        labels
    }

    pub fn is_excluded(&self, repo: &RepoName) -> bool {
        self.exclude.iter().any(|e| e == repo.as_str())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for def in &self.standard {
            def.to_label().validate("labels.standard")?;
        }
        for group in &self.groups {
            let location = format!("labels.groups.{}", group.name);
            for label in group.to_labels() {
                label.validate(&location)?;
            }
        }
        for (repo, defs) in &self.repositories {
            let location = format!("labels.repositories.{repo}");
            for def in defs {
                def.to_label().validate(&location)?;
            }
        }
        Ok(())
    }
}

/// Names of the task custom fields the roster reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterFields {
    #[serde(default = "default_role_field")]
    pub role: String,
    #[serde(default = "default_project_field")]
    pub project: String,
    #[serde(default = "default_repos_field")]
    pub repos: String,
}

impl Default for RosterFields {
    fn default() -> Self {
        Self {
            role: default_role_field(),
            project: default_project_field(),
            repos: default_repos_field(),
        }
    }
}

/// Where the databag is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishTarget {
    /// `owner/name` of the content repository.
    pub repository: String,
    pub path: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_message")]
    pub message: String,
}

impl PublishTarget {
    pub fn repo(&self) -> Result<RepoRef, ConfigError> {
        self.repository.parse()
    }
}

/// Task-tracker section to read and the publish target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSettings {
    #[serde(default = "default_asana_url")]
    pub api_url: String,
    /// Section gid whose tasks are the roster members.
    pub section: String,
    #[serde(default)]
    pub fields: RosterFields,
    pub target: PublishTarget,
}

fn default_github_url() -> String {
    DEFAULT_GITHUB_URL.to_owned()
}
fn default_asana_url() -> String {
    DEFAULT_ASANA_URL.to_owned()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_role_field() -> String {
    "Role".to_owned()
}
fn default_project_field() -> String {
    "Project Name".to_owned()
}
fn default_repos_field() -> String {
    "Repo(s)".to_owned()
}
fn default_branch() -> String {
    "main".to_owned()
}
fn default_message() -> String {
    "Update roster databag".to_owned()
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.labels.validate()?;
        if let Some(roster) = &self.roster {
            roster.target.repo()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 2. Paths
// ---------------------------------------------------------------------------

/// `<home>/.orgsync/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".orgsync").join("config.yaml")
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Load and validate the config file at `path`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load `<home>/.orgsync/config.yaml`.
pub fn load_at(home: &Path) -> Result<Config, ConfigError> {
    load_from(&config_path_at(home))
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Config, ConfigError> {
    load_at(&home()?)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
