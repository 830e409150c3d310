//! Multi-repository entrypoint used by the CLI.
//!
//! Each repository's declared set is the standard catalog plus the
//! repository's own overrides. Repositories are processed one at a time; the
//! [`FailurePolicy`] decides whether one failure ends the run.

use orgsync_core::{LabelCatalog, RepoName, RepoRef};

use crate::api::{LabelApi, RepositorySource};
use crate::error::{remote_err, LabelError};
use crate::reconcile::{reconcile, ReconcileOptions, ReconcileReport};

/// Which repositories a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoScope {
    /// The catalog's `include` list, or every unarchived organisation repository.
    Organisation,
    /// Only these repositories; each must exist in the organisation.
    Named(Vec<RepoName>),
}

/// What to do when one repository fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing repository and return its error.
    #[default]
    Abort,
    /// Record the failure and carry on with the next repository.
    Continue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverOptions {
    pub reconcile: ReconcileOptions,
    pub policy: FailurePolicy,
}

/// Per-repository result.
#[derive(Debug)]
pub enum RepoOutcome {
    Reconciled(ReconcileReport),
    Failed { repo: RepoRef, error: LabelError },
}

/// Outcome of a whole run, in processing order.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub outcomes: Vec<RepoOutcome>,
}

impl SyncSummary {
    pub fn reports(&self) -> impl Iterator<Item = &ReconcileReport> {
        self.outcomes.iter().filter_map(|o| match o {
            RepoOutcome::Reconciled(report) => Some(report),
            RepoOutcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&RepoRef, &LabelError)> {
        self.outcomes.iter().filter_map(|o| match o {
            RepoOutcome::Failed { repo, error } => Some((repo, error)),
            RepoOutcome::Reconciled(_) => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Resolve `scope` to the list of repositories to reconcile.
///
/// Excluded repositories are always dropped. Archived repositories are
/// skipped because their labels are read-only.
pub fn resolve_repositories<S>(
    source: &S,
    org: &str,
    catalog: &LabelCatalog,
    scope: &RepoScope,
) -> Result<Vec<RepoName>, LabelError>
where
    S: RepositorySource + ?Sized,
{
    let repos = match (scope, &catalog.include) {
        (RepoScope::Organisation, Some(include)) => {
            include.iter().map(|n| RepoName::from(n.as_str())).collect()
        }
        (RepoScope::Organisation, None) => source
            .list_repositories(org)
            .map_err(remote_err(org, "list repositories"))?
            .into_iter()
            .filter(|r| {
                if r.archived {
                    tracing::debug!(repo = %r.name, "skipping archived repository");
                }
                !r.archived
            })
            .map(|r| RepoName::from(r.name))
            .collect(),
        (RepoScope::Named(names), _) => {
            let known = source
                .list_repositories(org)
                .map_err(remote_err(org, "list repositories"))?;
            let mut selected = Vec::new();
            for name in names {
                match known.iter().find(|r| r.name == name.as_str()) {
                    None => {
                        return Err(LabelError::UnknownRepository {
                            org: org.to_owned(),
                            repo: name.to_string(),
                        })
                    }
                    Some(r) if r.archived => {
                        tracing::warn!(repo = %name, "repository is archived; skipping");
                    }
                    Some(_) if catalog.is_excluded(name) => {
                        tracing::warn!(repo = %name, "repository is excluded by config; skipping");
                    }
                    Some(_) => selected.push(name.clone()),
                }
            }
            selected
        }
    };

    Ok(repos
        .into_iter()
        .filter(|name| !catalog.is_excluded(name))
        .collect())
}

/// Reconcile every repository in `repos` against its declared label set.
pub fn sync_repositories<A>(
    api: &A,
    org: &str,
    repos: &[RepoName],
    catalog: &LabelCatalog,
    options: DriverOptions,
) -> Result<SyncSummary, LabelError>
where
    A: LabelApi + ?Sized,
{
    let mut summary = SyncSummary::default();
    for name in repos {
        let repo = RepoRef::new(org, name.clone());
        let declared = catalog.labels_for(name);
        tracing::info!(repo = %repo, declared = declared.len(), "syncing labels");

        match reconcile(api, &repo, &declared, options.reconcile) {
            Ok(report) => summary.outcomes.push(RepoOutcome::Reconciled(report)),
            Err(error) => match options.policy {
                FailurePolicy::Abort => return Err(error),
                FailurePolicy::Continue => {
                    tracing::error!(repo = %repo, error = %error, "label sync failed; continuing");
                    summary.outcomes.push(RepoOutcome::Failed { repo, error });
                }
            },
        }
    }
    Ok(summary)
}

/// Resolve the scope and reconcile every repository in it.
///
/// This is the canonical label-sync entrypoint for `orgsync labels sync`.
pub fn run<C>(
    client: &C,
    org: &str,
    catalog: &LabelCatalog,
    scope: &RepoScope,
    options: DriverOptions,
) -> Result<SyncSummary, LabelError>
where
    C: LabelApi + RepositorySource + ?Sized,
{
    let repos = resolve_repositories(client, org, catalog, scope)?;
    tracing::info!(org, repositories = repos.len(), "resolved repositories");
    sync_repositories(client, org, &repos, catalog, options)
}

#[cfg(test)]
mod tests {
    use orgsync_core::config::LabelDef;
    use orgsync_core::Label;

    use super::*;
    use crate::fake::FakeHost;

    fn catalog() -> LabelCatalog {
        let mut catalog = LabelCatalog::default();
        catalog.standard.push(LabelDef {
            name: "bug".to_owned(),
            color: "d73a4a".to_owned(),
            description: None,
        });
        catalog.repositories.insert(
            "vocabulary".to_owned(),
            vec![LabelDef {
                name: "design".to_owned(),
                color: "5319e7".to_owned(),
                description: None,
            }],
        );
        catalog
    }

    fn names(repos: &[&str]) -> Vec<RepoName> {
        repos.iter().map(|r| RepoName::from(*r)).collect()
    }

    #[test]
    fn organisation_scope_skips_archived_and_excluded() {
        let host = FakeHost::new()
            .with_repo("vocabulary", false)
            .with_repo("old-site", true)
            .with_repo("sre-salt-prime", false);
        let mut catalog = catalog();
        catalog.exclude.push("sre-salt-prime".to_owned());

        let repos =
            resolve_repositories(&host, "cc", &catalog, &RepoScope::Organisation).expect("resolve");
        assert_eq!(repos, names(&["vocabulary"]));
    }

    #[test]
    fn named_excluded_repository_is_skipped() {
        let host = FakeHost::new()
            .with_repo("vocabulary", false)
            .with_repo("sre-salt-prime", false);
        let mut catalog = catalog();
        catalog.exclude.push("sre-salt-prime".to_owned());

        let scope = RepoScope::Named(names(&["sre-salt-prime", "vocabulary"]));
        let repos = resolve_repositories(&host, "cc", &catalog, &scope).expect("resolve");
        assert_eq!(repos, names(&["vocabulary"]));
    }

    #[test]
    fn include_list_bypasses_listing() {
        let host = FakeHost::new();
        let mut catalog = catalog();
        catalog.include = Some(vec!["a".to_owned(), "b".to_owned()]);

        let repos =
            resolve_repositories(&host, "cc", &catalog, &RepoScope::Organisation).expect("resolve");
        assert_eq!(repos, names(&["a", "b"]));
    }

    #[test]
    fn unknown_named_repository_is_an_error() {
        let host = FakeHost::new().with_repo("vocabulary", false);
        let err = resolve_repositories(
            &host,
            "cc",
            &catalog(),
            &RepoScope::Named(names(&["nope"])),
        )
        .unwrap_err();
        assert!(matches!(err, LabelError::UnknownRepository { .. }));
    }

    #[test]
    fn overrides_apply_only_to_their_repository() {
        let host = FakeHost::new();
        let summary = sync_repositories(
            &host,
            "cc",
            &names(&["vocabulary", "chooser"]),
            &catalog(),
            DriverOptions::default(),
        )
        .expect("sync");

        assert_eq!(summary.reports().count(), 2);
        let vocab = host.labels(&RepoRef::new("cc", "vocabulary"));
        let chooser = host.labels(&RepoRef::new("cc", "chooser"));
        assert_eq!(vocab.len(), 2);
        assert_eq!(chooser, vec![Label::new("bug", "d73a4a", None)]);
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let host = FakeHost::new().failing_on("list cc/a");
        let err = sync_repositories(
            &host,
            "cc",
            &names(&["a", "b"]),
            &catalog(),
            DriverOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LabelError::Remote { .. }));
        assert!(host.labels(&RepoRef::new("cc", "b")).is_empty());
    }

    #[test]
    fn continue_policy_isolates_failures() {
        let host = FakeHost::new().failing_on("list cc/a");
        let options = DriverOptions {
            policy: FailurePolicy::Continue,
            ..DriverOptions::default()
        };
        let summary = sync_repositories(&host, "cc", &names(&["a", "b"]), &catalog(), options)
            .expect("sync");

        assert!(summary.has_failures());
        let failed: Vec<_> = summary.failures().map(|(r, _)| r.to_string()).collect();
        assert_eq!(failed, ["cc/a"]);
        assert_eq!(host.labels(&RepoRef::new("cc", "b")).len(), 1);
    }
}
