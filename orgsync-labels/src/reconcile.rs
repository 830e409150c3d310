//! Converge one repository's labels to a declared set.
//!
//! ## `reconcile`: 4 steps
//!
//! 1. List the remote labels and key them by case-folded name.
//! 2. Key the declared labels the same way (last duplicate wins).
//! 3. Plan: deletes (destructive only), then creates / updates.
//! 4. Apply the plan in order, stopping at the first failed call.
//!
//! Dry-run stops after step 3. No rollback is attempted on failure; the
//! operations already applied stay applied.

use orgsync_core::{Label, LabelSet, RepoRef};

use crate::api::LabelApi;
use crate::error::{remote_err, LabelError};
use crate::plan::{self, LabelOp, LabelPlan};

/// Switches for a single reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Delete remote labels that are not declared.
    pub destructive: bool,
    /// Plan only; issue no mutating call.
    pub dry_run: bool,
}

/// Outcome of reconciling one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub repo: RepoRef,
    pub remote_count: usize,
    pub declared_count: usize,
    pub plan: LabelPlan,
    /// `false` in dry-run mode.
    pub applied: bool,
}

/// Reconcile `repo` against `declared`.
pub fn reconcile<A>(
    api: &A,
    repo: &RepoRef,
    declared: &[Label],
    options: ReconcileOptions,
) -> Result<ReconcileReport, LabelError>
where
    A: LabelApi + ?Sized,
{
    let _span = tracing::info_span!("repo", repo = %repo).entered();

    let remote: LabelSet = api
        .list_labels(repo)
        .map_err(remote_err(repo, "list labels"))?
        .into_iter()
        .collect();
    tracing::info!(count = remote.len(), "fetched remote labels");

    let declared: LabelSet = declared.iter().cloned().collect();
    tracing::debug!(count = declared.len(), "keyed declared labels");

    let plan = plan::plan(&remote, &declared, options.destructive);

    if options.dry_run {
        for op in &plan.ops {
            tracing::info!(%op, "[dry-run] would {}", op.verb());
        }
    } else {
        apply(api, repo, &plan)?;
    }

    tracing::info!(
        created = plan.count("create"),
        updated = plan.count("update"),
        deleted = plan.count("delete"),
        unchanged = plan.unchanged,
        "labels reconciled"
    );

    Ok(ReconcileReport {
        repo: repo.clone(),
        remote_count: remote.len(),
        declared_count: declared.len(),
        plan,
        applied: !options.dry_run,
    })
}

/// Execute `plan` against `repo` in order. The first failure aborts.
pub fn apply<A>(api: &A, repo: &RepoRef, plan: &LabelPlan) -> Result<(), LabelError>
where
    A: LabelApi + ?Sized,
{
    for op in &plan.ops {
        let _span = tracing::debug_span!("label", name = op.name()).entered();
        match op {
            LabelOp::Delete { label } => api
                .delete_label(repo, &label.name)
                .map_err(remote_err(repo, "delete label"))?,
            LabelOp::Create { label } => api
                .create_label(repo, label)
                .map_err(remote_err(repo, "create label"))?,
            LabelOp::Update { current, desired } => api
                .edit_label(repo, &current.name, desired)
                .map_err(remote_err(repo, "edit label"))?,
        }
        tracing::info!(%op, "applied");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
