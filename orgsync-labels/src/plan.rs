//! Pure label diffing: remote set + declared set → ordered operations.
//!
//! Ordering: every delete comes first (only when removal is enabled), then
//! one create or update per declared key in key order. Matched-and-equal
//! labels produce no operation, which is what makes reconciliation
//! idempotent.

use std::fmt;

use orgsync_core::{Label, LabelSet};

/// One mutating call against the remote label collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelOp {
    /// Remove a remote label absent from the declared set.
    Delete { label: Label },
    /// Create a declared label absent from the remote set.
    Create { label: Label },
    /// Edit a remote label in place; `current` is what the remote holds now.
    Update { current: Label, desired: Label },
}

impl LabelOp {
    /// Short verb used in logs and tables.
    pub fn verb(&self) -> &'static str {
        match self {
            LabelOp::Delete { .. } => "delete",
            LabelOp::Create { .. } => "create",
            LabelOp::Update { .. } => "update",
        }
    }

    /// Name of the label as it will exist (or existed, for deletes).
    pub fn name(&self) -> &str {
        match self {
            LabelOp::Delete { label } | LabelOp::Create { label } => &label.name,
            LabelOp::Update { desired, .. } => &desired.name,
        }
    }
}

impl fmt::Display for LabelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelOp::Delete { label } => write!(f, "- {}", label.name),
            LabelOp::Create { label } => write!(f, "+ {} (#{})", label.name, label.color),
            LabelOp::Update { current, desired } => {
                write!(f, "~ {}", current.name)?;
                for field in desired.differences(current) {
                    match field {
                        "name" => write!(f, " name: {} -> {};", current.name, desired.name)?,
                        "color" => write!(f, " color: #{} -> #{};", current.color, desired.color)?,
                        _ => write!(
                            f,
                            " description: {:?} -> {:?};",
                            current.description, desired.description
                        )?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Ordered operations plus the number of labels already in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPlan {
    pub ops: Vec<LabelOp>,
    pub unchanged: usize,
}

impl LabelPlan {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn count(&self, verb: &str) -> usize {
        self.ops.iter().filter(|op| op.verb() == verb).count()
    }
}

/// Compute the operations that converge `remote` to `declared`.
///
/// With `destructive` unset, remote-only labels are left untouched.
pub fn plan(remote: &LabelSet, declared: &LabelSet, destructive: bool) -> LabelPlan {
    let mut result = LabelPlan::default();

    if destructive {
        for (key, label) in remote {
            if !declared.contains(key) {
                result.ops.push(LabelOp::Delete {
                    label: label.clone(),
                });
            }
        }
    }

    for (key, desired) in declared {
        match remote.get(key) {
            None => result.ops.push(LabelOp::Create {
                label: desired.clone(),
            }),
            Some(current) if current != desired => result.ops.push(LabelOp::Update {
                current: current.clone(),
                desired: desired.clone(),
            }),
            Some(_) => result.unchanged += 1,
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
