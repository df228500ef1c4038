//! engine::plan
//!
//! Deterministic plan generation.
//!
//! # Architecture
//!
//! Plans are the sole intermediate representation between the linked
//! configuration and remote mutation.
//!
//! Plans are:
//! - **Deterministic**: Same configuration and snapshot always produce the
//!   same steps and digest
//! - **Previewable**: Can be shown to the user before execution
//! - **Serializable**: Can be emitted as JSON for tooling
//! - **Typed**: Steps are strongly typed with the full desired state
//!
//! # Invariants
//!
//! - The planner does not perform I/O
//! - The planner does not mutate any state
//! - Steps follow the linked order, so every step touching a dependent
//!   resource comes after the steps for its dependencies

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use super::scan::RemoteSnapshot;
use crate::core::graph::OrderedConfiguration;
use crate::core::resource::{
    BranchProtectionSpec, IssueLabelSpec, RepositorySpec, ResourceKind, ResourceSpec,
};
use crate::core::types::BranchName;
use crate::forge::{RemoteLabel, RemoteProtection, RemoteRepository};

/// Errors from planning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The configuration declares resources under a repository that is
    /// neither declared nor present remotely.
    #[error("no repository to hold '{0}': declare one or create it first")]
    MissingRepository(String),
}

/// A unique operation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpId(String);

impl OpId {
    /// Generate a new unique operation id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OpId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed plan step.
///
/// Each step carries the full desired state the executor needs to apply
/// it, so execution never re-reads the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanStep {
    /// Create the repository.
    CreateRepository {
        /// Desired repository state.
        spec: RepositorySpec,
        /// Human-readable reason for the step.
        reason: String,
    },

    /// Update repository settings in place.
    UpdateRepository {
        /// Desired repository state.
        spec: RepositorySpec,
        /// Human-readable reason for the step.
        reason: String,
    },

    /// Set the repository's default branch.
    SetDefaultBranch {
        /// Desired default branch.
        branch: BranchName,
        /// Human-readable reason for the step.
        reason: String,
    },

    /// Create or replace a branch protection rule.
    ApplyBranchProtection {
        /// Desired protection state.
        spec: BranchProtectionSpec,
        /// Human-readable reason for the step.
        reason: String,
    },

    /// Create an issue label.
    CreateLabel {
        /// Desired label state.
        spec: IssueLabelSpec,
        /// Human-readable reason for the step.
        reason: String,
    },

    /// Update an issue label in place.
    UpdateLabel {
        /// Desired label state.
        spec: IssueLabelSpec,
        /// Human-readable reason for the step.
        reason: String,
    },
}

impl PlanStep {
    /// Get a human-readable description of this step.
    pub fn description(&self) -> String {
        match self {
            PlanStep::CreateRepository { spec, reason } => {
                format!("Create repository '{}': {}", spec.name, reason)
            }
            PlanStep::UpdateRepository { spec, reason } => {
                format!("Update repository '{}': {}", spec.name, reason)
            }
            PlanStep::SetDefaultBranch { branch, reason } => {
                format!("Set default branch to '{}': {}", branch, reason)
            }
            PlanStep::ApplyBranchProtection { spec, reason } => {
                format!("Protect branches matching '{}': {}", spec.pattern, reason)
            }
            PlanStep::CreateLabel { spec, reason } => {
                format!("Create label '{}' (#{}): {}", spec.name, spec.color, reason)
            }
            PlanStep::UpdateLabel { spec, reason } => {
                format!("Update label '{}' (#{}): {}", spec.name, spec.color, reason)
            }
        }
    }

    /// Kind of resource this step touches.
    pub fn kind(&self) -> ResourceKind {
        match self {
            PlanStep::CreateRepository { .. } | PlanStep::UpdateRepository { .. } => {
                ResourceKind::Repository
            }
            PlanStep::SetDefaultBranch { .. } => ResourceKind::DefaultBranch,
            PlanStep::ApplyBranchProtection { .. } => ResourceKind::BranchProtection,
            PlanStep::CreateLabel { .. } | PlanStep::UpdateLabel { .. } => ResourceKind::IssueLabel,
        }
    }
}

/// A deterministic, previewable plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique id for this plan instance.
    pub op_id: OpId,
    /// Command that produced the plan.
    pub command: String,
    /// Steps in apply order.
    pub steps: Vec<PlanStep>,
}

impl Plan {
    /// Create an empty plan.
    pub fn new(op_id: OpId, command: impl Into<String>) -> Self {
        Self {
            op_id,
            command: command.into(),
            steps: Vec::new(),
        }
    }

    /// Add a step (builder style).
    pub fn with_step(mut self, step: PlanStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Check whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Digest of the plan's steps.
    ///
    /// The digest covers the steps only, not the op id, so two plans for
    /// identical desired and actual state have identical digests.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for step in &self.steps {
            // Steps serialize deterministically: struct fields in order.
            if let Ok(bytes) = serde_json::to_vec(step) {
                hasher.update(&bytes);
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Render the plan for display.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No changes. Remote state matches the configuration.".to_string();
        }

        let mut out = format!(
            "Plan {} ({} step{}):\n",
            &self.digest()[..12],
            self.steps.len(),
            if self.steps.len() == 1 { "" } else { "s" }
        );
        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, step.description()));
        }
        out
    }
}

/// Build a plan by diffing desired state against a remote snapshot.
///
/// Steps are emitted in the linked order, so dependents are created after
/// their dependencies. Resources whose actual state already matches are
/// skipped.
///
/// # Errors
///
/// Returns `PlanError::MissingRepository` when dependent resources are
/// declared but there is no repository, declared or remote, to hold them.
pub fn build_plan(
    ordered: &OrderedConfiguration,
    snapshot: &RemoteSnapshot,
) -> Result<Plan, PlanError> {
    let config = ordered.configuration();
    let declares_repository = config
        .iter()
        .any(|(_, d)| d.kind() == ResourceKind::Repository);

    let mut plan = Plan::new(OpId::new(), "apply");

    for (_, descriptor) in ordered.iter() {
        match &descriptor.spec {
            ResourceSpec::Repository(spec) => match &snapshot.repository {
                None => {
                    plan.steps.push(PlanStep::CreateRepository {
                        spec: spec.clone(),
                        reason: "not present on the forge".to_string(),
                    });
                }
                Some(actual) => {
                    let drift = repository_drift(spec, actual);
                    if !drift.is_empty() {
                        plan.steps.push(PlanStep::UpdateRepository {
                            spec: spec.clone(),
                            reason: format!("settings differ ({})", drift.join(", ")),
                        });
                    }
                }
            },

            ResourceSpec::DefaultBranch(spec) => {
                if !declares_repository && snapshot.repository.is_none() {
                    return Err(PlanError::MissingRepository(
                        descriptor.name.as_str().to_string(),
                    ));
                }
                let matches = snapshot
                    .repository
                    .as_ref()
                    .is_some_and(|r| r.default_branch == spec.branch.as_str());
                if !matches {
                    plan.steps.push(PlanStep::SetDefaultBranch {
                        branch: spec.branch.clone(),
                        reason: "default branch differs".to_string(),
                    });
                }
            }

            ResourceSpec::BranchProtection(spec) => {
                if !declares_repository && snapshot.repository.is_none() {
                    return Err(PlanError::MissingRepository(
                        descriptor.name.as_str().to_string(),
                    ));
                }
                match snapshot.protections.get(spec.pattern.as_str()) {
                    Some(actual) if protection_matches(spec, actual) => {}
                    Some(_) => {
                        plan.steps.push(PlanStep::ApplyBranchProtection {
                            spec: spec.clone(),
                            reason: "rule differs".to_string(),
                        });
                    }
                    None => {
                        plan.steps.push(PlanStep::ApplyBranchProtection {
                            spec: spec.clone(),
                            reason: "not present on the forge".to_string(),
                        });
                    }
                }
            }

            ResourceSpec::IssueLabel(spec) => {
                if !declares_repository && snapshot.repository.is_none() {
                    return Err(PlanError::MissingRepository(
                        descriptor.name.as_str().to_string(),
                    ));
                }
                match snapshot.labels.get(spec.name.as_str()) {
                    Some(actual) if label_matches(spec, actual) => {}
                    Some(_) => {
                        plan.steps.push(PlanStep::UpdateLabel {
                            spec: spec.clone(),
                            reason: "color or description differs".to_string(),
                        });
                    }
                    None => {
                        plan.steps.push(PlanStep::CreateLabel {
                            spec: spec.clone(),
                            reason: "not present on the forge".to_string(),
                        });
                    }
                }
            }
        }
    }

    Ok(plan)
}

/// Field names where the desired repository state differs from the actual.
fn repository_drift(spec: &RepositorySpec, actual: &RemoteRepository) -> Vec<&'static str> {
    let mut drift = Vec::new();
    if spec.description != actual.description {
        drift.push("description");
    }
    if spec.visibility.as_str() != actual.visibility {
        drift.push("visibility");
    }
    if spec.allow_auto_merge != actual.allow_auto_merge {
        drift.push("allow_auto_merge");
    }
    if spec.allow_squash_merge != actual.allow_squash_merge {
        drift.push("allow_squash_merge");
    }
    if spec.allow_rebase_merge != actual.allow_rebase_merge {
        drift.push("allow_rebase_merge");
    }
    if spec.delete_branch_on_merge != actual.delete_branch_on_merge {
        drift.push("delete_branch_on_merge");
    }
    if spec.has_downloads != actual.has_downloads {
        drift.push("has_downloads");
    }
    if spec.has_issues != actual.has_issues {
        drift.push("has_issues");
    }
    if spec.has_projects != actual.has_projects {
        drift.push("has_projects");
    }
    drift
}

fn protection_matches(spec: &BranchProtectionSpec, actual: &RemoteProtection) -> bool {
    // Contexts compare as sets; forges do not preserve declaration order.
    let mut desired_checks = spec.required_status_checks.clone();
    desired_checks.sort();
    let mut actual_checks = actual.required_status_checks.clone();
    actual_checks.sort();

    spec.require_conversation_resolution == actual.require_conversation_resolution
        && spec.required_approving_review_count.value() == actual.required_approving_review_count
        && desired_checks == actual_checks
        && spec.strict_status_checks == actual.strict_status_checks
        && spec.enforce_admins == actual.enforce_admins
}

fn label_matches(spec: &IssueLabelSpec, actual: &RemoteLabel) -> bool {
    spec.color.as_str() == actual.color.to_ascii_lowercase()
        && spec.description == actual.description
}
