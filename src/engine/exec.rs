//! engine::exec
//!
//! The single executor.
//!
//! # Architecture
//!
//! The Executor is the ONLY component that mutates remote state. All
//! mutations must flow through this module.
//!
//! # Executor Contract
//!
//! The executor MUST:
//! 1. Apply steps strictly in plan order
//! 2. Stop at the first provider error; no retries
//! 3. Report the applied prefix on abort so the user can see how far the
//!    apply got
//!
//! There is no local state to lock or journal; the forge owns everything
//! the executor touches, and a re-run replans from the current remote
//! state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::plan::{Plan, PlanStep};
use super::Context;
use crate::forge::{
    ApplyProtectionRequest, CreateLabelRequest, CreateRepositoryRequest, Forge, ForgeError,
    UpdateLabelRequest, UpdateRepositoryRequest,
};

/// Errors from execution, as seen by the engine lifecycle.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// Execution stopped before completing the plan.
    #[error("aborted after {applied} of {total} steps: {message}")]
    Aborted {
        /// Steps applied before the failure.
        applied: usize,
        /// Total steps in the plan.
        total: usize,
        /// Provider error message.
        message: String,
    },
}

/// Summary of a completed apply.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    /// Operation id of the executed plan.
    pub op_id: String,
    /// Command that produced the plan.
    pub command: String,
    /// Digest of the executed plan.
    pub digest: String,
    /// Number of steps applied.
    pub applied: usize,
    /// Completion time.
    pub finished_at: DateTime<Utc>,
}

/// Result of executing a plan.
#[derive(Debug)]
pub enum ExecuteResult {
    /// Plan executed successfully.
    Success {
        /// Summary of the apply.
        report: ApplyReport,
    },

    /// Execution aborted due to a provider error.
    Aborted {
        /// Error that caused the abort.
        error: ForgeError,
        /// Steps that were successfully applied.
        applied_steps: Vec<PlanStep>,
    },
}

impl ExecuteResult {
    /// Check if execution was successful.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecuteResult::Success { .. })
    }

    /// Check if execution was aborted.
    pub fn is_aborted(&self) -> bool {
        matches!(self, ExecuteResult::Aborted { .. })
    }
}

/// The executor.
///
/// Applies plans to the forge in order. This is the single mutation
/// pathway for all Forgeform operations.
pub struct Executor<'a> {
    forge: &'a dyn Forge,
}

impl<'a> Executor<'a> {
    /// Create a new executor.
    pub fn new(forge: &'a dyn Forge) -> Self {
        Self { forge }
    }

    /// Execute a plan.
    ///
    /// Applies each step through the forge, stopping at the first error.
    /// Provider errors are reported in the result, not retried.
    pub async fn execute(&self, plan: &Plan, ctx: &Context) -> ExecuteResult {
        if plan.is_empty() && ctx.debug {
            eprintln!("[debug] Empty plan, nothing to execute");
        }

        let mut applied_steps = Vec::new();

        for (i, step) in plan.steps.iter().enumerate() {
            if ctx.debug {
                eprintln!("[debug] Executing step {}: {}", i + 1, step.description());
            }

            if let Err(error) = self.execute_step(step).await {
                return ExecuteResult::Aborted {
                    error,
                    applied_steps,
                };
            }
            applied_steps.push(step.clone());
        }

        ExecuteResult::Success {
            report: ApplyReport {
                op_id: plan.op_id.to_string(),
                command: plan.command.clone(),
                digest: plan.digest(),
                applied: applied_steps.len(),
                finished_at: Utc::now(),
            },
        }
    }

    async fn execute_step(&self, step: &PlanStep) -> Result<(), ForgeError> {
        match step {
            PlanStep::CreateRepository { spec, .. } => {
                self.forge
                    .create_repository(CreateRepositoryRequest {
                        name: spec.name.as_str().to_string(),
                        description: spec.description.clone(),
                        visibility: spec.visibility.as_str().to_string(),
                        auto_init: spec.auto_init,
                        allow_auto_merge: spec.allow_auto_merge,
                        allow_squash_merge: spec.allow_squash_merge,
                        allow_rebase_merge: spec.allow_rebase_merge,
                        delete_branch_on_merge: spec.delete_branch_on_merge,
                        has_downloads: spec.has_downloads,
                        has_issues: spec.has_issues,
                        has_projects: spec.has_projects,
                    })
                    .await?;
            }
            PlanStep::UpdateRepository { spec, .. } => {
                self.forge
                    .update_repository(UpdateRepositoryRequest {
                        description: spec.description.clone(),
                        visibility: spec.visibility.as_str().to_string(),
                        allow_auto_merge: spec.allow_auto_merge,
                        allow_squash_merge: spec.allow_squash_merge,
                        allow_rebase_merge: spec.allow_rebase_merge,
                        delete_branch_on_merge: spec.delete_branch_on_merge,
                        has_downloads: spec.has_downloads,
                        has_issues: spec.has_issues,
                        has_projects: spec.has_projects,
                    })
                    .await?;
            }
            PlanStep::SetDefaultBranch { branch, .. } => {
                self.forge.set_default_branch(branch.as_str()).await?;
            }
            PlanStep::ApplyBranchProtection { spec, .. } => {
                self.forge
                    .apply_branch_protection(ApplyProtectionRequest {
                        pattern: spec.pattern.as_str().to_string(),
                        require_conversation_resolution: spec.require_conversation_resolution,
                        required_approving_review_count: spec
                            .required_approving_review_count
                            .value(),
                        required_status_checks: spec.required_status_checks.clone(),
                        strict_status_checks: spec.strict_status_checks,
                        enforce_admins: spec.enforce_admins,
                    })
                    .await?;
            }
            PlanStep::CreateLabel { spec, .. } => {
                self.forge
                    .create_label(CreateLabelRequest {
                        name: spec.name.as_str().to_string(),
                        color: spec.color.as_str().to_string(),
                        description: spec.description.clone(),
                    })
                    .await?;
            }
            PlanStep::UpdateLabel { spec, .. } => {
                self.forge
                    .update_label(UpdateLabelRequest {
                        name: spec.name.as_str().to_string(),
                        color: spec.color.as_str().to_string(),
                        description: spec.description.clone(),
                    })
                    .await?;
            }
        }
        Ok(())
    }
}
