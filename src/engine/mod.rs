//! engine
//!
//! Orchestrates the command lifecycle: Assemble → Link → Scan → Plan →
//! Execute → Verify.
//!
//! # Architecture
//!
//! The engine is the central coordinator for all Forgeform commands:
//!
//! 1. **Assemble**: Build the typed configuration from the manifest
//! 2. **Link**: Resolve references into a dependency-ordered sequence
//! 3. **Scan**: Read actual remote state through the forge
//! 4. **Plan**: Diff desired against actual into a deterministic plan
//! 5. **Execute**: Apply the plan through the single executor
//! 6. **Verify**: Re-scan and confirm the remote state converged
//!
//! Assemble, Link, and Plan are pure; the first network call happens in
//! Scan, strictly after the full configuration has validated. A
//! validation or cycle failure therefore aborts the invocation before any
//! remote side effect.
//!
//! # Invariants
//!
//! - Commands execute only against linked configurations
//! - The engine never performs mutations directly; all flow through the
//!   Executor
//! - Provider errors surface as-is; the engine performs no retries

pub mod exec;
pub mod plan;
pub mod scan;
pub mod verify;

// Re-exports for convenience
pub use exec::{ApplyReport, ExecuteError, ExecuteResult, Executor};
pub use plan::{build_plan, OpId, Plan, PlanError, PlanStep};
pub use scan::{scan, RemoteSnapshot, ScanError};
pub use verify::{fast_verify, VerifyError};

use crate::core::assemble::{assemble, AssembleError};
use crate::core::config::schema::Manifest;
use crate::core::graph::{link, CycleError, OrderedConfiguration};
use crate::forge::Forge;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command
/// behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Machine-readable JSON output.
    pub json: bool,
}

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Assembly failed.
    #[error("assembly failed: {0}")]
    Assemble(#[from] AssembleError),

    /// Linking failed.
    #[error("link failed: {0}")]
    Link(#[from] CycleError),

    /// Scan failed.
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),

    /// Planning failed.
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),

    /// Execution failed.
    #[error("execution failed: {0}")]
    Execute(#[from] ExecuteError),

    /// Verification failed.
    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),
}

/// Assemble a manifest and resolve its apply order.
///
/// The pure front half of the lifecycle; used on its own by `validate`.
pub fn assemble_and_link(manifest: &Manifest) -> Result<OrderedConfiguration, EngineError> {
    let configuration = assemble(manifest)?;
    Ok(link(configuration)?)
}

/// Run the read-only lifecycle: Assemble → Link → Scan → Plan.
pub async fn run_plan(forge: &dyn Forge, manifest: &Manifest) -> Result<Plan, EngineError> {
    let ordered = assemble_and_link(manifest)?;
    let snapshot = scan(forge, ordered.configuration()).await?;
    Ok(build_plan(&ordered, &snapshot)?)
}

/// Run the full lifecycle: Assemble → Link → Scan → Plan → Execute → Verify.
///
/// Returns the executed plan and the apply report.
///
/// # Errors
///
/// An aborted execution is returned as `EngineError::Execute` with the
/// applied-step count; verification drift after a successful apply is
/// `EngineError::Verify`.
pub async fn run_apply(
    forge: &dyn Forge,
    manifest: &Manifest,
    ctx: &Context,
) -> Result<(Plan, ApplyReport), EngineError> {
    let ordered = assemble_and_link(manifest)?;
    let snapshot = scan(forge, ordered.configuration()).await?;
    let plan = build_plan(&ordered, &snapshot)?;

    let executor = Executor::new(forge);
    let report = match executor.execute(&plan, ctx).await {
        ExecuteResult::Success { report } => report,
        ExecuteResult::Aborted {
            error,
            applied_steps,
        } => {
            return Err(EngineError::Execute(ExecuteError::Aborted {
                applied: applied_steps.len(),
                total: plan.steps.len(),
                message: error.to_string(),
            }));
        }
    };

    fast_verify(forge, &ordered).await?;

    Ok((plan, report))
}
