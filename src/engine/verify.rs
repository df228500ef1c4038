//! engine::verify
//!
//! Fast post-apply verification.
//!
//! # Design
//!
//! After a successful apply, the engine re-scans the remote state and
//! replans. The residual plan must be empty; anything left over means the
//! forge did not converge to the declared state (or something changed it
//! concurrently), which is surfaced as drift rather than silently
//! accepted.

use thiserror::Error;

use super::plan::{build_plan, PlanError};
use super::scan::{scan, ScanError};
use crate::core::graph::OrderedConfiguration;
use crate::forge::Forge;

/// Errors from verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Re-scan failed.
    #[error("re-scan failed: {0}")]
    Scan(#[from] ScanError),

    /// Re-plan failed.
    #[error("re-plan failed: {0}")]
    Plan(#[from] PlanError),

    /// Remote state still diverges from the declared state.
    #[error("remote state diverges after apply: {residual} step(s) still pending (first: {first})")]
    Drift {
        /// Number of residual steps.
        residual: usize,
        /// Description of the first residual step.
        first: String,
    },
}

/// Verify that remote state now matches the declared configuration.
///
/// # Errors
///
/// Returns `VerifyError::Drift` if a re-plan against fresh remote state
/// still produces steps.
pub async fn fast_verify(
    forge: &dyn Forge,
    ordered: &OrderedConfiguration,
) -> Result<(), VerifyError> {
    let snapshot = scan(forge, ordered.configuration()).await?;
    let residual = build_plan(ordered, &snapshot)?;

    if !residual.is_empty() {
        let first = residual.steps[0].description();
        return Err(VerifyError::Drift {
            residual: residual.steps.len(),
            first,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assemble::assemble;
    use crate::core::config::schema::Manifest;
    use crate::core::graph::link;
    use crate::engine::exec::Executor;
    use crate::engine::plan::build_plan;
    use crate::engine::scan::RemoteSnapshot;
    use crate::engine::Context;
    use crate::forge::mock::MockForge;

    fn ordered() -> OrderedConfiguration {
        let manifest: Manifest = toml::from_str(
            r#"
            [forge]
            owner = "o"

            [repository]
            name = "example"

            [[labels]]
            name = "Critical"
            color = "FF0000"
            "#,
        )
        .unwrap();
        link(assemble(&manifest).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn verify_passes_after_full_apply() {
        let forge = MockForge::new();
        let ordered = ordered();
        let plan = build_plan(&ordered, &RemoteSnapshot::default()).unwrap();
        let result = Executor::new(&forge)
            .execute(&plan, &Context::default())
            .await;
        assert!(result.is_success());

        fast_verify(&forge, &ordered).await.unwrap();
    }

    #[tokio::test]
    async fn verify_reports_drift_on_untouched_remote() {
        let forge = MockForge::new();
        let ordered = ordered();

        let err = fast_verify(&forge, &ordered).await.unwrap_err();
        match err {
            VerifyError::Drift { residual, first } => {
                assert_eq!(residual, 3);
                assert!(first.contains("example"));
            }
            other => panic!("expected drift, got {:?}", other),
        }
    }
}
