//! engine::scan
//!
//! Remote state snapshot.
//!
//! # Design
//!
//! Scanning reads the actual state of every declared resource through the
//! forge before planning. Absent resources are recorded as absent rather
//! than treated as errors, so the planner can decide between create and
//! update steps.
//!
//! When the repository itself is absent, dependent lookups are skipped:
//! nothing under a missing repository can exist.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::resource::{Configuration, ResourceSpec};
use crate::forge::{Forge, ForgeError, RemoteLabel, RemoteProtection, RemoteRepository};

/// Errors from scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Forge read failed.
    #[error("forge error: {0}")]
    Forge(#[from] ForgeError),
}

/// Actual remote state of the declared resources.
#[derive(Debug, Clone, Default)]
pub struct RemoteSnapshot {
    /// The repository, if it exists.
    pub repository: Option<RemoteRepository>,
    /// Protection rules by pattern, for patterns the configuration declares.
    pub protections: HashMap<String, RemoteProtection>,
    /// Labels by name, for names the configuration declares.
    pub labels: HashMap<String, RemoteLabel>,
}

/// Read the actual remote state of everything a configuration declares.
///
/// # Errors
///
/// Returns `ScanError::Forge` on any provider failure other than a
/// missing resource.
pub async fn scan(
    forge: &dyn Forge,
    configuration: &Configuration,
) -> Result<RemoteSnapshot, ScanError> {
    let mut snapshot = RemoteSnapshot {
        repository: forge.get_repository().await?,
        ..Default::default()
    };

    if snapshot.repository.is_none() {
        return Ok(snapshot);
    }

    for (_, descriptor) in configuration.iter() {
        match &descriptor.spec {
            ResourceSpec::BranchProtection(spec) => {
                let pattern = spec.pattern.as_str();
                if let Some(protection) = forge.get_branch_protection(pattern).await? {
                    snapshot.protections.insert(pattern.to_string(), protection);
                }
            }
            ResourceSpec::IssueLabel(spec) => {
                let name = spec.name.as_str();
                if let Some(label) = forge.get_label(name).await? {
                    snapshot.labels.insert(name.to_string(), label);
                }
            }
            // Repository state is already read; the default branch rides
            // along on the repository response.
            ResourceSpec::Repository(_) | ResourceSpec::DefaultBranch(_) => {}
        }
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assemble::assemble;
    use crate::core::config::schema::Manifest;
    use crate::forge::mock::{MockForge, MockOperation};
    use crate::forge::CreateRepositoryRequest;

    fn manifest() -> Manifest {
        toml::from_str(
            r#"
            [forge]
            owner = "o"

            [repository]
            name = "example"

            [protection]
            name = "rule"
            required_status_checks = ["Compile and test"]

            [[labels]]
            name = "Critical"
            color = "FF0000"
            "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn missing_repository_skips_dependent_reads() {
        let forge = MockForge::new();
        let config = assemble(&manifest()).unwrap();

        let snapshot = scan(&forge, &config).await.unwrap();
        assert!(snapshot.repository.is_none());
        assert!(snapshot.protections.is_empty());
        assert!(snapshot.labels.is_empty());
        assert_eq!(forge.operations(), vec![MockOperation::GetRepository]);
    }

    #[tokio::test]
    async fn existing_resources_are_snapshotted() {
        let forge = MockForge::new();
        forge
            .create_repository(CreateRepositoryRequest {
                name: "example".to_string(),
                description: None,
                visibility: "public".to_string(),
                auto_init: true,
                allow_auto_merge: false,
                allow_squash_merge: true,
                allow_rebase_merge: false,
                delete_branch_on_merge: true,
                has_downloads: true,
                has_issues: true,
                has_projects: true,
            })
            .await
            .unwrap();

        let config = assemble(&manifest()).unwrap();
        let snapshot = scan(&forge, &config).await.unwrap();

        assert!(snapshot.repository.is_some());
        // declared but not yet created remotely
        assert!(snapshot.protections.is_empty());
        assert!(snapshot.labels.is_empty());
    }

    #[tokio::test]
    async fn forge_failure_surfaces() {
        use crate::forge::mock::FailOn;

        let forge = MockForge::new().fail_on(FailOn::GetRepository(ForgeError::RateLimited));
        let config = assemble(&manifest()).unwrap();

        let err = scan(&forge, &config).await.unwrap_err();
        assert!(matches!(err, ScanError::Forge(ForgeError::RateLimited)));
    }
}
