//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge`
//! trait for use in tests. It stores remote state in memory, records every
//! operation for verification, and allows configuring failure scenarios.
//!
//! # Example
//!
//! ```
//! use forgeform::forge::mock::MockForge;
//! use forgeform::forge::{CreateLabelRequest, Forge, RemoteRepository};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::with_repository(RemoteRepository {
//!     name: "example".to_string(),
//!     description: None,
//!     visibility: "public".to_string(),
//!     default_branch: "main".to_string(),
//!     allow_auto_merge: false,
//!     allow_squash_merge: true,
//!     allow_rebase_merge: false,
//!     delete_branch_on_merge: true,
//!     has_downloads: true,
//!     has_issues: true,
//!     has_projects: true,
//! });
//!
//! let label = forge.create_label(CreateLabelRequest {
//!     name: "Critical".to_string(),
//!     color: "ff0000".to_string(),
//!     description: None,
//! }).await.unwrap();
//!
//! assert_eq!(label.color, "ff0000");
//! let found = forge.get_label("Critical").await.unwrap();
//! assert!(found.is_some());
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{
    ApplyProtectionRequest, CreateLabelRequest, CreateRepositoryRequest, Forge, ForgeError,
    RemoteLabel, RemoteProtection, RemoteRepository, UpdateLabelRequest, UpdateRepositoryRequest,
};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// The bound repository, if created.
    repository: Option<RemoteRepository>,
    /// Protection rules by pattern.
    protections: HashMap<String, RemoteProtection>,
    /// Labels by name.
    labels: HashMap<String, RemoteLabel>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail get_repository with the given error.
    GetRepository(ForgeError),
    /// Fail create_repository with the given error.
    CreateRepository(ForgeError),
    /// Fail update_repository with the given error.
    UpdateRepository(ForgeError),
    /// Fail set_default_branch with the given error.
    SetDefaultBranch(ForgeError),
    /// Fail get_branch_protection with the given error.
    GetBranchProtection(ForgeError),
    /// Fail apply_branch_protection with the given error.
    ApplyBranchProtection(ForgeError),
    /// Fail get_label with the given error.
    GetLabel(ForgeError),
    /// Fail create_label with the given error.
    CreateLabel(ForgeError),
    /// Fail update_label with the given error.
    UpdateLabel(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetRepository,
    CreateRepository { name: String },
    UpdateRepository,
    SetDefaultBranch { branch: String },
    GetBranchProtection { pattern: String },
    ApplyBranchProtection { pattern: String },
    GetLabel { name: String },
    CreateLabel { name: String },
    UpdateLabel { name: String },
}

impl MockForge {
    /// Create a new empty mock forge (no repository exists yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock forge with a pre-existing repository.
    pub fn with_repository(repository: RemoteRepository) -> Self {
        let forge = Self::new();
        {
            let mut inner = forge.inner.lock().unwrap();
            inner.repository = Some(repository);
        }
        forge
    }

    /// Seed a pre-existing label.
    pub fn with_label(self, label: RemoteLabel) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.labels.insert(label.name.clone(), label);
        }
        self
    }

    /// Seed a pre-existing protection rule.
    pub fn with_protection(self, protection: RemoteProtection) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner
                .protections
                .insert(protection.pattern.clone(), protection);
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use forgeform::forge::mock::{FailOn, MockForge};
    /// use forgeform::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreateLabel(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    ///
    /// Useful for verifying call order and arguments.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Get the current repository state, if any.
    pub fn repository(&self) -> Option<RemoteRepository> {
        self.inner.lock().unwrap().repository.clone()
    }

    /// Get a stored protection rule by pattern.
    pub fn protection(&self, pattern: &str) -> Option<RemoteProtection> {
        self.inner.lock().unwrap().protections.get(pattern).cloned()
    }

    /// Get a stored label by name.
    pub fn label(&self, name: &str) -> Option<RemoteLabel> {
        self.inner.lock().unwrap().labels.get(name).cloned()
    }
}

macro_rules! maybe_fail {
    ($inner:expr, $variant:ident) => {
        if let Some(FailOn::$variant(err)) = &$inner.fail_on {
            return Err(err.clone());
        }
    };
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_repository(&self) -> Result<Option<RemoteRepository>, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::GetRepository);
        maybe_fail!(inner, GetRepository);
        Ok(inner.repository.clone())
    }

    async fn create_repository(
        &self,
        request: CreateRepositoryRequest,
    ) -> Result<RemoteRepository, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateRepository {
            name: request.name.clone(),
        });
        maybe_fail!(inner, CreateRepository);

        if inner.repository.is_some() {
            return Err(ForgeError::ApiError {
                status: 422,
                message: "name already exists on this account".to_string(),
            });
        }

        let repository = RemoteRepository {
            name: request.name,
            description: request.description,
            visibility: request.visibility,
            default_branch: "main".to_string(),
            allow_auto_merge: request.allow_auto_merge,
            allow_squash_merge: request.allow_squash_merge,
            allow_rebase_merge: request.allow_rebase_merge,
            delete_branch_on_merge: request.delete_branch_on_merge,
            has_downloads: request.has_downloads,
            has_issues: request.has_issues,
            has_projects: request.has_projects,
        };
        inner.repository = Some(repository.clone());
        Ok(repository)
    }

    async fn update_repository(
        &self,
        request: UpdateRepositoryRequest,
    ) -> Result<RemoteRepository, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::UpdateRepository);
        maybe_fail!(inner, UpdateRepository);

        let repository = inner
            .repository
            .as_mut()
            .ok_or_else(|| ForgeError::NotFound("repository".to_string()))?;
        repository.description = request.description;
        repository.visibility = request.visibility;
        repository.allow_auto_merge = request.allow_auto_merge;
        repository.allow_squash_merge = request.allow_squash_merge;
        repository.allow_rebase_merge = request.allow_rebase_merge;
        repository.delete_branch_on_merge = request.delete_branch_on_merge;
        repository.has_downloads = request.has_downloads;
        repository.has_issues = request.has_issues;
        repository.has_projects = request.has_projects;
        Ok(repository.clone())
    }

    async fn set_default_branch(&self, branch: &str) -> Result<(), ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::SetDefaultBranch {
            branch: branch.to_string(),
        });
        maybe_fail!(inner, SetDefaultBranch);

        let repository = inner
            .repository
            .as_mut()
            .ok_or_else(|| ForgeError::NotFound("repository".to_string()))?;
        repository.default_branch = branch.to_string();
        Ok(())
    }

    async fn get_branch_protection(
        &self,
        pattern: &str,
    ) -> Result<Option<RemoteProtection>, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::GetBranchProtection {
            pattern: pattern.to_string(),
        });
        maybe_fail!(inner, GetBranchProtection);
        Ok(inner.protections.get(pattern).cloned())
    }

    async fn apply_branch_protection(
        &self,
        request: ApplyProtectionRequest,
    ) -> Result<(), ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::ApplyBranchProtection {
            pattern: request.pattern.clone(),
        });
        maybe_fail!(inner, ApplyBranchProtection);

        if inner.repository.is_none() {
            return Err(ForgeError::NotFound("repository".to_string()));
        }

        let protection = RemoteProtection {
            pattern: request.pattern.clone(),
            require_conversation_resolution: request.require_conversation_resolution,
            required_approving_review_count: request.required_approving_review_count,
            required_status_checks: request.required_status_checks,
            strict_status_checks: request.strict_status_checks,
            enforce_admins: request.enforce_admins,
        };
        inner.protections.insert(request.pattern, protection);
        Ok(())
    }

    async fn get_label(&self, name: &str) -> Result<Option<RemoteLabel>, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::GetLabel {
            name: name.to_string(),
        });
        maybe_fail!(inner, GetLabel);
        Ok(inner.labels.get(name).cloned())
    }

    async fn create_label(&self, request: CreateLabelRequest) -> Result<RemoteLabel, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::CreateLabel {
            name: request.name.clone(),
        });
        maybe_fail!(inner, CreateLabel);

        if inner.repository.is_none() {
            return Err(ForgeError::NotFound("repository".to_string()));
        }
        if inner.labels.contains_key(&request.name) {
            return Err(ForgeError::ApiError {
                status: 422,
                message: "already_exists".to_string(),
            });
        }

        let label = RemoteLabel {
            name: request.name.clone(),
            color: request.color.to_ascii_lowercase(),
            description: request.description,
        };
        inner.labels.insert(request.name, label.clone());
        Ok(label)
    }

    async fn update_label(&self, request: UpdateLabelRequest) -> Result<RemoteLabel, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::UpdateLabel {
            name: request.name.clone(),
        });
        maybe_fail!(inner, UpdateLabel);

        let label = inner
            .labels
            .get_mut(&request.name)
            .ok_or_else(|| ForgeError::NotFound(format!("label '{}'", request.name)))?;
        label.color = request.color.to_ascii_lowercase();
        label.description = request.description;
        Ok(label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str) -> CreateRepositoryRequest {
        CreateRepositoryRequest {
            name: name.to_string(),
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
        }
    }

    #[tokio::test]
    async fn empty_forge_has_no_repository() {
        let forge = MockForge::new();
        assert!(forge.get_repository().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_then_get_repository() {
        let forge = MockForge::new();
        forge.create_repository(create_request("example")).await.unwrap();

        let repo = forge.get_repository().await.unwrap().unwrap();
        assert_eq!(repo.name, "example");
        assert_eq!(repo.default_branch, "main");
    }

    #[tokio::test]
    async fn duplicate_repository_is_api_error() {
        let forge = MockForge::new();
        forge.create_repository(create_request("example")).await.unwrap();
        let err = forge
            .create_repository(create_request("example"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::ApiError { status: 422, .. }));
    }

    #[tokio::test]
    async fn set_default_branch_requires_repository() {
        let forge = MockForge::new();
        let err = forge.set_default_branch("main").await.unwrap_err();
        assert!(matches!(err, ForgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn protection_upsert_replaces() {
        let forge = MockForge::new();
        forge.create_repository(create_request("example")).await.unwrap();

        let request = ApplyProtectionRequest {
            pattern: "main".to_string(),
            require_conversation_resolution: true,
            required_approving_review_count: 1,
            required_status_checks: vec!["Compile and test".to_string()],
            strict_status_checks: false,
            enforce_admins: false,
        };
        forge.apply_branch_protection(request.clone()).await.unwrap();

        let mut second = request;
        second.required_approving_review_count = 2;
        forge.apply_branch_protection(second).await.unwrap();

        let stored = forge.protection("main").unwrap();
        assert_eq!(stored.required_approving_review_count, 2);
    }

    #[tokio::test]
    async fn fail_on_scripted_error() {
        let forge = MockForge::new().fail_on(FailOn::GetRepository(ForgeError::RateLimited));
        let err = forge.get_repository().await.unwrap_err();
        assert!(matches!(err, ForgeError::RateLimited));

        forge.clear_fail_on();
        assert!(forge.get_repository().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn operations_are_recorded_in_order() {
        let forge = MockForge::new();
        forge.create_repository(create_request("example")).await.unwrap();
        forge.set_default_branch("main").await.unwrap();

        assert_eq!(
            forge.operations(),
            vec![
                MockOperation::CreateRepository {
                    name: "example".to_string()
                },
                MockOperation::SetDefaultBranch {
                    branch: "main".to_string()
                },
            ]
        );
    }
}
