//! forge::traits
//!
//! Forge trait definition for interacting with remote hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully.
//!
//! Forge adapters:
//! - Are invoked only after the full configuration has validated and linked
//! - May fail without compromising local correctness (there is no local
//!   state to corrupt)
//! - Perform no retries; transient failures surface to the caller as-is
//!
//! Read operations return `Option` so that an absent remote resource is a
//! plannable fact rather than an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The operation is not supported by this forge.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Repository state as reported by the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    /// Repository name.
    pub name: String,
    /// Description, if set.
    pub description: Option<String>,
    /// Visibility ("public" or "private").
    pub visibility: String,
    /// Current default branch.
    pub default_branch: String,
    /// Allow auto-merge on pull requests.
    pub allow_auto_merge: bool,
    /// Allow squash merging.
    pub allow_squash_merge: bool,
    /// Allow rebase merging.
    pub allow_rebase_merge: bool,
    /// Delete head branches once merged.
    pub delete_branch_on_merge: bool,
    /// Downloads tab enabled.
    pub has_downloads: bool,
    /// Issue tracker enabled.
    pub has_issues: bool,
    /// Project boards enabled.
    pub has_projects: bool,
}

/// Branch protection state as reported by the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProtection {
    /// Pattern the rule applies to.
    pub pattern: String,
    /// Conversation resolution required before merge.
    pub require_conversation_resolution: bool,
    /// Approvals required before merge.
    pub required_approving_review_count: u8,
    /// Required status check contexts.
    pub required_status_checks: Vec<String>,
    /// Branches must be up to date before merge.
    pub strict_status_checks: bool,
    /// Rule enforced for administrators.
    pub enforce_admins: bool,
}

/// Issue label state as reported by the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLabel {
    /// Label name.
    pub name: String,
    /// Label color (6 hex digits, lowercase).
    pub color: String,
    /// Description, if set.
    pub description: Option<String>,
}

/// Request to create a repository.
#[derive(Debug, Clone)]
pub struct CreateRepositoryRequest {
    /// Repository name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Visibility ("public" or "private").
    pub visibility: String,
    /// Initialize with a first commit.
    pub auto_init: bool,
    /// Allow auto-merge on pull requests.
    pub allow_auto_merge: bool,
    /// Allow squash merging.
    pub allow_squash_merge: bool,
    /// Allow rebase merging.
    pub allow_rebase_merge: bool,
    /// Delete head branches once merged.
    pub delete_branch_on_merge: bool,
    /// Enable the downloads tab.
    pub has_downloads: bool,
    /// Enable the issue tracker.
    pub has_issues: bool,
    /// Enable project boards.
    pub has_projects: bool,
}

/// Request to update repository settings.
///
/// Creation-only attributes (`auto_init`) are absent; everything else
/// mirrors [`CreateRepositoryRequest`].
#[derive(Debug, Clone)]
pub struct UpdateRepositoryRequest {
    /// Optional description.
    pub description: Option<String>,
    /// Visibility ("public" or "private").
    pub visibility: String,
    /// Allow auto-merge on pull requests.
    pub allow_auto_merge: bool,
    /// Allow squash merging.
    pub allow_squash_merge: bool,
    /// Allow rebase merging.
    pub allow_rebase_merge: bool,
    /// Delete head branches once merged.
    pub delete_branch_on_merge: bool,
    /// Enable the downloads tab.
    pub has_downloads: bool,
    /// Enable the issue tracker.
    pub has_issues: bool,
    /// Enable project boards.
    pub has_projects: bool,
}

/// Request to create or replace a branch protection rule.
///
/// Protection rules are upserted: applying the same request twice leaves
/// the same remote state.
#[derive(Debug, Clone)]
pub struct ApplyProtectionRequest {
    /// Pattern for branch names the rule applies to.
    pub pattern: String,
    /// Require conversation resolution before merge.
    pub require_conversation_resolution: bool,
    /// Approvals required before merge.
    pub required_approving_review_count: u8,
    /// Status check contexts that must pass.
    pub required_status_checks: Vec<String>,
    /// Require branches to be up to date before merge.
    pub strict_status_checks: bool,
    /// Enforce for administrators too.
    pub enforce_admins: bool,
}

/// Request to create an issue label.
#[derive(Debug, Clone)]
pub struct CreateLabelRequest {
    /// Label name.
    pub name: String,
    /// Label color (6 hex digits, no leading `#`).
    pub color: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Request to update an issue label in place.
#[derive(Debug, Clone)]
pub struct UpdateLabelRequest {
    /// Existing label name.
    pub name: String,
    /// New color.
    pub color: String,
    /// New description.
    pub description: Option<String>,
}

/// The Forge trait for interacting with remote hosting services.
///
/// This trait provides the abstraction layer for declared-resource
/// operations. v1 implements GitHub only.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `AuthRequired` / `AuthFailed`: Prompt user to export a token
/// - `NotFound`: Resource doesn't exist
/// - `RateLimited`: Back off and retry later (the forge itself never retries)
/// - `ApiError`: Display error message to user
/// - `NetworkError`: Check connectivity
#[async_trait]
pub trait Forge: Send + Sync + std::fmt::Debug {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Get the repository this forge is bound to, if it exists.
    async fn get_repository(&self) -> Result<Option<RemoteRepository>, ForgeError>;

    /// Create the repository.
    ///
    /// # Errors
    ///
    /// - `AuthRequired` / `AuthFailed` on credential problems
    /// - `ApiError` with status 422 if the name is taken or invalid
    async fn create_repository(
        &self,
        request: CreateRepositoryRequest,
    ) -> Result<RemoteRepository, ForgeError>;

    /// Update repository settings.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository doesn't exist
    async fn update_repository(
        &self,
        request: UpdateRepositoryRequest,
    ) -> Result<RemoteRepository, ForgeError>;

    /// Set the repository's default branch.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository doesn't exist
    /// - `ApiError` with status 422 if the branch doesn't exist remotely
    async fn set_default_branch(&self, branch: &str) -> Result<(), ForgeError>;

    /// Get the protection rule for a branch pattern, if one exists.
    async fn get_branch_protection(
        &self,
        pattern: &str,
    ) -> Result<Option<RemoteProtection>, ForgeError>;

    /// Create or replace a branch protection rule.
    async fn apply_branch_protection(
        &self,
        request: ApplyProtectionRequest,
    ) -> Result<(), ForgeError>;

    /// Get an issue label by name, if it exists.
    async fn get_label(&self, name: &str) -> Result<Option<RemoteLabel>, ForgeError>;

    /// Create an issue label.
    async fn create_label(&self, request: CreateLabelRequest) -> Result<RemoteLabel, ForgeError>;

    /// Update an issue label in place.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the label doesn't exist
    async fn update_label(&self, request: UpdateLabelRequest) -> Result<RemoteLabel, ForgeError>;
}
