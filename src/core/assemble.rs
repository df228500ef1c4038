//! core::assemble
//!
//! Builds the full configuration from a manifest.
//!
//! # Design
//!
//! Assembly is pure value construction: it reads the manifest's named
//! fields, funnels every attribute through the validating constructors in
//! [`core::types`](crate::core::types), and records the reference edges
//! between the resulting descriptors. It performs no I/O and cannot fail
//! except through descriptor validation or a duplicate logical name.
//!
//! The emitted reference topology:
//!
//! - default branch → repository
//! - branch protection → repository, default branch
//! - each issue label → repository
//!
//! Calling [`assemble`] twice with the same manifest yields structurally
//! equal configurations.

use thiserror::Error;

use super::config::schema::Manifest;
use super::resource::{
    BranchProtectionSpec, Configuration, DefaultBranchSpec, Descriptor, IssueLabelSpec,
    RepositorySpec, ResourceKind, ResourceSpec, ValidationError, Visibility,
};
use super::types::{BranchName, LabelColor, ResourceName, ReviewCount};

/// Errors from configuration assembly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("duplicate {kind} '{name}'")]
    Duplicate {
        kind: ResourceKind,
        name: ResourceName,
    },
}

impl From<crate::core::types::TypeError> for AssembleError {
    fn from(err: crate::core::types::TypeError) -> Self {
        AssembleError::Validation(ValidationError::Type(err))
    }
}

/// Assemble the descriptor set and reference edges for one invocation.
///
/// # Errors
///
/// Returns `AssembleError::Validation` when any manifest attribute fails
/// descriptor validation, and `AssembleError::Duplicate` when two
/// descriptors of the same kind share a logical name.
///
/// # Example
///
/// ```
/// use forgeform::core::assemble::assemble;
/// use forgeform::core::config::schema::Manifest;
///
/// let manifest: Manifest = toml::from_str(r#"
///     [forge]
///     owner = "dzik-darek-org"
///
///     [repository]
///     name = "infrastructure-repository"
///
///     [[labels]]
///     name = "Critical"
///     color = "FF0000"
/// "#).unwrap();
///
/// let config = assemble(&manifest).unwrap();
/// // repository, default branch, one label
/// assert_eq!(config.len(), 3);
/// ```
pub fn assemble(manifest: &Manifest) -> Result<Configuration, AssembleError> {
    let mut config = Configuration::new();

    let repository = &manifest.repository;
    let repo_name = ResourceName::new(&repository.name)?;
    let repo_spec = RepositorySpec {
        name: repo_name.clone(),
        description: repository.description.clone(),
        visibility: Visibility::parse(&repository.visibility)?,
        auto_init: repository.auto_init,
        allow_auto_merge: repository.allow_auto_merge,
        allow_squash_merge: repository.allow_squash_merge,
        allow_rebase_merge: repository.allow_rebase_merge,
        delete_branch_on_merge: repository.delete_branch_on_merge,
        has_downloads: repository.has_downloads,
        has_issues: repository.has_issues,
        has_projects: repository.has_projects,
    };
    let repo_id = config.push(Descriptor::new(
        repo_name,
        ResourceSpec::Repository(repo_spec),
    )?);

    let branch = BranchName::new(&manifest.branch.default)?;
    let branch_id = config.push(Descriptor::new(
        ResourceName::new(branch.as_str())?,
        ResourceSpec::DefaultBranch(DefaultBranchSpec {
            branch: branch.clone(),
        }),
    )?);
    config.add_reference(branch_id, repo_id);

    if let Some(protection) = &manifest.protection {
        let pattern = match &protection.pattern {
            Some(pattern) => BranchName::new(pattern)?,
            // The rule protects the default branch unless a pattern says otherwise.
            None => branch.clone(),
        };
        let spec = BranchProtectionSpec {
            pattern,
            require_conversation_resolution: protection.require_conversation_resolution,
            required_approving_review_count: ReviewCount::new(
                protection.required_approving_review_count,
            )?,
            required_status_checks: protection.required_status_checks.clone(),
            strict_status_checks: protection.strict_status_checks,
            enforce_admins: protection.enforce_admins,
        };
        let protection_id = config.push(Descriptor::new(
            ResourceName::new(&protection.name)?,
            ResourceSpec::BranchProtection(spec),
        )?);
        config.add_reference(protection_id, repo_id);
        config.add_reference(protection_id, branch_id);
    }

    for label in &manifest.labels {
        let name = ResourceName::new(&label.name)?;
        if config.find(ResourceKind::IssueLabel, name.as_str()).is_some() {
            return Err(AssembleError::Duplicate {
                kind: ResourceKind::IssueLabel,
                name,
            });
        }
        let spec = IssueLabelSpec {
            name: name.clone(),
            color: LabelColor::new(&label.color)?,
            description: label.description.clone(),
        };
        let label_id = config.push(Descriptor::new(name, ResourceSpec::IssueLabel(spec))?);
        config.add_reference(label_id, repo_id);
    }

    Ok(config)
}
