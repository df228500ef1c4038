//! core::resource
//!
//! Typed resource descriptors and the configuration they form.
//!
//! # Architecture
//!
//! A [`Descriptor`] is an immutable declaration of one desired remote
//! object: a kind, a logical name, and a kind-specific spec. Descriptors
//! are collected into a [`Configuration`] in declaration order, together
//! with the reference edges between them. The configuration is built fresh
//! on every invocation, never mutated after assembly, and never persisted;
//! the forge owns all remote state.
//!
//! # Invariants
//!
//! - Logical names are unique per kind within a configuration
//! - Attribute values are validated at construction; a constructed
//!   descriptor is always well-formed
//! - Reference edges only connect descriptors in the same configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{BranchName, LabelColor, ResourceName, ReviewCount, TypeError};

/// Errors from descriptor validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("invalid visibility '{0}', must be one of: public, private")]
    InvalidVisibility(String),

    #[error("status check context cannot be empty")]
    EmptyStatusCheck,
}

/// The kinds of resources a configuration can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A forge-hosted repository
    Repository,
    /// The default branch of a repository
    DefaultBranch,
    /// A branch protection rule
    BranchProtection,
    /// An issue label
    IssueLabel,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Repository => write!(f, "repository"),
            ResourceKind::DefaultBranch => write!(f, "default branch"),
            ResourceKind::BranchProtection => write!(f, "branch protection"),
            ResourceKind::IssueLabel => write!(f, "issue label"),
        }
    }
}

/// Identity of a descriptor within one configuration.
///
/// Ids are assigned in declaration order when a descriptor is pushed into
/// a [`Configuration`]; the ordering of ids is the declaration ordering,
/// which the linker uses as its tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(usize);

impl ResourceId {
    /// Get the declaration index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Repository visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Parse a visibility from its manifest string form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidVisibility` for anything other
    /// than `public` or `private`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(ValidationError::InvalidVisibility(other.to_string())),
        }
    }

    /// Get the wire name used by forge APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Desired attributes of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySpec {
    /// Repository name on the forge.
    pub name: ResourceName,
    /// Optional description.
    pub description: Option<String>,
    /// Repository visibility.
    pub visibility: Visibility,
    /// Initialize with a first commit on creation.
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

/// Desired default branch of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultBranchSpec {
    /// Branch to use as the repository default.
    pub branch: BranchName,
}

/// Desired attributes of a branch protection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProtectionSpec {
    /// Pattern for branch names the rule applies to.
    pub pattern: BranchName,
    /// Require all review conversations to be resolved before merge.
    pub require_conversation_resolution: bool,
    /// Approvals required before merge.
    pub required_approving_review_count: ReviewCount,
    /// Status check contexts that must pass before merge.
    pub required_status_checks: Vec<String>,
    /// Require branches to be up to date before merge.
    pub strict_status_checks: bool,
    /// Enforce the rule for administrators too.
    pub enforce_admins: bool,
}

/// Desired attributes of an issue label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLabelSpec {
    /// Label name.
    pub name: ResourceName,
    /// Label color (6 hex digits, no leading `#`).
    pub color: LabelColor,
    /// Optional description.
    pub description: Option<String>,
}

/// Kind-specific desired state of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSpec {
    Repository(RepositorySpec),
    DefaultBranch(DefaultBranchSpec),
    BranchProtection(BranchProtectionSpec),
    IssueLabel(IssueLabelSpec),
}

impl ResourceSpec {
    /// Get the kind of resource this spec describes.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::Repository(_) => ResourceKind::Repository,
            ResourceSpec::DefaultBranch(_) => ResourceKind::DefaultBranch,
            ResourceSpec::BranchProtection(_) => ResourceKind::BranchProtection,
            ResourceSpec::IssueLabel(_) => ResourceKind::IssueLabel,
        }
    }

    /// Validate residual rules not already enforced by the value types.
    fn validate(&self) -> Result<(), ValidationError> {
        if let ResourceSpec::BranchProtection(spec) = self {
            if spec
                .required_status_checks
                .iter()
                .any(|c| c.trim().is_empty())
            {
                return Err(ValidationError::EmptyStatusCheck);
            }
        }
        Ok(())
    }
}

/// An immutable declaration of one desired remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Logical name, unique per kind within a configuration.
    pub name: ResourceName,
    /// Kind-specific desired state.
    pub spec: ResourceSpec,
}

impl Descriptor {
    /// Create a validated descriptor.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when a required attribute is missing or
    /// malformed. Most attribute validation already happened when the
    /// spec's value types were constructed; this checks the rules that
    /// span fields.
    pub fn new(name: ResourceName, spec: ResourceSpec) -> Result<Self, ValidationError> {
        spec.validate()?;
        Ok(Self { name, spec })
    }

    /// Get the kind of resource this descriptor declares.
    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }
}

/// The full set of descriptors and references assembled for one invocation.
///
/// Descriptors are kept in declaration order. References are directed
/// edges from a dependent descriptor to a descriptor it depends on.
///
/// # Example
///
/// ```
/// use forgeform::core::resource::{
///     Configuration, Descriptor, DefaultBranchSpec, ResourceSpec,
/// };
/// use forgeform::core::types::{BranchName, ResourceName};
///
/// let mut config = Configuration::new();
/// let branch = Descriptor::new(
///     ResourceName::new("main").unwrap(),
///     ResourceSpec::DefaultBranch(DefaultBranchSpec {
///         branch: BranchName::new("main").unwrap(),
///     }),
/// )
/// .unwrap();
/// let id = config.push(branch);
/// assert_eq!(config.len(), 1);
/// assert_eq!(config.descriptor(id).name.as_str(), "main");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    descriptors: Vec<Descriptor>,
    references: Vec<(ResourceId, ResourceId)>,
}

impl Configuration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor, returning its id.
    ///
    /// Ids are assigned in declaration order.
    pub fn push(&mut self, descriptor: Descriptor) -> ResourceId {
        let id = ResourceId(self.descriptors.len());
        self.descriptors.push(descriptor);
        id
    }

    /// Record that `dependent` references `dependency`.
    pub fn add_reference(&mut self, dependent: ResourceId, dependency: ResourceId) {
        self.references.push((dependent, dependency));
    }

    /// Get a descriptor by id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not issued by this configuration.
    pub fn descriptor(&self, id: ResourceId) -> &Descriptor {
        &self.descriptors[id.0]
    }

    /// Iterate descriptors with their ids in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &Descriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (ResourceId(i), d))
    }

    /// Get the reference edges as (dependent, dependency) pairs.
    pub fn references(&self) -> &[(ResourceId, ResourceId)] {
        &self.references
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check whether the configuration is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Find a descriptor by kind and logical name.
    pub fn find(&self, kind: ResourceKind, name: &str) -> Option<ResourceId> {
        self.iter()
            .find(|(_, d)| d.kind() == kind && d.name.as_str() == name)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository_spec(name: &str) -> ResourceSpec {
        ResourceSpec::Repository(RepositorySpec {
            name: ResourceName::new(name).unwrap(),
            description: None,
            visibility: Visibility::Public,
            auto_init: true,
            allow_auto_merge: false,
            allow_squash_merge: true,
            allow_rebase_merge: false,
            delete_branch_on_merge: true,
            has_downloads: true,
            has_issues: true,
            has_projects: true,
        })
    }

    mod descriptor {
        use super::*;

        #[test]
        fn repository_descriptor_validates() {
            let d = Descriptor::new(
                ResourceName::new("repo").unwrap(),
                repository_spec("repo"),
            )
            .unwrap();
            assert_eq!(d.kind(), ResourceKind::Repository);
        }

        #[test]
        fn empty_status_check_context_rejected() {
            let spec = ResourceSpec::BranchProtection(BranchProtectionSpec {
                pattern: BranchName::new("main").unwrap(),
                require_conversation_resolution: true,
                required_approving_review_count: ReviewCount::new(1).unwrap(),
                required_status_checks: vec!["Compile and test".to_string(), "  ".to_string()],
                strict_status_checks: false,
                enforce_admins: false,
            });
            let result = Descriptor::new(ResourceName::new("protection").unwrap(), spec);
            assert_eq!(result.unwrap_err(), ValidationError::EmptyStatusCheck);
        }

        #[test]
        fn visibility_parse() {
            assert_eq!(Visibility::parse("public").unwrap(), Visibility::Public);
            assert_eq!(Visibility::parse("private").unwrap(), Visibility::Private);
            assert!(Visibility::parse("internal").is_err());
            assert!(Visibility::parse("Public").is_err());
        }
    }

    mod configuration {
        use super::*;

        #[test]
        fn ids_follow_declaration_order() {
            let mut config = Configuration::new();
            let a = config.push(
                Descriptor::new(ResourceName::new("a").unwrap(), repository_spec("a")).unwrap(),
            );
            let b = config.push(
                Descriptor::new(ResourceName::new("b").unwrap(), repository_spec("b")).unwrap(),
            );
            assert_eq!(a.index(), 0);
            assert_eq!(b.index(), 1);
            assert!(a < b);
        }

        #[test]
        fn references_recorded() {
            let mut config = Configuration::new();
            let a = config.push(
                Descriptor::new(ResourceName::new("a").unwrap(), repository_spec("a")).unwrap(),
            );
            let b = config.push(
                Descriptor::new(ResourceName::new("b").unwrap(), repository_spec("b")).unwrap(),
            );
            config.add_reference(b, a);
            assert_eq!(config.references(), &[(b, a)]);
        }

        #[test]
        fn find_by_kind_and_name() {
            let mut config = Configuration::new();
            let a = config.push(
                Descriptor::new(ResourceName::new("repo").unwrap(), repository_spec("repo"))
                    .unwrap(),
            );
            assert_eq!(config.find(ResourceKind::Repository, "repo"), Some(a));
            assert_eq!(config.find(ResourceKind::IssueLabel, "repo"), None);
        }
    }
}
