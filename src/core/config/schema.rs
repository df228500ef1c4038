//! core::config::schema
//!
//! Manifest schema types.
//!
//! # Manifest
//!
//! The manifest is a TOML file describing the desired forge state:
//!
//! ```toml
//! [forge]
//! provider = "github"
//! owner = "dzik-darek-org"
//!
//! [repository]
//! name = "infrastructure-repository"
//! visibility = "public"
//!
//! [branch]
//! default = "main"
//!
//! [protection]
//! name = "master-branch-protection"
//! required_approving_review_count = 1
//! required_status_checks = ["Compile and test"]
//!
//! [[labels]]
//! name = "Critical"
//! color = "FF0000"
//! ```
//!
//! # Validation
//!
//! Parsing enforces the shape (unknown fields are rejected); `validate()`
//! checks the values the assembler does not re-check, such as the forge
//! provider name. Attribute-level validation (colors, branch names,
//! review counts) happens during assembly through the typed constructors.

use serde::{Deserialize, Serialize};

use super::ConfigError;

fn default_provider() -> String {
    "github".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_visibility() -> String {
    "public".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_true() -> bool {
    true
}

fn default_review_count() -> i32 {
    1
}

/// The desired-state manifest for one forge repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Forge connection settings.
    pub forge: ForgeSection,

    /// The repository to declare.
    pub repository: RepositorySection,

    /// Default branch settings.
    #[serde(default)]
    pub branch: BranchSection,

    /// Branch protection rule, if any.
    #[serde(default)]
    pub protection: Option<ProtectionSection>,

    /// Issue labels.
    #[serde(default)]
    pub labels: Vec<LabelSection>,
}

impl Manifest {
    /// Validate the manifest values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_forges = crate::forge::valid_forge_names();
        if !valid_forges.contains(&self.forge.provider.as_str()) {
            return Err(ConfigError::InvalidValue(format!(
                "invalid forge '{}', must be one of: {}",
                self.forge.provider,
                valid_forges.join(", ")
            )));
        }

        if self.forge.owner.is_empty() {
            return Err(ConfigError::InvalidValue("owner cannot be empty".to_string()));
        }

        if self.forge.token_env.is_empty() {
            return Err(ConfigError::InvalidValue(
                "token_env cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Forge connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForgeSection {
    /// Forge provider (e.g., "github").
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Repository owner (user or organization).
    pub owner: String,

    /// API base URL override (e.g., for GitHub Enterprise).
    #[serde(default)]
    pub api_base: Option<String>,

    /// Environment variable the API token is read from.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Desired repository attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySection {
    /// Repository name on the forge.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Repository visibility ("public" or "private").
    #[serde(default = "default_visibility")]
    pub visibility: String,

    /// Initialize with a first commit on creation.
    #[serde(default = "default_true")]
    pub auto_init: bool,

    /// Allow auto-merge on pull requests.
    #[serde(default)]
    pub allow_auto_merge: bool,

    /// Allow squash merging.
    #[serde(default = "default_true")]
    pub allow_squash_merge: bool,

    /// Allow rebase merging.
    #[serde(default)]
    pub allow_rebase_merge: bool,

    /// Delete head branches once merged.
    #[serde(default = "default_true")]
    pub delete_branch_on_merge: bool,

    /// Enable the downloads tab.
    #[serde(default = "default_true")]
    pub has_downloads: bool,

    /// Enable the issue tracker.
    #[serde(default = "default_true")]
    pub has_issues: bool,

    /// Enable project boards.
    #[serde(default = "default_true")]
    pub has_projects: bool,
}

/// Default branch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchSection {
    /// Branch to use as the repository default.
    #[serde(default = "default_branch")]
    pub default: String,
}

impl Default for BranchSection {
    fn default() -> Self {
        Self {
            default: default_branch(),
        }
    }
}

/// Branch protection rule settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtectionSection {
    /// Logical name of the rule.
    pub name: String,

    /// Pattern for branch names the rule applies to.
    /// Defaults to the default branch when omitted.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Require all review conversations to be resolved before merge.
    #[serde(default = "default_true")]
    pub require_conversation_resolution: bool,

    /// Approvals required before merge.
    #[serde(default = "default_review_count")]
    pub required_approving_review_count: i32,

    /// Status check contexts that must pass before merge.
    #[serde(default)]
    pub required_status_checks: Vec<String>,

    /// Require branches to be up to date before merge.
    #[serde(default)]
    pub strict_status_checks: bool,

    /// Enforce the rule for administrators too.
    #[serde(default)]
    pub enforce_admins: bool,
}

/// Issue label settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSection {
    /// Label name.
    pub name: String,

    /// Label color (6 hex digits, no leading `#`).
    pub color: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_manifest_parses_with_defaults() {
        let manifest: Manifest = toml::from_str(
            r#"
            [forge]
            owner = "someorg"

            [repository]
            name = "example"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.forge.provider, "github");
        assert_eq!(manifest.forge.token_env, "GITHUB_TOKEN");
        assert_eq!(manifest.branch.default, "main");
        assert_eq!(manifest.repository.visibility, "public");
        assert!(manifest.repository.auto_init);
        assert!(!manifest.repository.allow_auto_merge);
        assert!(manifest.repository.allow_squash_merge);
        assert!(!manifest.repository.allow_rebase_merge);
        assert!(manifest.protection.is_none());
        assert!(manifest.labels.is_empty());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<Manifest, _> = toml::from_str(
            r#"
            [forge]
            owner = "someorg"
            typo_field = true

            [repository]
            name = "example"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_repository_name_rejected() {
        let result: Result<Manifest, _> = toml::from_str(
            r#"
            [forge]
            owner = "someorg"

            [repository]
            description = "no name"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_unknown_provider() {
        let manifest: Manifest = toml::from_str(
            r#"
            [forge]
            provider = "sourcehut"
            owner = "someorg"

            [repository]
            name = "example"
            "#,
        )
        .unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_owner() {
        let manifest: Manifest = toml::from_str(
            r#"
            [forge]
            owner = ""

            [repository]
            name = "example"
            "#,
        )
        .unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        let manifest: Manifest = toml::from_str(
            r#"
            [forge]
            owner = "someorg"

            [repository]
            name = "example"
            "#,
        )
        .unwrap();
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn protection_review_count_defaults_to_one() {
        let manifest: Manifest = toml::from_str(
            r#"
            [forge]
            owner = "someorg"

            [repository]
            name = "example"

            [protection]
            name = "rule"
            "#,
        )
        .unwrap();
        let protection = manifest.protection.unwrap();
        assert_eq!(protection.required_approving_review_count, 1);
        assert!(protection.require_conversation_resolution);
    }
}
