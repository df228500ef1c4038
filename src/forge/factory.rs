//! forge::factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! This module provides a central location for forge selection logic.
//! Commands use `create_forge()` instead of directly importing specific
//! forge implementations, keeping core logic independent of any one
//! provider.

use super::github::GitHubForge;
use super::traits::{Forge, ForgeError};

/// Supported forge providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeProvider {
    /// GitHub (always available)
    GitHub,
}

impl ForgeProvider {
    /// Get all available providers.
    ///
    /// # Example
    ///
    /// ```
    /// use forgeform::forge::ForgeProvider;
    ///
    /// let providers = ForgeProvider::all();
    /// assert!(providers.contains(&ForgeProvider::GitHub));
    /// ```
    pub fn all() -> &'static [ForgeProvider] {
        &[ForgeProvider::GitHub]
    }

    /// Get the provider name as used in manifests.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "github",
        }
    }

    /// Parse a provider from a string.
    ///
    /// # Example
    ///
    /// ```
    /// use forgeform::forge::ForgeProvider;
    ///
    /// assert_eq!(ForgeProvider::parse("github"), Some(ForgeProvider::GitHub));
    /// assert_eq!(ForgeProvider::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ForgeProvider::GitHub),
            _ => None,
        }
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Valid forge names for configuration validation.
pub fn valid_forge_names() -> Vec<&'static str> {
    ForgeProvider::all().iter().map(|p| p.name()).collect()
}

/// Create a forge for the named provider.
///
/// # Arguments
///
/// * `provider` - Provider name from the manifest (e.g., "github")
/// * `token` - API token
/// * `owner` - Repository owner
/// * `repo` - Repository name
/// * `api_base` - API base URL override, if any
///
/// # Errors
///
/// Returns `ForgeError::NotImplemented` for unknown providers.
pub fn create_forge(
    provider: &str,
    token: String,
    owner: &str,
    repo: &str,
    api_base: Option<&str>,
) -> Result<Box<dyn Forge>, ForgeError> {
    match ForgeProvider::parse(provider) {
        Some(ForgeProvider::GitHub) => {
            let forge = match api_base {
                Some(base) => GitHubForge::with_api_base(token, owner, repo, base),
                None => GitHubForge::new(token, owner, repo),
            };
            Ok(Box::new(forge))
        }
        None => Err(ForgeError::NotImplemented(provider.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parse_is_case_insensitive() {
        assert_eq!(ForgeProvider::parse("GitHub"), Some(ForgeProvider::GitHub));
        assert_eq!(ForgeProvider::parse("GITHUB"), Some(ForgeProvider::GitHub));
    }

    #[test]
    fn valid_names_contains_github() {
        assert_eq!(valid_forge_names(), vec!["github"]);
    }

    #[test]
    fn create_github_forge() {
        let forge = create_forge("github", "t".into(), "o", "r", None).unwrap();
        assert_eq!(forge.name(), "github");
    }

    #[test]
    fn create_unknown_forge_fails() {
        let err = create_forge("svn", "t".into(), "o", "r", None).unwrap_err();
        assert!(matches!(err, ForgeError::NotImplemented(_)));
    }
}
