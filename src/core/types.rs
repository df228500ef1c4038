//! core::types
//!
//! Strong types for core domain values.
//!
//! # Types
//!
//! - [`ResourceName`] - Validated logical resource name
//! - [`BranchName`] - Validated Git branch name
//! - [`LabelColor`] - Validated 6-hex-digit label color
//! - [`ReviewCount`] - Validated required-review count
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use forgeform::core::types::{BranchName, LabelColor, ReviewCount};
//!
//! // Valid constructions
//! let branch = BranchName::new("main").unwrap();
//! let color = LabelColor::new("FF0000").unwrap();
//! let count = ReviewCount::new(1).unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(LabelColor::new("red").is_err());
//! assert!(ReviewCount::new(-1).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid resource name: {0}")]
    InvalidResourceName(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid label color: {0}")]
    InvalidLabelColor(String),

    #[error("invalid review count: {0}")]
    InvalidReviewCount(String),
}

/// A validated logical resource name.
///
/// Logical names identify a declared resource within a configuration and
/// double as the remote object name for repositories and labels:
/// - Cannot be empty
/// - Cannot exceed 100 characters
/// - Cannot contain control characters
/// - Cannot have leading or trailing whitespace
///
/// # Example
///
/// ```
/// use forgeform::core::types::ResourceName;
///
/// let name = ResourceName::new("infrastructure-repository").unwrap();
/// assert_eq!(name.as_str(), "infrastructure-repository");
///
/// assert!(ResourceName::new("").is_err());
/// assert!(ResourceName::new(" padded ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Create a new validated resource name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidResourceName` if the name is empty,
    /// too long, padded, or contains control characters.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidResourceName(
                "resource name cannot be empty".into(),
            ));
        }

        if name.chars().count() > 100 {
            return Err(TypeError::InvalidResourceName(
                "resource name cannot exceed 100 characters".into(),
            ));
        }

        if name != name.trim() {
            return Err(TypeError::InvalidResourceName(
                "resource name cannot have leading or trailing whitespace".into(),
            ));
        }

        for c in name.chars() {
            if c.is_control() {
                return Err(TypeError::InvalidResourceName(
                    "resource name cannot contain control characters".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `[`
/// - Cannot be exactly `@`
///
/// A trailing `*` is permitted so the name can double as a protection
/// pattern (e.g. `releases/*`).
///
/// # Example
///
/// ```
/// use forgeform::core::types::BranchName;
///
/// let name = BranchName::new("main").unwrap();
/// assert_eq!(name.as_str(), "main");
///
/// let pattern = BranchName::new("releases/*").unwrap();
/// assert_eq!(pattern.as_str(), "releases/*");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// assert!(BranchName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's
    /// refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }

        if name == "@" {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be '@' (reserved)".into(),
            ));
        }

        if name.starts_with('.') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '.'".into(),
            ));
        }
        if name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '-'".into(),
            ));
        }

        if name.ends_with(".lock") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '.lock'".into(),
            ));
        }
        if name.ends_with('/') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '/'".into(),
            ));
        }

        if name.contains("..") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain '..'".into(),
            ));
        }
        if name.contains("@{") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain '@{'".into(),
            ));
        }
        if name.contains("//") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain '//'".into(),
            ));
        }

        // '*' is allowed only as the final character of a pattern
        if let Some(pos) = name.find('*') {
            if pos != name.len() - 1 {
                return Err(TypeError::InvalidBranchName(
                    "'*' is only allowed at the end of a pattern".into(),
                ));
            }
        }

        const INVALID_CHARS: [char; 7] = [' ', '~', '^', ':', '\\', '?', '['];
        for c in INVALID_CHARS {
            if name.contains(c) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{c}'"
                )));
            }
        }

        for c in name.chars() {
            if c.is_ascii_control() {
                return Err(TypeError::InvalidBranchName(
                    "branch name cannot contain control characters".into(),
                ));
            }
        }

        for component in name.split('/') {
            if component.is_empty() {
                continue;
            }
            if component.starts_with('.') {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot start with '.'".into(),
                ));
            }
            if component.ends_with(".lock") {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot end with '.lock'".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated issue label color.
///
/// Colors are exactly six hexadecimal digits without a leading `#`,
/// normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use forgeform::core::types::LabelColor;
///
/// let color = LabelColor::new("FF0000").unwrap();
/// assert_eq!(color.as_str(), "ff0000");
///
/// assert!(LabelColor::new("red").is_err());
/// assert!(LabelColor::new("#ff0000").is_err());
/// assert!(LabelColor::new("fff").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelColor(String);

impl LabelColor {
    /// Create a new validated label color.
    ///
    /// The color is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLabelColor` if the value is not exactly
    /// six hexadecimal digits.
    pub fn new(color: impl Into<String>) -> Result<Self, TypeError> {
        let color = color.into().to_ascii_lowercase();
        Self::validate(&color)?;
        Ok(Self(color))
    }

    fn validate(color: &str) -> Result<(), TypeError> {
        if color.starts_with('#') {
            return Err(TypeError::InvalidLabelColor(
                "color must not include a leading '#'".into(),
            ));
        }

        if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidLabelColor(format!(
                "'{color}' is not a 6-hex-digit color"
            )));
        }

        Ok(())
    }

    /// Get the color as a string slice (lowercase, no leading `#`).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LabelColor {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LabelColor> for String {
    fn from(color: LabelColor) -> Self {
        color.0
    }
}

impl std::fmt::Display for LabelColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated required-approving-review count.
///
/// Forges accept between 0 and 6 required approvals; the count is taken
/// from a signed input so that a negative value is a validation error
/// rather than a silent wrap.
///
/// # Example
///
/// ```
/// use forgeform::core::types::ReviewCount;
///
/// let one = ReviewCount::new(1).unwrap();
/// assert_eq!(one.value(), 1);
///
/// assert!(ReviewCount::new(-1).is_err());
/// assert!(ReviewCount::new(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ReviewCount(u8);

impl ReviewCount {
    /// Maximum review count accepted by supported forges.
    pub const MAX: i32 = 6;

    /// Create a new validated review count.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidReviewCount` if the count is negative
    /// or greater than [`ReviewCount::MAX`].
    pub fn new(count: i32) -> Result<Self, TypeError> {
        if !(0..=Self::MAX).contains(&count) {
            return Err(TypeError::InvalidReviewCount(format!(
                "{count} is outside the accepted range 0..={}",
                Self::MAX
            )));
        }
        Ok(Self(count as u8))
    }

    /// Get the count value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for ReviewCount {
    type Error = TypeError;

    fn try_from(count: i32) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<ReviewCount> for i32 {
    fn from(count: ReviewCount) -> Self {
        count.0 as i32
    }
}

impl std::fmt::Display for ReviewCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
