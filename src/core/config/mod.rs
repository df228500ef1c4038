//! core::config
//!
//! Manifest schema and loading.
//!
//! # Locations
//!
//! The manifest path is resolved in this order:
//! 1. `--manifest <path>` CLI flag
//! 2. `$FORGEFORM_MANIFEST` if set
//! 3. `./forgeform.toml`
//!
//! # Example
//!
//! ```no_run
//! use forgeform::core::config::{load_manifest, resolve_manifest_path};
//!
//! let path = resolve_manifest_path(None);
//! let manifest = load_manifest(&path).unwrap();
//! println!("owner: {}", manifest.forge.owner);
//! ```

pub mod schema;

pub use schema::Manifest;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the manifest location.
pub const MANIFEST_ENV: &str = "FORGEFORM_MANIFEST";

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "forgeform.toml";

/// Errors from manifest operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write manifest '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest value: {0}")]
    InvalidValue(String),
}

/// Resolve the manifest path from the flag, the environment, or the default.
pub fn resolve_manifest_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Ok(path) = std::env::var(MANIFEST_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(DEFAULT_MANIFEST)
}

/// Load and validate a manifest from disk.
///
/// # Errors
///
/// Returns `ConfigError::ReadError` if the file cannot be read,
/// `ConfigError::ParseError` if it is not valid TOML for the schema,
/// and `ConfigError::InvalidValue` if validation rejects a value.
pub fn load_manifest(path: &Path) -> Result<Manifest, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let manifest: Manifest = toml::from_str(&contents).map_err(|err| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    manifest.validate()?;
    Ok(manifest)
}

/// Write a manifest file, refusing to clobber an existing one unless forced.
///
/// # Errors
///
/// Returns `ConfigError::WriteError` on I/O failure, and
/// `ConfigError::InvalidValue` if the file exists and `force` is false.
pub fn write_manifest(path: &Path, contents: &str, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue(format!(
            "manifest '{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }
    fs::write(path, contents).map_err(|source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}
