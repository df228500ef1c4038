//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT mutate remote state directly; everything flows through
//! the engine's executor.
//!
//! # Async Commands
//!
//! Commands that reach the forge (plan, apply) are async because they
//! involve network I/O; their handlers enter a Tokio runtime internally
//! so dispatch stays synchronous.

mod apply;
mod completion;
mod init;
mod plan_cmd;
mod validate;

// Re-export command functions for testing and direct invocation
pub use apply::apply;
pub use completion::completion;
pub use init::init;
pub use plan_cmd::plan;
pub use validate::validate;

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::core::config::schema::Manifest;
use crate::core::config::load_manifest;
use crate::engine::Context;
use crate::forge::{create_forge, Forge};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, manifest_path: &Path, ctx: &Context) -> Result<()> {
    match command {
        Command::Init {
            owner,
            repository,
            force,
        } => init(ctx, manifest_path, owner.as_deref(), repository.as_deref(), force),
        Command::Validate => validate(ctx, manifest_path),
        Command::Plan => plan(ctx, manifest_path),
        Command::Apply => apply(ctx, manifest_path),
        Command::Completion { shell } => completion(shell),
    }
}

/// Load the manifest, with a friendly context on failure.
pub(crate) fn load(manifest_path: &Path) -> Result<Manifest> {
    load_manifest(manifest_path)
        .with_context(|| format!("Failed to load manifest '{}'", manifest_path.display()))
}

/// Build a forge client from the manifest's settings.
///
/// The API token is read from the environment variable named in the
/// manifest (`GITHUB_TOKEN` by default).
pub(crate) fn forge_for(manifest: &Manifest) -> Result<Box<dyn Forge>> {
    let token = std::env::var(&manifest.forge.token_env).with_context(|| {
        format!(
            "No API token found: export {} or set forge.token_env in the manifest",
            manifest.forge.token_env
        )
    })?;

    create_forge(
        &manifest.forge.provider,
        token,
        &manifest.forge.owner,
        &manifest.repository.name,
        manifest.forge.api_base.as_deref(),
    )
    .context("Failed to create forge client")
}
