//! cli
//!
//! Command-line interface layer for Forgeform.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT mutate remote state directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! the [`crate::engine`] for execution. All remote state changes flow
//! through the engine's executor.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::core::config::resolve_manifest_path;
use crate::engine;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // Create context from CLI flags.
    let ctx = engine::Context {
        debug: cli.debug,
        quiet: cli.quiet,
        json: cli.json,
    };

    let manifest_path = resolve_manifest_path(cli.manifest.clone());

    // Dispatch to command handler
    commands::dispatch(cli.command, &manifest_path, &ctx)
}
