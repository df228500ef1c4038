//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--manifest <path>`: Use this manifest instead of `./forgeform.toml`
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Forgeform - declarative configuration for source forges
#[derive(Parser, Debug)]
#[command(name = "ff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the manifest (defaults to $FORGEFORM_MANIFEST, then ./forgeform.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter manifest
    #[command(
        name = "init",
        long_about = "Write a starter manifest.\n\n\
            The manifest declares the desired forge state: the repository, its \
            default branch, a branch protection rule, and issue labels. Edit the \
            generated file, then run 'ff plan' to preview the changes."
    )]
    Init {
        /// Repository owner (user or organization)
        #[arg(long, value_name = "OWNER")]
        owner: Option<String>,

        /// Repository name
        #[arg(long, value_name = "NAME")]
        repository: Option<String>,

        /// Overwrite an existing manifest
        #[arg(long)]
        force: bool,
    },

    /// Validate the manifest and show the resolved apply order
    #[command(
        name = "validate",
        long_about = "Validate the manifest and show the resolved apply order.\n\n\
            Validation assembles the typed configuration and resolves its \
            dependency graph without touching the network. Attribute errors \
            (bad colors, negative review counts) and reference cycles are \
            reported here, before any API call could happen."
    )]
    Validate,

    /// Preview the changes an apply would make
    #[command(
        name = "plan",
        long_about = "Preview the changes an apply would make.\n\n\
            Reads the actual state of every declared resource from the forge, \
            diffs it against the manifest, and prints the resulting steps in \
            dependency order. The plan digest is stable: identical desired and \
            actual state always produce the same digest.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Preview against the default manifest
    ff plan

    # Preview a specific manifest as JSON
    ff plan --manifest infra/forgeform.toml --json"
    )]
    Plan,

    /// Apply the manifest to the forge
    #[command(
        name = "apply",
        long_about = "Apply the manifest to the forge.\n\n\
            Runs the full lifecycle: validate, resolve the apply order, scan \
            remote state, plan, execute, and verify convergence. Execution \
            stops at the first provider error; the applied prefix is reported \
            so a re-run can pick up where it stopped."
    )]
    Apply,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
