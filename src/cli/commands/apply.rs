//! apply command - Apply the manifest to the forge

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::engine::{self, ApplyReport, Context, Plan};
use crate::ui::output::{self, Verbosity};

#[derive(Debug, Serialize)]
struct ApplyOutput<'a> {
    plan: &'a Plan,
    report: &'a ApplyReport,
}

/// Apply the manifest to the forge.
///
/// Runs the full lifecycle; execution stops at the first provider error
/// and the error reports how many steps were applied.
pub fn apply(ctx: &Context, manifest_path: &Path) -> Result<()> {
    let manifest = super::load(manifest_path)?;
    let forge = super::forge_for(&manifest)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let (plan, report) = runtime.block_on(engine::run_apply(forge.as_ref(), &manifest, ctx))?;

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ApplyOutput {
                plan: &plan,
                report: &report
            })?
        );
        return Ok(());
    }

    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    if plan.is_empty() {
        output::print(plan.render().trim_end(), verbosity);
    } else {
        output::print(plan.render().trim_end(), verbosity);
        output::print(
            format!(
                "Applied {} step{}. Remote state matches the configuration.",
                report.applied,
                if report.applied == 1 { "" } else { "s" }
            ),
            verbosity,
        );
    }
    Ok(())
}
