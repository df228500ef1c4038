//! plan command - Preview the changes an apply would make

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::engine::{self, Context};
use crate::ui::output::{self, Verbosity};

/// Preview the changes an apply would make.
pub fn plan(ctx: &Context, manifest_path: &Path) -> Result<()> {
    let manifest = super::load(manifest_path)?;
    let forge = super::forge_for(&manifest)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let plan = runtime.block_on(engine::run_plan(forge.as_ref(), &manifest))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    output::print(plan.render().trim_end(), verbosity);
    Ok(())
}
