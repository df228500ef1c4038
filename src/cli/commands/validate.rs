//! validate command - Validate the manifest and show the apply order

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::engine::{assemble_and_link, Context};
use crate::ui::output::{self, Verbosity};

#[derive(Debug, Serialize)]
struct ValidateReport {
    resources: Vec<ResourceLine>,
}

#[derive(Debug, Serialize)]
struct ResourceLine {
    kind: String,
    name: String,
}

/// Validate the manifest and print the resolved apply order.
///
/// Pure and offline: attribute validation and cycle detection both run
/// here, before any network call could happen.
pub fn validate(ctx: &Context, manifest_path: &Path) -> Result<()> {
    let manifest = super::load(manifest_path)?;
    let ordered = assemble_and_link(&manifest)?;

    let resources: Vec<ResourceLine> = ordered
        .iter()
        .map(|(_, descriptor)| ResourceLine {
            kind: descriptor.kind().to_string(),
            name: descriptor.name.as_str().to_string(),
        })
        .collect();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&ValidateReport { resources })?);
        return Ok(());
    }

    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    output::print(
        format!(
            "Manifest OK: {} resource{}",
            resources.len(),
            if resources.len() == 1 { "" } else { "s" }
        ),
        verbosity,
    );
    output::print("Apply order:", verbosity);
    for (i, line) in resources.iter().enumerate() {
        output::print(
            format!("  {}. {} '{}'", i + 1, line.kind, line.name),
            verbosity,
        );
    }
    Ok(())
}
