//! init command - Write a starter manifest

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::core::config::write_manifest;
use crate::engine::Context;
use crate::ui::output::{self, Verbosity};

/// Write a starter manifest.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `manifest_path` - Where to write the manifest
/// * `owner` - Repository owner, if known
/// * `repository` - Repository name, if known
/// * `force` - Overwrite an existing manifest
pub fn init(
    ctx: &Context,
    manifest_path: &Path,
    owner: Option<&str>,
    repository: Option<&str>,
    force: bool,
) -> Result<()> {
    let owner = owner.unwrap_or("your-org");
    let repository = repository.unwrap_or("your-repository");

    let contents = starter_manifest(owner, repository);
    write_manifest(manifest_path, &contents, force)
        .with_context(|| format!("Failed to write '{}'", manifest_path.display()))?;

    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    output::print(
        format!(
            "Wrote {}. Edit it, then run 'ff plan' to preview changes.",
            manifest_path.display()
        ),
        verbosity,
    );
    Ok(())
}

/// Render the starter manifest contents.
fn starter_manifest(owner: &str, repository: &str) -> String {
    format!(
        r#"# Forgeform manifest - declares the desired state of one forge repository.

[forge]
provider = "github"
owner = "{owner}"
# token_env = "GITHUB_TOKEN"
# api_base = "https://github.example.com/api/v3"

[repository]
name = "{repository}"
# description = ""
visibility = "public"
auto_init = true
allow_auto_merge = false
allow_squash_merge = true
allow_rebase_merge = false
delete_branch_on_merge = true
has_downloads = true
has_issues = true
has_projects = true

[branch]
default = "main"

[protection]
name = "default-branch-protection"
require_conversation_resolution = true
required_approving_review_count = 1
required_status_checks = ["Compile and test"]

[[labels]]
name = "Critical"
color = "FF0000"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::load_manifest;
    use tempfile::TempDir;

    #[test]
    fn starter_manifest_is_loadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forgeform.toml");

        init(
            &Context::default(),
            &path,
            Some("someorg"),
            Some("example"),
            false,
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.forge.owner, "someorg");
        assert_eq!(manifest.repository.name, "example");
        assert_eq!(manifest.labels.len(), 1);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forgeform.toml");

        init(&Context::default(), &path, None, None, false).unwrap();
        assert!(init(&Context::default(), &path, None, None, false).is_err());
        assert!(init(&Context::default(), &path, None, None, true).is_ok());
    }
}
