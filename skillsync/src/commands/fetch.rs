//! `skillsync fetch` — pull a skill from an allowed repository.

use anyhow::Result;

use super::common;

pub fn cmd_fetch(
    skill_name: &str,
    source: Option<&str>,
    branch: &str,
    overwrite: bool,
    verbose: bool,
) -> Result<()> {
    let engine = common::build_engine();

    if verbose {
        let config = engine.config().load()?;
        let resolved = config.resolve_alias(skill_name);
        if resolved != skill_name {
            eprintln!("  Resolved alias '{skill_name}' → '{resolved}'");
        }
        if source.is_none() {
            eprintln!("  Using default source: {}", config.default_source);
        }
    }

    let report = engine.fetch(skill_name, source, branch, overwrite)?;
    eprintln!("✓ Installed {} from {} (branch: {})", report.filename, report.source, report.branch);
    if verbose {
        eprintln!("  Checksum: {}", report.checksum);
    }
    Ok(())
}
