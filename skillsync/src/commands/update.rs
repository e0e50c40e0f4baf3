//! `skillsync update` — re-fetch installed skills from their recorded sources.

use anyhow::Result;

use skillsync_core::engine::UpdateStatus;

use super::common;

pub fn cmd_update(skill_name: Option<&str>, all: bool, verbose: bool) -> Result<()> {
    let engine = common::build_engine();

    if let (Some(name), false) = (skill_name, all) {
        let (status, report) = engine.update(name)?;
        match status {
            UpdateStatus::Updated => eprintln!("✓ Updated {}", report.filename),
            UpdateStatus::Unchanged => eprintln!("  {} is already up to date", report.filename),
        }
        if verbose {
            eprintln!("  Checksum: {}", report.checksum);
        }
        return Ok(());
    }

    let outcomes = engine.update_all()?;
    if outcomes.is_empty() {
        eprintln!("No skills to update.");
        return Ok(());
    }

    let mut updated = 0usize;
    let mut unchanged = 0usize;
    let mut failed = 0usize;
    for (filename, result) in &outcomes {
        match result {
            Ok(UpdateStatus::Updated) => {
                updated += 1;
                eprintln!("✓ Updated {filename}");
            }
            Ok(UpdateStatus::Unchanged) => {
                unchanged += 1;
                if verbose {
                    eprintln!("  {filename} is already up to date");
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("✗ Failed to update {filename}: {e}");
            }
        }
    }

    eprintln!();
    eprintln!("Updated: {updated}, Unchanged: {unchanged}, Failed: {failed}");
    if failed > 0 {
        anyhow::bail!("{failed} skill(s) failed to update");
    }
    Ok(())
}
