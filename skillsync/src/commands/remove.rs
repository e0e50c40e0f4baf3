//! `skillsync remove` — delete an installed skill and its record.

use anyhow::Result;

use super::common;

pub fn cmd_remove(skill_name: &str) -> Result<()> {
    let engine = common::build_engine();
    engine.remove(skill_name)?;
    eprintln!("✓ Removed {skill_name}");
    Ok(())
}
