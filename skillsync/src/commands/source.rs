//! `skillsync source` — manage the allowed sources list.

use anyhow::Result;

use skillsync_core::config::ConfigStore;
use skillsync_core::project::ProjectLayout;

fn config_store() -> ConfigStore {
    ConfigStore::new(&ProjectLayout::discover())
}

pub fn cmd_add(source: &str) -> Result<()> {
    let config = config_store().add_source(source)?;
    eprintln!("✓ Added source: {source}");
    eprintln!("  Allowed sources: {}", config.allowed_sources.join(", "));
    Ok(())
}

pub fn cmd_remove(source: &str) -> Result<()> {
    let config = config_store().remove_source(source)?;
    eprintln!("✓ Removed source: {source}");
    eprintln!("  Allowed sources: {}", config.allowed_sources.join(", "));
    Ok(())
}

pub fn cmd_list() -> Result<()> {
    let config = config_store().load()?;
    eprintln!("Allowed sources:");
    for source in &config.allowed_sources {
        if *source == config.default_source {
            eprintln!("  • {source} (default)");
        } else {
            eprintln!("  • {source}");
        }
    }
    Ok(())
}
