//! `skillsync init` — create the skill-sources config for this project.

use anyhow::Result;

use skillsync_core::config::ConfigStore;
use skillsync_core::project::ProjectLayout;

pub fn cmd_init(default_source: Option<&str>) -> Result<()> {
    let layout = ProjectLayout::discover();
    let store = ConfigStore::new(&layout);
    let config = store.init(default_source)?;

    eprintln!("✓ Initialized configuration at {}", store.path().display());
    eprintln!("  Default source: {}", config.default_source);
    eprintln!("  Allowed sources: {}", config.allowed_sources.join(", "));
    Ok(())
}
