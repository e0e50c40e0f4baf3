//! Shared wiring for the command handlers.

use skillsync_core::engine::SyncEngine;
use skillsync_core::fetch::HttpFetcher;
use skillsync_core::project::ProjectLayout;

/// Engine rooted at the discovered project, with the environment's GitHub
/// token (if any) as the fetch credential.
pub fn build_engine() -> SyncEngine<HttpFetcher> {
    let layout = ProjectLayout::discover();
    let token = std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    SyncEngine::new(layout, HttpFetcher::new(token))
}
