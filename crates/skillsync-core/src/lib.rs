//! skillsync-core: the synchronization engine behind the `skillsync` CLI.
//!
//! Pulls versioned, checksum-verified skill files from whitelisted GitHub
//! repositories into a project-local `.claude/skills/` directory and keeps a
//! durable provenance record for each one.

pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
mod fsutil;
pub mod integrity;
pub mod project;
pub mod source;
pub mod store;

pub use error::SyncError;
