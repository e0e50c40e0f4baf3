//! Error taxonomy for the synchronization engine.
//!
//! Every variant carries the context (skill, source, branch, path) the caller
//! needs to act on it. `Forbidden` and `NotFound` are deliberately separate:
//! the first is fixed with a credential, the second with a name or branch.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the engine and its collaborators.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Source '{source_repo}' is not in the allowed sources list. Add it with: skillsync source add {source_repo}")]
    SourceNotAllowed { source_repo: String },

    #[error("Skill already exists: {filename}. Use --overwrite to replace it.")]
    AlreadyExists { filename: String },

    #[error("Skill not installed: {name}")]
    NotInstalled { name: String },

    #[error("Skill not found: {skill} in {source_repo} (branch: {branch})")]
    NotFound {
        skill: String,
        source_repo: String,
        branch: String,
    },

    #[error("Access forbidden for {skill} in {source_repo}. The repository may be private; set GITHUB_TOKEN to authenticate.")]
    Forbidden { skill: String, source_repo: String },

    #[error("Network error fetching {skill} from {source_repo}: {reason}")]
    Network {
        skill: String,
        source_repo: String,
        reason: String,
    },

    #[error("Invalid source format: {input}. Expected 'owner/repo'.")]
    InvalidSource { input: String },

    #[error("Fetched content for {skill} is invalid: {reason}")]
    InvalidContent { skill: String, reason: String },

    #[error("No configuration found at {0}. Run `skillsync init` first.")]
    ConfigMissing(PathBuf),

    #[error("Config file already exists: {0}")]
    ConfigExists(PathBuf),

    #[error("Cannot remove the default source '{0}'")]
    DefaultSourceProtected(String),

    #[error("Failed to {op} {path}: {reason}")]
    Storage {
        op: &'static str,
        path: PathBuf,
        reason: String,
    },
}

impl SyncError {
    pub(crate) fn storage(op: &'static str, path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        SyncError::Storage {
            op,
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
