//! Project-local path layout.
//!
//! Everything skillsync persists lives under the project's `.claude/`
//! directory: the source config next to it, skill files and their metadata
//! in `.claude/skills/`.

use std::env;
use std::path::{Path, PathBuf};

pub const CLAUDE_DIR: &str = ".claude";
pub const SKILLS_SUBDIR: &str = "skills";
pub const CONFIG_FILE: &str = "skill-sources.yaml";
pub const METADATA_FILE: &str = ".metadata.yaml";

/// Resolved paths for one project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        ProjectLayout { root: root.into() }
    }

    /// Walk up from the current directory to the nearest ancestor containing
    /// a `.claude/` directory; fall back to the current directory.
    pub fn discover() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut current: &Path = &cwd;
        loop {
            if current.join(CLAUDE_DIR).is_dir() {
                return ProjectLayout::at(current);
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return ProjectLayout::at(&cwd),
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CLAUDE_DIR).join(CONFIG_FILE)
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.root.join(CLAUDE_DIR).join(SKILLS_SUBDIR)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.skills_dir().join(METADATA_FILE)
    }

    pub fn skill_path(&self, filename: &str) -> PathBuf {
        self.skills_dir().join(filename)
    }
}

/// Normalize a skill name to its on-disk filename (`.md` appended once).
pub fn skill_filename(name: &str) -> String {
    if name.ends_with(".md") {
        name.to_string()
    } else {
        format!("{name}.md")
    }
}
