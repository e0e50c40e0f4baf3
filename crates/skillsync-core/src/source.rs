//! Skill source references: `owner/repo` plus the branch to track.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, SyncError};

/// Branch used when none is given.
pub const DEFAULT_BRANCH: &str = "main";

fn source_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").expect("static source regex")
    })
}

/// A GitHub repository permitted to supply skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillSource {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl SkillSource {
    /// Parse a `owner/repo` string into a source tracking `branch`.
    pub fn parse(input: &str, branch: impl Into<String>) -> Result<Self> {
        validate(input)?;
        let Some((owner, repo)) = input.split_once('/') else {
            return Err(SyncError::InvalidSource {
                input: input.to_string(),
            });
        };
        Ok(SkillSource {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.into(),
        })
    }

    /// The `owner/repo` name, without the branch.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for SkillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Check that `input` is a well-formed `owner/repo` reference.
pub fn validate(input: &str) -> Result<()> {
    if source_re().is_match(input) {
        Ok(())
    } else {
        Err(SyncError::InvalidSource {
            input: input.to_string(),
        })
    }
}
