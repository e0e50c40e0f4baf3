//! Durable metadata for installed skills.
//!
//! One YAML file (`.claude/skills/.metadata.yaml`) maps skill filenames to
//! provenance records. Every mutation is flushed before returning, through
//! an atomic file replacement, so a crash leaves either the old or the new
//! document but never a partial one.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::fsutil;
use crate::project::ProjectLayout;

/// Provenance for one installed skill, keyed by its filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// `owner/repo` the skill was fetched from.
    pub source: String,
    pub branch: String,
    pub fetched_at: DateTime<Utc>,
    /// Algorithm-prefixed content digest, e.g. `sha256:<hex>`.
    pub checksum: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    skills: BTreeMap<String, SkillRecord>,
}

/// The metadata file collaborator. All reads go through [`load`]; all
/// mutations are write-through.
///
/// [`load`]: MetadataStore::load
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(layout: &ProjectLayout) -> Self {
        MetadataStore {
            path: layout.metadata_path(),
        }
    }

    /// The full mapping; empty when no metadata file exists yet.
    pub fn load(&self) -> Result<BTreeMap<String, SkillRecord>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| SyncError::storage("read", &self.path, e))?;
        let file: MetadataFile = serde_yaml::from_str(&raw)
            .map_err(|e| SyncError::storage("parse", &self.path, e))?;
        Ok(file.skills)
    }

    pub fn get(&self, filename: &str) -> Result<Option<SkillRecord>> {
        Ok(self.load()?.remove(filename))
    }

    /// Insert or replace the record for `filename`.
    pub fn upsert(&self, filename: &str, record: SkillRecord) -> Result<()> {
        let mut skills = self.load()?;
        skills.insert(filename.to_string(), record);
        self.save(skills)
    }

    /// Delete the record for `filename`; returns whether it existed.
    /// Deleting an absent record is a successful no-op.
    pub fn remove(&self, filename: &str) -> Result<bool> {
        let mut skills = self.load()?;
        let existed = skills.remove(filename).is_some();
        if existed {
            self.save(skills)?;
        }
        Ok(existed)
    }

    /// All records ordered by filename, for stable display.
    pub fn list(&self) -> Result<Vec<(String, SkillRecord)>> {
        Ok(self.load()?.into_iter().collect())
    }

    fn save(&self, skills: BTreeMap<String, SkillRecord>) -> Result<()> {
        let raw = serde_yaml::to_string(&MetadataFile { skills })
            .map_err(|e| SyncError::storage("serialize", &self.path, e))?;
        fsutil::write_atomic(&self.path, raw.as_bytes())
    }
}
