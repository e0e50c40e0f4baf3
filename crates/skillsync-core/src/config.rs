//! Source registry: the allow-list, default source, and name aliases.
//!
//! Persisted as YAML at `.claude/skill-sources.yaml`. The allow-list is
//! authoritative: the default source is only usable for fetching while it is
//! also a member of `allowed_sources`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::fsutil;
use crate::project::ProjectLayout;
use crate::source::{self, SkillSource};

/// Bootstrap default when `skillsync init` is run without `--source`.
pub const DEFAULT_SOURCE: &str = "mojzis/marimo-template";

/// Contents of the skill-sources config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub default_source: String,
    /// Insertion order is preserved for listing; membership checks ignore it.
    #[serde(default)]
    pub allowed_sources: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl SourceConfig {
    /// Resolve an alias in exactly one hop; unknown names pass through.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Allow-list membership by `owner/repo`; the branch is ignored.
    pub fn is_allowed(&self, source: &SkillSource) -> bool {
        let full = source.full_name();
        self.allowed_sources.iter().any(|s| *s == full)
    }

    /// The source a fetch should use: the explicit one when given, else the default.
    pub fn effective_source<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit.unwrap_or(&self.default_source)
    }

    fn validate(&self) -> Result<()> {
        source::validate(&self.default_source)?;
        for s in &self.allowed_sources {
            source::validate(s)?;
        }
        Ok(())
    }
}

/// Loads and persists [`SourceConfig`]; every mutation is written through
/// before returning.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(layout: &ProjectLayout) -> Self {
        ConfigStore {
            path: layout.config_path(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<SourceConfig> {
        if !self.path.exists() {
            return Err(SyncError::ConfigMissing(self.path.clone()));
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| SyncError::storage("read", &self.path, e))?;
        let config: SourceConfig = serde_yaml::from_str(&raw)
            .map_err(|e| SyncError::storage("parse", &self.path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &SourceConfig) -> Result<()> {
        let raw = serde_yaml::to_string(config)
            .map_err(|e| SyncError::storage("serialize", &self.path, e))?;
        fsutil::write_atomic(&self.path, raw.as_bytes())
    }

    /// Create a fresh config with `default` as both the default source and
    /// the sole allow-list entry. Errors if the file already exists.
    pub fn init(&self, default: Option<&str>) -> Result<SourceConfig> {
        if self.path.exists() {
            return Err(SyncError::ConfigExists(self.path.clone()));
        }
        let default = default.unwrap_or(DEFAULT_SOURCE);
        source::validate(default)?;
        let config = SourceConfig {
            default_source: default.to_string(),
            allowed_sources: vec![default.to_string()],
            aliases: BTreeMap::new(),
        };
        self.save(&config)?;
        tracing::info!(path = %self.path.display(), default_source = default, "initialized config");
        Ok(config)
    }

    pub fn load_or_init(&self, default: Option<&str>) -> Result<SourceConfig> {
        match self.load() {
            Err(SyncError::ConfigMissing(_)) => self.init(default),
            other => other,
        }
    }

    /// Resolve an alias without requiring a config file to exist.
    pub fn resolve_alias(&self, name: &str) -> Result<String> {
        match self.load() {
            Ok(config) => Ok(config.resolve_alias(name).to_string()),
            Err(SyncError::ConfigMissing(_)) => Ok(name.to_string()),
            Err(e) => Err(e),
        }
    }

    /// Add a source to the allow-list. Adding an existing member is a no-op.
    pub fn add_source(&self, source: &str) -> Result<SourceConfig> {
        source::validate(source)?;
        let mut config = self.load()?;
        if !config.allowed_sources.iter().any(|s| s == source) {
            config.allowed_sources.push(source.to_string());
            self.save(&config)?;
            tracing::info!(source, "added allowed source");
        }
        Ok(config)
    }

    /// Remove a source from the allow-list. Removing an absent member is a
    /// no-op; removing the default source is rejected.
    pub fn remove_source(&self, source: &str) -> Result<SourceConfig> {
        let mut config = self.load()?;
        if source == config.default_source {
            return Err(SyncError::DefaultSourceProtected(source.to_string()));
        }
        if let Some(pos) = config.allowed_sources.iter().position(|s| s == source) {
            config.allowed_sources.remove(pos);
            self.save(&config)?;
            tracing::info!(source, "removed allowed source");
        }
        Ok(config)
    }

    /// Register `alias` for `skill_name`, replacing any previous target.
    pub fn add_alias(&self, alias: &str, skill_name: &str) -> Result<SourceConfig> {
        let mut config = self.load()?;
        config
            .aliases
            .insert(alias.to_string(), skill_name.to_string());
        self.save(&config)?;
        Ok(config)
    }
}
