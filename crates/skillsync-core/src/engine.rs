//! The synchronization engine: fetch, update, update-all, remove, list.
//!
//! Each operation is a single transaction. Whatever the outcome, the local
//! skill file and its metadata record agree at the end: either both exist or
//! neither does. New content lands in a temp file first, the record is
//! persisted, then the file is renamed into place; a rename failure rolls
//! the record back.

use std::fs;

use chrono::Utc;

use crate::config::{ConfigStore, SourceConfig};
use crate::error::{Result, SyncError};
use crate::fetch::RemoteFetcher;
use crate::integrity;
use crate::project::{self, ProjectLayout};
use crate::source::SkillSource;
use crate::store::{MetadataStore, SkillRecord};

/// Outcome of a successful fetch or update.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub filename: String,
    pub source: String,
    pub branch: String,
    pub checksum: String,
}

/// Whether an update actually changed the installed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Updated,
    Unchanged,
}

/// Per-skill result of [`SyncEngine::update_all`].
pub type UpdateOutcome = (String, std::result::Result<UpdateStatus, SyncError>);

pub struct SyncEngine<F: RemoteFetcher> {
    layout: ProjectLayout,
    config: ConfigStore,
    store: MetadataStore,
    fetcher: F,
}

impl<F: RemoteFetcher> SyncEngine<F> {
    pub fn new(layout: ProjectLayout, fetcher: F) -> Self {
        let config = ConfigStore::new(&layout);
        let store = MetadataStore::new(&layout);
        SyncEngine {
            layout,
            config,
            store,
            fetcher,
        }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Fetch a skill into the project.
    ///
    /// Alias resolution happens before any other lookup; the allow-list gate
    /// and the local-existence check both precede the network call.
    pub fn fetch(
        &self,
        name: &str,
        explicit_source: Option<&str>,
        branch: &str,
        overwrite: bool,
    ) -> Result<FetchReport> {
        let config = self.config.load()?;
        let skill_name = config.resolve_alias(name).to_string();
        if skill_name != name {
            tracing::debug!(alias = name, resolved = %skill_name, "resolved alias");
        }
        let source_name = config.effective_source(explicit_source).to_string();
        let source = SkillSource::parse(&source_name, branch)?;
        if !config.is_allowed(&source) {
            return Err(SyncError::SourceNotAllowed {
                source_repo: source.full_name(),
            });
        }

        let filename = project::skill_filename(&skill_name);
        if self.layout.skill_path(&filename).exists() && !overwrite {
            return Err(SyncError::AlreadyExists { filename });
        }

        let bytes = self.fetcher.fetch(&source, &skill_name)?;
        let checksum = integrity::digest(&bytes);
        self.commit(&filename, &source, &bytes, &checksum)?;

        tracing::info!(%filename, source = %source.full_name(), branch = %source.branch, "installed skill");
        Ok(FetchReport {
            filename,
            source: source.full_name(),
            branch: source.branch,
            checksum,
        })
    }

    /// Re-fetch an installed skill from the source and branch recorded for
    /// it, so it keeps tracking the repository it originally came from.
    pub fn update(&self, name: &str) -> Result<(UpdateStatus, FetchReport)> {
        let config = self.config.load()?;
        let skill_name = config.resolve_alias(name).to_string();
        let filename = project::skill_filename(&skill_name);
        self.update_filename(&config, &filename)
    }

    /// Update every installed skill sequentially. One skill's failure never
    /// aborts the rest; the caller gets a per-skill result to report.
    pub fn update_all(&self) -> Result<Vec<UpdateOutcome>> {
        let config = self.config.load()?;
        let entries = self.store.list()?;
        let mut outcomes = Vec::with_capacity(entries.len());
        for (filename, _) in entries {
            let result = self
                .update_filename(&config, &filename)
                .map(|(status, _)| status);
            if let Err(ref e) = result {
                tracing::warn!(%filename, error = %e, "update failed");
            }
            outcomes.push((filename, result));
        }
        Ok(outcomes)
    }

    /// Remove a skill's file and record. Succeeds when either one exists,
    /// healing a previously broken file/record invariant.
    pub fn remove(&self, name: &str) -> Result<()> {
        let skill_name = self.config.resolve_alias(name)?;
        let filename = project::skill_filename(&skill_name);
        let path = self.layout.skill_path(&filename);

        let file_existed = path.exists();
        if file_existed {
            fs::remove_file(&path).map_err(|e| SyncError::storage("remove", &path, e))?;
        }
        let record_existed = self.store.remove(&filename)?;

        if !file_existed && !record_existed {
            return Err(SyncError::NotInstalled { name: skill_name });
        }
        tracing::info!(%filename, "removed skill");
        Ok(())
    }

    /// All installed skills, ordered by filename. No network access.
    pub fn list(&self) -> Result<Vec<(String, SkillRecord)>> {
        self.store.list()
    }

    fn update_filename(
        &self,
        config: &SourceConfig,
        filename: &str,
    ) -> Result<(UpdateStatus, FetchReport)> {
        let Some(record) = self.store.get(filename)? else {
            return Err(SyncError::NotInstalled {
                name: filename.to_string(),
            });
        };
        let source = SkillSource::parse(&record.source, record.branch.clone())?;
        if !config.is_allowed(&source) {
            return Err(SyncError::SourceNotAllowed {
                source_repo: source.full_name(),
            });
        }

        let skill_name = filename.strip_suffix(".md").unwrap_or(filename);
        let bytes = self.fetcher.fetch(&source, skill_name)?;
        let checksum = integrity::digest(&bytes);
        let status = if checksum == record.checksum {
            UpdateStatus::Unchanged
        } else {
            UpdateStatus::Updated
        };
        self.commit(filename, &source, &bytes, &checksum)?;

        tracing::info!(%filename, ?status, "updated skill");
        Ok((
            status,
            FetchReport {
                filename: filename.to_string(),
                source: source.full_name(),
                branch: source.branch,
                checksum,
            },
        ))
    }

    /// Make the skill file and its record visible together.
    fn commit(
        &self,
        filename: &str,
        source: &SkillSource,
        bytes: &[u8],
        checksum: &str,
    ) -> Result<()> {
        use std::io::Write;

        let skills_dir = self.layout.skills_dir();
        fs::create_dir_all(&skills_dir)
            .map_err(|e| SyncError::storage("create directory", &skills_dir, e))?;

        let path = self.layout.skill_path(filename);
        let mut tmp = tempfile::NamedTempFile::new_in(&skills_dir)
            .map_err(|e| SyncError::storage("create temp file in", &skills_dir, e))?;
        tmp.write_all(bytes)
            .map_err(|e| SyncError::storage("write", &path, e))?;

        let previous = self.store.get(filename)?;
        self.store.upsert(
            filename,
            SkillRecord {
                source: source.full_name(),
                branch: source.branch.clone(),
                fetched_at: Utc::now(),
                checksum: checksum.to_string(),
            },
        )?;

        if let Err(e) = tmp.persist(&path) {
            // Keep file and record in agreement: undo the upsert.
            match previous {
                Some(record) => self.store.upsert(filename, record)?,
                None => {
                    self.store.remove(filename)?;
                }
            }
            return Err(SyncError::storage("replace", &path, e.error));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    enum Remote {
        Content(Vec<u8>),
        NotFound,
        Forbidden,
        Network,
    }

    /// In-memory fetcher keyed by `owner/repo@branch/name`.
    struct FakeFetcher {
        remotes: HashMap<String, Remote>,
    }

    impl FakeFetcher {
        fn new() -> Self {
            FakeFetcher {
                remotes: HashMap::new(),
            }
        }

        fn with(mut self, source: &str, branch: &str, name: &str, remote: Remote) -> Self {
            self.remotes
                .insert(format!("{source}@{branch}/{name}"), remote);
            self
        }
    }

    impl RemoteFetcher for FakeFetcher {
        fn fetch(&self, source: &SkillSource, skill_name: &str) -> Result<Vec<u8>> {
            let key = format!("{}@{}/{}", source.full_name(), source.branch, skill_name);
            match self.remotes.get(&key) {
                Some(Remote::Content(bytes)) => Ok(bytes.clone()),
                Some(Remote::Forbidden) => Err(SyncError::Forbidden {
                    skill: skill_name.to_string(),
                    source_repo: source.full_name(),
                }),
                Some(Remote::Network) => Err(SyncError::Network {
                    skill: skill_name.to_string(),
                    source_repo: source.full_name(),
                    reason: "connection refused".to_string(),
                }),
                Some(Remote::NotFound) | None => Err(SyncError::NotFound {
                    skill: skill_name.to_string(),
                    source_repo: source.full_name(),
                    branch: source.branch.clone(),
                }),
            }
        }
    }

    fn engine_in(root: &Path, fetcher: FakeFetcher) -> SyncEngine<FakeFetcher> {
        let engine = SyncEngine::new(ProjectLayout::at(root), fetcher);
        engine.config().init(Some("acme/skills")).unwrap();
        engine
    }

    /// Spec invariant: file existence and record existence agree for every
    /// filename after every operation.
    fn assert_files_match_records(engine: &SyncEngine<FakeFetcher>) {
        let records = engine.store().load().unwrap();
        for filename in records.keys() {
            assert!(
                engine.layout.skill_path(filename).exists(),
                "record without file: {filename}"
            );
        }
        let skills_dir = engine.layout.skills_dir();
        if skills_dir.exists() {
            for entry in fs::read_dir(&skills_dir).unwrap().flatten() {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.ends_with(".md") {
                    assert!(records.contains_key(&name), "file without record: {name}");
                }
            }
        }
    }

    const TOOL_DIGEST: &str =
        "sha256:5ab533feea6013e27c565a4d437c5043d5e2f08fed7895e17cdecaaaa6a00c37";

    #[test]
    fn fetch_installs_file_and_record() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher =
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::Content(b"# Tool\n".to_vec()));
        let engine = engine_in(tmp.path(), fetcher);

        let report = engine.fetch("tool", None, "main", false).unwrap();
        assert_eq!(report.filename, "tool.md");
        assert_eq!(report.source, "acme/skills");
        assert_eq!(report.checksum, TOOL_DIGEST);

        let written = fs::read(engine.layout.skill_path("tool.md")).unwrap();
        assert_eq!(written, b"# Tool\n");
        let record = engine.store().get("tool.md").unwrap().unwrap();
        assert_eq!(record.checksum, TOOL_DIGEST);
        assert_eq!(record.branch, "main");
        assert_files_match_records(&engine);
    }

    #[test]
    fn fetch_from_disallowed_source_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher =
            FakeFetcher::new().with("other/repo", "main", "tool", Remote::Content(b"# Tool\n".to_vec()));
        let engine = engine_in(tmp.path(), fetcher);

        let err = engine.fetch("tool", Some("other/repo"), "main", false).unwrap_err();
        assert!(matches!(err, SyncError::SourceNotAllowed { .. }));
        assert!(engine.store().load().unwrap().is_empty());
        assert!(!engine.layout.skill_path("tool.md").exists());
        assert_files_match_records(&engine);
    }

    #[test]
    fn allow_list_is_authoritative_over_default() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher =
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::Content(b"# Tool\n".to_vec()));
        let engine = engine_in(tmp.path(), fetcher);

        // Hand-edit the config so the default is no longer allowed.
        let mut config = engine.config().load().unwrap();
        config.allowed_sources.clear();
        engine.config().save(&config).unwrap();

        let err = engine.fetch("tool", None, "main", false).unwrap_err();
        assert!(matches!(err, SyncError::SourceNotAllowed { .. }));
    }

    #[test]
    fn fetch_not_found_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(
            tmp.path(),
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::NotFound),
        );

        let err = engine.fetch("tool", None, "main", false).unwrap_err();
        assert!(matches!(err, SyncError::NotFound { .. }));
        assert!(engine.store().load().unwrap().is_empty());
        assert_files_match_records(&engine);
    }

    #[test]
    fn fetch_forbidden_is_not_reported_as_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(
            tmp.path(),
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::Forbidden),
        );

        let err = engine.fetch("tool", None, "main", false).unwrap_err();
        assert!(matches!(err, SyncError::Forbidden { .. }));
        assert_files_match_records(&engine);
    }

    #[test]
    fn fetch_existing_without_overwrite_skips_network() {
        let tmp = tempfile::tempdir().unwrap();
        // No remote registered at all: if the engine hit the network the
        // fake would return NotFound instead of AlreadyExists.
        let engine = engine_in(tmp.path(), FakeFetcher::new());
        let skills_dir = engine.layout.skills_dir();
        fs::create_dir_all(&skills_dir).unwrap();
        fs::write(engine.layout.skill_path("tool.md"), b"# Tool\n").unwrap();

        let err = engine.fetch("tool", None, "main", false).unwrap_err();
        assert!(matches!(err, SyncError::AlreadyExists { .. }));
    }

    #[test]
    fn overwrite_fetch_is_idempotent_with_fresh_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher =
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::Content(b"# Tool\n".to_vec()));
        let engine = engine_in(tmp.path(), fetcher);

        engine.fetch("tool", None, "main", false).unwrap();
        let first = engine.store().get("tool.md").unwrap().unwrap();
        engine.fetch("tool", None, "main", true).unwrap();
        let second = engine.store().get("tool.md").unwrap().unwrap();

        assert_eq!(first.checksum, second.checksum);
        assert!(second.fetched_at >= first.fetched_at);
        assert_files_match_records(&engine);
    }

    #[test]
    fn fetch_resolves_alias_before_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new().with(
            "acme/skills",
            "main",
            "real-tool",
            Remote::Content(b"# Real\n".to_vec()),
        );
        let engine = engine_in(tmp.path(), fetcher);
        engine.config().add_alias("tool", "real-tool").unwrap();

        let report = engine.fetch("tool", None, "main", false).unwrap();
        assert_eq!(report.filename, "real-tool.md");
        assert!(engine.layout.skill_path("real-tool.md").exists());
        assert!(!engine.layout.skill_path("tool.md").exists());
    }

    #[test]
    fn update_tracks_recorded_source_not_default() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new()
            .with("other/repo", "dev", "tool", Remote::Content(b"# Tool v2\n".to_vec()))
            .with("acme/skills", "main", "tool", Remote::Content(b"# Wrong\n".to_vec()));
        let engine = engine_in(tmp.path(), fetcher);
        engine.config().add_source("other/repo").unwrap();

        // Installed from the non-default source on a non-default branch.
        engine.fetch("tool", Some("other/repo"), "dev", false).unwrap();
        let (status, report) = engine.update("tool").unwrap();

        assert_eq!(status, UpdateStatus::Unchanged);
        assert_eq!(report.source, "other/repo");
        assert_eq!(report.branch, "dev");
        let record = engine.store().get("tool.md").unwrap().unwrap();
        assert_eq!(record.source, "other/repo");
        assert_eq!(record.branch, "dev");
    }

    #[test]
    fn update_reports_changed_content() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(
            tmp.path(),
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::Content(b"# Tool\n".to_vec())),
        );
        engine.fetch("tool", None, "main", false).unwrap();

        // Simulate the remote moving on.
        let engine = SyncEngine::new(
            ProjectLayout::at(tmp.path()),
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::Content(b"# Tool v2\n".to_vec())),
        );
        let (status, _) = engine.update("tool").unwrap();
        assert_eq!(status, UpdateStatus::Updated);
        let written = fs::read(engine.layout.skill_path("tool.md")).unwrap();
        assert_eq!(written, b"# Tool v2\n");
    }

    #[test]
    fn update_missing_skill_is_not_installed() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path(), FakeFetcher::new());
        let err = engine.update("tool").unwrap_err();
        assert!(matches!(err, SyncError::NotInstalled { .. }));
    }

    #[test]
    fn update_all_isolates_per_skill_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new()
            .with("acme/skills", "main", "alpha", Remote::Content(b"# A\n".to_vec()))
            .with("acme/skills", "main", "beta", Remote::Content(b"# B\n".to_vec()))
            .with("acme/skills", "main", "gamma", Remote::Content(b"# C\n".to_vec()));
        let engine = engine_in(tmp.path(), fetcher);
        engine.fetch("alpha", None, "main", false).unwrap();
        engine.fetch("beta", None, "main", false).unwrap();
        engine.fetch("gamma", None, "main", false).unwrap();
        let before = engine.store().load().unwrap();

        // beta's remote disappears; the others still succeed.
        let engine = SyncEngine::new(
            ProjectLayout::at(tmp.path()),
            FakeFetcher::new()
                .with("acme/skills", "main", "alpha", Remote::Content(b"# A\n".to_vec()))
                .with("acme/skills", "main", "beta", Remote::NotFound)
                .with("acme/skills", "main", "gamma", Remote::Content(b"# C\n".to_vec())),
        );
        let outcomes = engine.update_all().unwrap();
        assert_eq!(outcomes.len(), 3);

        let failures: Vec<_> = outcomes.iter().filter(|(_, r)| r.is_err()).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "beta.md");
        assert!(matches!(failures[0].1, Err(SyncError::NotFound { .. })));

        let after = engine.store().load().unwrap();
        for name in ["alpha.md", "gamma.md"] {
            assert!(after[name].fetched_at >= before[name].fetched_at);
        }
        // The failed skill keeps its previous record and file.
        assert_eq!(after["beta.md"], before["beta.md"]);
        assert_files_match_records(&engine);
    }

    #[test]
    fn remove_deletes_file_and_record() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(
            tmp.path(),
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::Content(b"# Tool\n".to_vec())),
        );
        engine.fetch("tool", None, "main", false).unwrap();

        engine.remove("tool").unwrap();
        assert!(!engine.layout.skill_path("tool.md").exists());
        assert!(engine.store().get("tool.md").unwrap().is_none());
        assert_files_match_records(&engine);
    }

    #[test]
    fn remove_heals_record_without_file() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(
            tmp.path(),
            FakeFetcher::new().with("acme/skills", "main", "tool", Remote::Content(b"# Tool\n".to_vec())),
        );
        engine.fetch("tool", None, "main", false).unwrap();
        fs::remove_file(engine.layout.skill_path("tool.md")).unwrap();

        engine.remove("tool").unwrap();
        assert!(engine.store().get("tool.md").unwrap().is_none());
        assert_files_match_records(&engine);
    }

    #[test]
    fn remove_heals_file_without_record() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path(), FakeFetcher::new());
        fs::create_dir_all(engine.layout.skills_dir()).unwrap();
        fs::write(engine.layout.skill_path("tool.md"), b"# Tool\n").unwrap();

        engine.remove("tool").unwrap();
        assert!(!engine.layout.skill_path("tool.md").exists());
    }

    #[test]
    fn remove_unknown_skill_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path(), FakeFetcher::new());
        let err = engine.remove("tool").unwrap_err();
        assert!(matches!(err, SyncError::NotInstalled { .. }));
    }

    #[test]
    fn list_is_ordered_and_offline() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new()
            .with("acme/skills", "main", "zeta", Remote::Content(b"# Z\n".to_vec()))
            .with("acme/skills", "main", "alpha", Remote::Content(b"# A\n".to_vec()));
        let engine = engine_in(tmp.path(), fetcher);
        engine.fetch("zeta", None, "main", false).unwrap();
        engine.fetch("alpha", None, "main", false).unwrap();

        // A fetcher with no remotes: list must not touch it.
        let engine = SyncEngine::new(ProjectLayout::at(tmp.path()), FakeFetcher::new());
        let names: Vec<String> = engine.list().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alpha.md", "zeta.md"]);
    }
}
