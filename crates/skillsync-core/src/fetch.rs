//! Remote skill retrieval from raw GitHub content.
//!
//! One retrieval attempt per call; there is no retry policy anywhere in the
//! engine, transient failures surface immediately.

use std::io::Read;
use std::time::Duration;

use crate::error::{Result, SyncError};
use crate::project;
use crate::source::SkillSource;

/// Host serving raw repository content.
pub const RAW_CONTENT_HOST: &str = "https://raw.githubusercontent.com";

/// Skills larger than this are rejected.
pub const MAX_SKILL_SIZE: usize = 1024 * 1024;

const USER_AGENT: &str = concat!("skillsync/", env!("CARGO_PKG_VERSION"));

/// Seam between the engine and the network.
pub trait RemoteFetcher {
    /// Retrieve the named skill from `source` in a single attempt.
    fn fetch(&self, source: &SkillSource, skill_name: &str) -> Result<Vec<u8>>;
}

/// Build the raw-content URL for a skill. The path template is fixed for
/// compatibility with published skill repositories:
/// `{host}/{owner}/{repo}/{branch}/.claude/skills/{name}.md`.
pub fn skill_url(source: &SkillSource, skill_name: &str) -> String {
    let filename = project::skill_filename(skill_name);
    format!(
        "{RAW_CONTENT_HOST}/{}/{}/{}/.claude/skills/{}",
        source.owner, source.repo, source.branch, filename
    )
}

/// Production fetcher backed by a blocking ureq agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
    token: Option<String>,
}

impl HttpFetcher {
    /// `token` is an opaque credential attached to each request when present.
    /// It is never logged or persisted.
    pub fn new(token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .redirects(4)
            .build();
        HttpFetcher { agent, token }
    }
}

impl RemoteFetcher for HttpFetcher {
    fn fetch(&self, source: &SkillSource, skill_name: &str) -> Result<Vec<u8>> {
        let url = skill_url(source, skill_name);
        tracing::debug!(%url, "fetching skill");

        let mut request = self
            .agent
            .get(&url)
            .set("User-Agent", USER_AGENT)
            .set("Accept", "text/plain, text/markdown, */*");
        if let Some(ref token) = self.token {
            request = request.set("Authorization", &format!("token {token}"));
        }

        let response = match request.call() {
            Ok(resp) => resp,
            Err(e) => return Err(classify_failure(e, source, skill_name)),
        };

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_SKILL_SIZE as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| SyncError::Network {
                skill: skill_name.to_string(),
                source_repo: source.full_name(),
                reason: e.to_string(),
            })?;

        validate_content(&bytes, skill_name)?;
        Ok(bytes)
    }
}

/// Map a ureq failure onto the engine's taxonomy. 404 and 403 stay distinct:
/// their remediation differs (name/branch correction vs credential).
fn classify_failure(err: ureq::Error, source: &SkillSource, skill_name: &str) -> SyncError {
    match err {
        ureq::Error::Status(404, _) => SyncError::NotFound {
            skill: skill_name.to_string(),
            source_repo: source.full_name(),
            branch: source.branch.clone(),
        },
        ureq::Error::Status(403, _) => SyncError::Forbidden {
            skill: skill_name.to_string(),
            source_repo: source.full_name(),
        },
        ureq::Error::Status(code, _) => SyncError::Network {
            skill: skill_name.to_string(),
            source_repo: source.full_name(),
            reason: format!("unexpected status {code}"),
        },
        ureq::Error::Transport(t) => SyncError::Network {
            skill: skill_name.to_string(),
            source_repo: source.full_name(),
            reason: t.to_string(),
        },
    }
}

/// Reject empty and oversized bodies before anything touches disk.
pub(crate) fn validate_content(bytes: &[u8], skill_name: &str) -> Result<()> {
    if bytes.len() > MAX_SKILL_SIZE {
        return Err(SyncError::InvalidContent {
            skill: skill_name.to_string(),
            reason: format!("file too large: over {MAX_SKILL_SIZE} bytes"),
        });
    }
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(SyncError::InvalidContent {
            skill: skill_name.to_string(),
            reason: "fetched content is empty".to_string(),
        });
    }
    Ok(())
}
