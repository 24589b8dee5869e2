//! Links into the host's web UI.

use crate::{CommitId, RepositoryName};

/// Builds human-facing URLs relative to the host's canonical URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    base: String,
}

impl Links {
    /// Creates a link builder; a trailing `/` on `canonical_url` is ignored.
    pub fn new(canonical_url: &str) -> Self {
        Self {
            base: canonical_url.trim_end_matches('/').to_string(),
        }
    }

    /// Repository summary page.
    pub fn summary(&self, repo: &RepositoryName) -> String {
        format!("{}/summary?r={}", self.base, repo)
    }

    /// Commit log starting at a ref or commit.
    pub fn log(&self, repo: &RepositoryName, start: &str) -> String {
        format!("{}/log?r={}&h={}", self.base, repo, start)
    }

    /// Single commit view.
    pub fn commit(&self, repo: &RepositoryName, id: &CommitId) -> String {
        format!("{}/commit?r={}&h={}", self.base, repo, id)
    }

    /// Comparison of two revisions.
    pub fn compare(&self, repo: &RepositoryName, base: &CommitId, tip: &CommitId) -> String {
        format!("{}/compare?r={}&h={}..{}", self.base, repo, base, tip)
    }

    /// Ticket page.
    pub fn ticket(&self, repo: &RepositoryName, number: u64) -> String {
        format!("{}/tickets?r={}&h={}", self.base, repo, number)
    }
}
