//! Commit range summaries: a short markdown table plus a comparison link.
//!
//! Shared by branch pushes and ticket patchset updates. A range that cannot
//! be walked degrades to an empty summary so the surrounding message is
//! still delivered.

use tracing::error;

use crate::links::Links;
use crate::ports::CommitGraph;
use crate::{CommitId, CommitInfo, RepositoryName};

/// Maximum number of commits listed in a summary table.
pub const MAX_DISPLAYED_COMMITS: usize = 5;

/// Maximum subject length before truncation, matching the host's short log.
pub const SHORTLOG_LENGTH: usize = 78;

/// A walked range and its rendered markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of commits in the full range (not just the displayed rows).
    pub count: usize,
    /// Table and comparison link; empty when the range is empty.
    pub markdown: String,
}

/// Walks commit ranges and renders them.
pub struct CommitSummarizer<'a> {
    graph: &'a dyn CommitGraph,
    links: &'a Links,
    short_id_length: usize,
    max_commits: usize,
}

impl<'a> CommitSummarizer<'a> {
    /// Creates a summarizer showing at most [`MAX_DISPLAYED_COMMITS`] rows.
    pub fn new(graph: &'a dyn CommitGraph, links: &'a Links, short_id_length: usize) -> Self {
        Self {
            graph,
            links,
            short_id_length,
            max_commits: MAX_DISPLAYED_COMMITS,
        }
    }

    /// Overrides the display cap.
    pub fn with_max_commits(mut self, max_commits: usize) -> Self {
        self.max_commits = max_commits;
        self
    }

    /// Returns the commits introduced between `base` and `tip`, newest first.
    ///
    /// Graph failures are logged and yield an empty range.
    pub fn range(&self, repo: &RepositoryName, base: &CommitId, tip: &CommitId) -> Vec<CommitInfo> {
        match self.graph.commits_between(repo, base, tip) {
            Ok(commits) => commits,
            Err(e) => {
                error!(
                    repository = %repo,
                    base = %base,
                    tip = %tip,
                    error = %e,
                    "Failed to get commits"
                );
                Vec::new()
            }
        }
    }

    /// Walks and renders the range between `base` and `tip`.
    pub fn summarize(
        &self,
        repo: &RepositoryName,
        base: &CommitId,
        tip: &CommitId,
    ) -> CommitSummary {
        let commits = self.range(repo, base, tip);
        CommitSummary {
            count: commits.len(),
            markdown: self.render(repo, base, tip, &commits),
        }
    }

    /// Renders an already-walked range.
    pub fn render(
        &self,
        repo: &RepositoryName,
        base: &CommitId,
        tip: &CommitId,
        commits: &[CommitInfo],
    ) -> String {
        if commits.is_empty() {
            return String::new();
        }

        let mut md = String::from("|**Author**|**Commit**|**Message**|\n");
        for commit in commits.iter().take(self.max_commits) {
            md.push_str(&format!(
                "|{}|[{}]({})|{}|\n",
                escape_cell(&commit.author.display_name()),
                commit.id.abbreviate(self.short_id_length),
                self.links.commit(repo, &commit.id),
                escape_cell(&trim_subject(commit.subject(), SHORTLOG_LENGTH)),
            ));
        }

        if let Some(label) = comparison_label(commits.len(), self.max_commits) {
            md.push('\n');
            md.push_str(&format!("[{label}]({})", self.links.compare(repo, base, tip)));
        }
        md
    }
}

/// Returns the comparison link label for a range of `total` commits of which
/// at most `shown` are listed, or `None` when no link is warranted.
pub fn comparison_label(total: usize, shown: usize) -> Option<String> {
    if total <= 1 {
        return None;
    }
    Some(match total.checked_sub(shown) {
        Some(1) => "1 more commit".to_string(),
        Some(hidden) if hidden > 1 => format!("{hidden} more commits"),
        _ => format!("view comparison of these {total} commits"),
    })
}

/// Truncates `subject` to `max` characters, replacing the tail with `...`.
pub fn trim_subject(subject: &str, max: usize) -> String {
    if subject.chars().count() <= max {
        return subject.to_string();
    }
    let kept: String = subject.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Escapes text for a markdown table cell.
pub fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '|' => out.push_str("\\|"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GraphError;
    use crate::PersonIdent;
    use pretty_assertions::assert_eq;

    struct FixedGraph(Result<Vec<CommitInfo>, GraphError>);

    impl CommitGraph for FixedGraph {
        fn commits_between(
            &self,
            _repository: &RepositoryName,
            _base: &CommitId,
            _tip: &CommitId,
        ) -> Result<Vec<CommitInfo>, GraphError> {
            self.0.clone()
        }
    }

    fn commit(n: usize, subject: &str) -> CommitInfo {
        CommitInfo {
            id: CommitId::new(format!("{n:040x}")).unwrap(),
            author: PersonIdent {
                name: "Ann".into(),
                email: Some("ann@x.com".into()),
            },
            message: subject.to_string(),
        }
    }

    fn commits(n: usize) -> Vec<CommitInfo> {
        (1..=n).rev().map(|i| commit(i, &format!("change {i}"))).collect()
    }

    fn ids() -> (RepositoryName, CommitId, CommitId) {
        (
            RepositoryName::new("widgets.git").unwrap(),
            CommitId::new("base").unwrap(),
            CommitId::new("tip").unwrap(),
        )
    }

    fn row_count(markdown: &str) -> usize {
        markdown.lines().filter(|l| l.starts_with('|')).count().saturating_sub(1)
    }

    #[test]
    fn label_rules() {
        assert_eq!(comparison_label(0, 5), None);
        assert_eq!(comparison_label(1, 5), None);
        assert_eq!(comparison_label(2, 5).unwrap(), "view comparison of these 2 commits");
        assert_eq!(comparison_label(5, 5).unwrap(), "view comparison of these 5 commits");
        assert_eq!(comparison_label(6, 5).unwrap(), "1 more commit");
        assert_eq!(comparison_label(12, 5).unwrap(), "7 more commits");
    }

    #[test]
    fn table_rows_are_capped() {
        let links = Links::new("https://git");
        let (repo, base, tip) = ids();
        for size in [0usize, 1, 3, 5, 6, 9] {
            let graph = FixedGraph(Ok(commits(size)));
            let summary = CommitSummarizer::new(&graph, &links, 6).summarize(&repo, &base, &tip);
            assert_eq!(summary.count, size);
            assert_eq!(row_count(&summary.markdown), size.min(MAX_DISPLAYED_COMMITS));
            assert_eq!(summary.markdown.contains("compare?"), size > 1, "size {size}");
        }
    }

    #[test]
    fn renders_three_commit_range() {
        let links = Links::new("https://git");
        let (repo, base, tip) = ids();
        let graph = FixedGraph(Ok(commits(3)));
        let summary = CommitSummarizer::new(&graph, &links, 6).summarize(&repo, &base, &tip);

        let expected = "\
|**Author**|**Commit**|**Message**|
|Ann|[000000](https://git/commit?r=widgets.git&h=0000000000000000000000000000000000000003)|change 3|
|Ann|[000000](https://git/commit?r=widgets.git&h=0000000000000000000000000000000000000002)|change 2|
|Ann|[000000](https://git/commit?r=widgets.git&h=0000000000000000000000000000000000000001)|change 1|

[view comparison of these 3 commits](https://git/compare?r=widgets.git&h=base..tip)";
        assert_eq!(summary.markdown, expected);
    }

    #[test]
    fn graph_failure_degrades_to_empty() {
        let links = Links::new("https://git");
        let (repo, base, tip) = ids();
        let graph = FixedGraph(Err(GraphError::UnresolvedRevision {
            revision: "base".into(),
        }));
        let summary = CommitSummarizer::new(&graph, &links, 6).summarize(&repo, &base, &tip);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.markdown, "");
    }

    #[test]
    fn long_subjects_are_truncated_and_escaped() {
        let long = "x".repeat(100);
        let trimmed = trim_subject(&long, SHORTLOG_LENGTH);
        assert_eq!(trimmed.chars().count(), SHORTLOG_LENGTH);
        assert!(trimmed.ends_with("..."));
        assert_eq!(trim_subject("short", SHORTLOG_LENGTH), "short");

        assert_eq!(escape_cell("a|b <c> & \"d\""), "a\\|b &lt;c&gt; &amp; &quot;d&quot;");
    }

    #[test]
    fn custom_cap_is_honoured() {
        let links = Links::new("https://git");
        let (repo, base, tip) = ids();
        let graph = FixedGraph(Ok(commits(4)));
        let summary = CommitSummarizer::new(&graph, &links, 8)
            .with_max_commits(2)
            .summarize(&repo, &base, &tip);
        assert_eq!(row_count(&summary.markdown), 2);
        assert!(summary.markdown.contains("[2 more commits]"));
        assert!(summary.markdown.contains("[00000000]"));
    }
}
