//! Shared value types for the notification bridge domain.
//!
//! These are the shapes in which the host server hands over people,
//! repositories and commits. They carry just enough to render a message; the
//! host's own models stay on the host's side of the port traits.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CommitId, ProjectPath, RefName, RepositoryName, Username};

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

/// A host-server account, as resolved by [`crate::UserDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account name.
    pub username: Username,

    /// Full name shown in the web UI, if the account has one.
    pub display_name: Option<String>,

    /// Contact address, used for avatar lookups.
    pub email: Option<String>,
}

impl UserProfile {
    /// Creates a profile with no display name or email.
    pub fn new(username: Username) -> Self {
        Self {
            username,
            display_name: None,
            email: None,
        }
    }

    /// Returns the display name, falling back to the account name.
    pub fn display_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.username.as_str(),
        }
    }
}

/// Author identity recorded on a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIdent {
    /// Author name as written in the commit; may be empty.
    pub name: String,

    /// Author email as written in the commit, if any.
    pub email: Option<String>,
}

impl PersonIdent {
    /// Returns the name to show for this author.
    ///
    /// Prefers a non-empty name, then the lowercased email, then the raw
    /// identity string.
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => email.to_lowercase(),
            _ => self.to_string(),
        }
    }
}

impl std::fmt::Display for PersonIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{}>", self.name, email),
            None => write!(f, "{}", self.name),
        }
    }
}

// ---------------------------------------------------------------------------
// Repositories and commits
// ---------------------------------------------------------------------------

/// The repository attributes that drive gating and routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryModel {
    /// Repository name, including any `.git` suffix.
    pub name: RepositoryName,

    /// Project grouping path, if the repository is not at the top level.
    pub project_path: Option<ProjectPath>,

    /// Whether the repository lives in a user's personal namespace.
    pub personal: bool,
}

impl RepositoryModel {
    /// Creates a top-level, non-personal repository model.
    pub fn new(name: RepositoryName) -> Self {
        Self {
            name,
            project_path: None,
            personal: false,
        }
    }
}

/// One commit of a walked range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full commit id.
    pub id: CommitId,

    /// Commit author.
    pub author: PersonIdent,

    /// Full commit message.
    pub message: String,
}

impl CommitInfo {
    /// Returns the first line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim_end()
    }
}

/// Whether a ref is a branch or a tag.
///
/// Refs in any other namespace (notes, remotes, ticket refs) are not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    /// A ref under `refs/heads/`.
    Branch,
    /// A ref under `refs/tags/`.
    Tag,
}

impl RefKind {
    /// Classifies a ref by namespace, returning `None` for anything that is
    /// neither a branch nor a tag.
    pub fn of(ref_name: &RefName) -> Option<Self> {
        let name = ref_name.as_str();
        if name.starts_with("refs/tags/") {
            Some(Self::Tag)
        } else if name.starts_with("refs/heads/") {
            Some(Self::Branch)
        } else {
            None
        }
    }

    /// Returns the lowercase noun used in message text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Tag => "tag",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Opaque secret that selects a chat conversation's webhook endpoint.
///
/// The value is never written to logs; `Debug` prints a placeholder.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token. Empty tokens are accepted; the endpoint rejects them.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for building the endpoint URL.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Formats the timestamp with a `strftime`-style pattern.
    ///
    /// A pattern chrono cannot render falls back to RFC 3339.
    pub fn format(self, pattern: &str) -> String {
        let mut out = String::new();
        match write!(out, "{}", self.0.format(pattern)) {
            Ok(()) => out,
            Err(_) => self.0.to_rfc3339(),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
