//! Newtype domain identifiers.
//!
//! Every named thing the bridge passes around is a distinct newtype wrapping a
//! primitive. This keeps a [`RepositoryName`] from being handed to something
//! expecting a [`DestinationName`] even though both are strings under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Repository identifiers
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a repository on the host server, including any `.git`
    /// suffix (e.g. `"team/widgets.git"`).
    ///
    /// Links use the name verbatim; human-facing text uses [`RepositoryName::display_name`].
    RepositoryName
}

impl RepositoryName {
    /// Returns the repository name with a trailing `.git` removed.
    pub fn display_name(&self) -> &str {
        self.0.strip_suffix(".git").unwrap_or(&self.0)
    }
}

string_id! {
    /// The project grouping path a repository lives under (e.g. `"team"` for
    /// `"team/widgets.git"`). Doubles as a destination name when per-project
    /// destinations are enabled.
    ProjectPath
}

string_id! {
    /// A fully-qualified Git ref name (e.g. `"refs/heads/main"`).
    RefName
}

impl RefName {
    const SHORTENED_PREFIXES: [&'static str; 3] = ["refs/heads/", "refs/tags/", "refs/remotes/"];

    /// Returns the ref name without its well-known namespace prefix
    /// (`"refs/heads/main"` becomes `"main"`).
    pub fn short_name(&self) -> &str {
        Self::SHORTENED_PREFIXES
            .iter()
            .find_map(|prefix| self.0.strip_prefix(prefix))
            .unwrap_or(&self.0)
    }
}

string_id! {
    /// A Git commit id (40-character lowercase hex string).
    CommitId
}

impl CommitId {
    /// Returns the first `len` characters of the id, or the whole id when it
    /// is shorter than `len`.
    pub fn abbreviate(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

// ---------------------------------------------------------------------------
// People and destinations
// ---------------------------------------------------------------------------

string_id! {
    /// A host-server account name (e.g. `"ann"`).
    Username
}

string_id! {
    /// A named chat conversation that notifications may be routed to.
    ///
    /// Resolved to a delivery credential before sending; never transmitted.
    DestinationName
}

impl From<ProjectPath> for DestinationName {
    fn from(path: ProjectPath) -> Self {
        Self(path.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single asynchronous delivery attempt.
///
/// Generated when a payload is handed to the dispatcher's task pool and
/// recorded on every log line that delivery emits, so the submission and its
/// eventual outcome can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryId(Uuid);

impl DeliveryId {
    /// Generates a new random delivery identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
