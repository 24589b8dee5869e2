//! Core domain for the repository-to-chat notification bridge.
//!
//! This crate turns repository and ticket events into chat payloads: the
//! activity line, the markdown body (commit tables, field tables, review
//! tables, links into the host's web UI) and the routing decision. It also
//! defines the ports through which the host server and the network are
//! reached. Infrastructure crates implement those ports; they never add
//! message rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepositoryName`, `CommitId`, etc.) |
//! | [`types`] | Shared value types (`UserProfile`, `CommitInfo`, `Credential`, etc.) |
//! | [`tickets`] | The ticket model read by ticket notifications |
//! | [`events`] | The closed set of reportable events |
//! | [`payload`] | The wire-level notification unit |
//! | [`builder`] | Event → payload transformation |
//! | [`commits`] | Commit range tables |
//! | [`fields`] | Ticket field tables and exclusion sets |
//! | [`reviews`] | Patchset review tables |
//! | [`links`] | Web UI link construction |
//! | [`avatar`] | Icon selection |
//! | [`policy`] | Delivery gating and destination routing |
//! | [`config`] | Typed configuration |
//! | [`ports`] | Traits implemented by the host and the delivery crate |
//! | [`errors`] | Error taxonomy |

pub mod avatar;
pub mod builder;
pub mod commits;
pub mod config;
pub mod errors;
pub mod events;
pub mod fields;
pub mod identifiers;
pub mod links;
pub mod payload;
pub mod policy;
pub mod ports;
pub mod reviews;
pub mod tickets;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use builder::PayloadBuilder;
pub use commits::{CommitSummarizer, CommitSummary};
pub use config::{DeliveryConfig, IconConfig, NotifierConfig, PostingConfig, WebConfig};
pub use errors::{ConfigError, DeliveryError, GraphError};
pub use events::{NotificationEvent, RefEvent, TicketEvent};
pub use identifiers::{
    CommitId, DeliveryId, DestinationName, ProjectPath, RefName, RepositoryName, Username,
};
pub use payload::Payload;
pub use ports::{
    CommitGraph, PayloadSink, RepositoryDirectory, TransportResponse, UserDirectory,
    WebhookTransport,
};
pub use tickets::{Change, Patchset, PatchsetType, Review, ReviewScore, Ticket, TicketField};
pub use types::{
    CommitInfo, Credential, PersonIdent, RefKind, RepositoryModel, Timestamp, UserProfile,
};
