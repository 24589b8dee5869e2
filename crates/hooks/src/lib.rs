//! Host event handlers for the notification bridge.
//!
//! The host server calls into these handlers from its post-receive and
//! ticket hooks. Each handler applies the posting gates, builds the payload,
//! routes it and hands it to a [`bridge::PayloadSink`]. A handler that
//! decides not to notify has no side effects.
//!
//! ## Architectural Layer
//!
//! **Orchestration.** Handlers wire the [`bridge`] domain to the host's
//! ports. They hold no message rules of their own.

use std::sync::Arc;

use bridge::{CommitGraph, RepositoryDirectory, UserDirectory};

pub mod push;
pub mod tickets;

pub use push::{ReceivedPush, RefChange, RefCommand, RefUpdateHandler};
pub use tickets::TicketHandler;

/// The host server's read-only services.
#[derive(Clone)]
pub struct HostServices {
    pub graph: Arc<dyn CommitGraph>,
    pub users: Arc<dyn UserDirectory>,
    pub repositories: Arc<dyn RepositoryDirectory>,
}
