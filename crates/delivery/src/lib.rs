//! Webhook delivery for the notification bridge.
//!
//! Implements [`bridge::PayloadSink`] and [`bridge::WebhookTransport`]:
//!
//! - [`DestinationResolver`] maps a payload's destination to a credential,
//!   falling back to the default conversation.
//! - [`Dispatcher`] performs synchronous sends and fire-and-forget sends on a
//!   tracked task pool.
//! - [`HttpTransport`] is the reqwest client behind the dispatcher.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, timeouts and task management live
//! here. The [`bridge`] crate sees only its port traits.

pub mod dispatcher;
pub mod resolver;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use resolver::DestinationResolver;
pub use transport::{HttpTransport, USER_AGENT};
