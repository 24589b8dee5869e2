//! Synchronous and fire-and-forget payload delivery.
//!
//! Every delivery is attempted exactly once. Asynchronous sends run as tasks
//! on the runtime handle the dispatcher was given and are tracked so the
//! owner can wait for them before shutting down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bridge::{
    DeliveryConfig, DeliveryError, DeliveryId, NotifierConfig, Payload, PayloadSink,
    WebhookTransport,
};
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info_span, instrument, warn, Instrument};

use crate::resolver::DestinationResolver;
use crate::transport::HttpTransport;

/// Delivers payloads to the chat webhook.
///
/// One instance is created at startup and shared (behind an `Arc`) by every
/// event handler.
pub struct Dispatcher {
    config: Arc<NotifierConfig>,
    transport: Arc<dyn WebhookTransport>,
    handle: Handle,
    tracker: TaskTracker,
    accepting: AtomicBool,
}

impl Dispatcher {
    /// Creates a dispatcher that spawns asynchronous sends onto `handle`.
    pub fn new(
        config: Arc<NotifierConfig>,
        transport: Arc<dyn WebhookTransport>,
        handle: Handle,
    ) -> Self {
        Self {
            config,
            transport,
            handle,
            tracker: TaskTracker::new(),
            accepting: AtomicBool::new(true),
        }
    }

    /// Creates a dispatcher using the reqwest transport and the configured timeouts.
    pub fn with_http(config: Arc<NotifierConfig>, handle: Handle) -> Self {
        let transport = Arc::new(HttpTransport::from_config(&config.delivery));
        Self::new(config, transport, handle)
    }

    /// Delivers `payload` and waits for the outcome.
    #[instrument(skip_all, fields(destination = ?payload.destination_name()))]
    pub async fn send(&self, payload: &Payload) -> Result<(), DeliveryError> {
        deliver(&self.config.delivery, self.transport.as_ref(), payload).await
    }

    /// Queues `payload` for delivery and returns immediately.
    ///
    /// The outcome is only logged. Returns `None` once the dispatcher has
    /// been stopped.
    pub fn send_async(&self, payload: Payload) -> Option<DeliveryId> {
        if !self.is_accepting() {
            warn!(
                destination = ?payload.destination_name(),
                "Dispatcher stopped, dropping notification"
            );
            return None;
        }

        let id = DeliveryId::new_random();
        let config = Arc::clone(&self.config);
        let transport = Arc::clone(&self.transport);
        let span = info_span!(
            "async_delivery",
            delivery_id = %id,
            destination = ?payload.destination_name()
        );

        self.tracker.spawn_on(
            async move {
                match deliver(&config.delivery, transport.as_ref(), &payload).await {
                    Ok(()) => debug!("Asynchronous notification delivered"),
                    Err(e) => error!(error = %e, "Asynchronous notification failed"),
                }
            }
            .instrument(span),
            &self.handle,
        );
        Some(id)
    }

    /// Stops accepting asynchronous work. In-flight sends are not cancelled.
    pub fn stop(&self) {
        self.accepting.store(false, Ordering::Release);
        self.tracker.close();
    }

    /// Returns `false` once [`stop`](Self::stop) has been called.
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }

    /// Number of asynchronous sends still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until every asynchronous send has finished.
    ///
    /// Only completes after [`stop`](Self::stop).
    pub async fn drained(&self) {
        self.tracker.wait().await;
    }
}

impl PayloadSink for Dispatcher {
    fn submit(&self, payload: Payload) {
        self.send_async(payload);
    }
}

async fn deliver(
    config: &DeliveryConfig,
    transport: &dyn WebhookTransport,
    payload: &Payload,
) -> Result<(), DeliveryError> {
    let credential = DestinationResolver::new(config)
        .resolve(payload.destination_name())
        .unwrap_or_default();
    if credential.is_empty() {
        warn!(
            key = "delivery.default_token",
            "No webhook token configured, sending with an empty credential"
        );
    }
    let json = payload.to_json()?;
    let url = config.endpoint(&credential);

    let response = transport.post(&url, json.clone()).await?;
    if response.status != 200 {
        error!(
            status = response.status,
            request = %json,
            response = %response.body,
            "Webhook rejected notification"
        );
        return Err(DeliveryError::Rejected {
            status: response.status,
            body: response.body,
        });
    }

    debug!("Notification delivered");
    Ok(())
}
