//! reqwest implementation of [`WebhookTransport`].

use std::time::Duration;

use async_trait::async_trait;
use bridge::{DeliveryConfig, DeliveryError, TransportResponse, WebhookTransport};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// `User-Agent` sent with every webhook POST.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Posts payloads over HTTPS with reqwest.
///
/// A fresh client is built for every request with idle pooling disabled, so
/// no connection outlives the delivery that opened it.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    connect_timeout: Duration,
    response_timeout: Duration,
}

impl HttpTransport {
    pub fn new(connect_timeout: Duration, response_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            response_timeout,
        }
    }

    /// Creates a transport using the configured timeouts.
    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(config.connect_timeout(), config.response_timeout())
    }

    fn client(&self) -> Result<reqwest::Client, DeliveryError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.response_timeout)
            .pool_max_idle_per_host(0)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DeliveryError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn post(&self, url: &str, json: String) -> Result<TransportResponse, DeliveryError> {
        let response = self
            .client()?
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(json)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport {
                message: describe(e),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| DeliveryError::Transport {
            message: describe(e),
        })?;
        debug!(status, "Webhook responded");

        Ok(TransportResponse { status, body })
    }
}

// The request URL embeds the credential; keep it out of error text.
fn describe(error: reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    format!("{kind}: {}", error.without_url())
}
