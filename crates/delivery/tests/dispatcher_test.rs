//! Dispatcher behaviour against a recording transport.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge::config::DestinationConfig;
use bridge::{
    DeliveryError, DestinationName, NotifierConfig, Payload, PayloadSink, TransportResponse,
    WebhookTransport,
};
use delivery::Dispatcher;
use pretty_assertions::assert_eq;
use tokio::runtime::Handle;
use tracing::subscriber::DefaultGuard;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Request {
    url: String,
    json: String,
}

struct RecordingTransport {
    answer: Result<TransportResponse, String>,
    requests: Mutex<Vec<Request>>,
}

impl RecordingTransport {
    fn answering(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(TransportResponse {
                status,
                body: body.to_string(),
            }),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            answer: Err("connection failed: refused".to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookTransport for RecordingTransport {
    async fn post(&self, url: &str, json: String) -> Result<TransportResponse, DeliveryError> {
        self.requests.lock().unwrap().push(Request {
            url: url.to_string(),
            json,
        });
        self.answer
            .clone()
            .map_err(|message| DeliveryError::Transport { message })
    }
}

/// Collects formatted log output for the current thread.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn config(default_token: Option<&str>) -> Arc<NotifierConfig> {
    let mut config = NotifierConfig::default();
    config.delivery.webhook_url = "https://hooks.example.com/webhook/".to_string();
    config.delivery.default_token = default_token.map(str::to_string);
    config
        .delivery
        .destinations
        .insert("teamY".to_string(), DestinationConfig { token: "def".to_string() });
    Arc::new(config)
}

fn dispatcher(config: Arc<NotifierConfig>, transport: Arc<RecordingTransport>) -> Dispatcher {
    Dispatcher::new(config, transport, Handle::current())
}

fn message() -> Payload {
    Payload::new().activity("Ann sent a message").body("  hi  ")
}

// ---------------------------------------------------------------------------
// Synchronous sends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_send_posts_to_default_conversation() {
    let transport = RecordingTransport::answering(200, "OK");
    let dispatcher = dispatcher(config(Some("abc")), transport.clone());

    dispatcher.send(&message()).await.unwrap();

    assert_eq!(
        transport.requests(),
        vec![Request {
            url: "https://hooks.example.com/webhook/abc".to_string(),
            json: r#"{"activity":"Ann sent a message","body":"hi"}"#.to_string(),
        }]
    );
}

#[tokio::test]
async fn sync_send_surfaces_rejection() {
    let transport = RecordingTransport::answering(500, "bad token");
    let dispatcher = dispatcher(config(Some("abc")), transport.clone());

    let err = dispatcher.send(&message()).await.unwrap_err();
    match err {
        DeliveryError::Rejected { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "bad token");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn sync_send_surfaces_transport_failure() {
    let transport = RecordingTransport::unreachable();
    let dispatcher = dispatcher(config(Some("abc")), transport);

    let err = dispatcher.send(&message()).await.unwrap_err();
    assert!(matches!(err, DeliveryError::Transport { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unknown_destination_falls_back_to_default() {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let transport = RecordingTransport::answering(200, "OK");
    let dispatcher = dispatcher(config(Some("abc")), transport.clone());

    let payload = message().destination(DestinationName::new("teamX").unwrap());
    dispatcher.send(&payload).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].url, "https://hooks.example.com/webhook/abc");
    assert!(!requests[0].json.contains("teamX"));
    assert!(!requests[0].json.contains("destination"));

    let output = logs.contents();
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("teamX"), "{output}");
    assert!(output.contains("delivery.destinations.teamX.token"), "{output}");
}

#[tokio::test]
async fn named_destination_uses_its_token() {
    let transport = RecordingTransport::answering(200, "OK");
    let dispatcher = dispatcher(config(Some("abc")), transport.clone());

    let payload = message().destination(DestinationName::new("teamY").unwrap());
    dispatcher.send(&payload).await.unwrap();

    assert_eq!(
        transport.requests()[0].url,
        "https://hooks.example.com/webhook/def"
    );
}

#[tokio::test]
async fn missing_credential_is_still_sent() {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let transport = RecordingTransport::answering(200, "OK");
    let dispatcher = dispatcher(config(None), transport.clone());

    dispatcher.send(&message()).await.unwrap();

    assert_eq!(transport.requests()[0].url, "https://hooks.example.com/webhook/");
    assert!(logs.contents().contains("empty credential"));
}

// ---------------------------------------------------------------------------
// Asynchronous sends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn async_send_logs_rejection_without_propagating() {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let transport = RecordingTransport::answering(500, "bad token");
    let dispatcher = dispatcher(config(Some("abc")), transport.clone());

    let id = dispatcher.send_async(message());
    assert!(id.is_some());

    dispatcher.stop();
    dispatcher.drained().await;

    assert_eq!(transport.requests().len(), 1);
    assert_eq!(dispatcher.in_flight(), 0);

    let output = logs.contents();
    assert!(output.contains("ERROR"), "{output}");
    assert!(output.contains("Asynchronous notification failed"), "{output}");
    assert!(output.contains("500"), "{output}");
    assert!(output.contains("bad token"), "{output}");
}

#[tokio::test]
async fn each_async_send_gets_its_own_id() {
    let transport = RecordingTransport::answering(200, "OK");
    let dispatcher = dispatcher(config(Some("abc")), transport.clone());

    let first = dispatcher.send_async(message()).unwrap();
    let second = dispatcher.send_async(message()).unwrap();
    assert_ne!(first, second);

    dispatcher.stop();
    dispatcher.drained().await;
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn stopped_dispatcher_refuses_new_work() {
    let transport = RecordingTransport::answering(200, "OK");
    let dispatcher = dispatcher(config(Some("abc")), transport.clone());

    dispatcher.stop();
    assert!(!dispatcher.is_accepting());
    assert_eq!(dispatcher.send_async(message()), None);

    dispatcher.submit(message());
    dispatcher.drained().await;
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn submit_goes_through_async_path() {
    let transport = RecordingTransport::answering(200, "OK");
    let dispatcher = Arc::new(dispatcher(config(Some("abc")), transport.clone()));

    let sink: Arc<dyn PayloadSink> = dispatcher.clone();
    sink.submit(message().destination(DestinationName::new("teamY").unwrap()));

    dispatcher.stop();
    dispatcher.drained().await;
    assert_eq!(
        transport.requests()[0].url,
        "https://hooks.example.com/webhook/def"
    );
}
