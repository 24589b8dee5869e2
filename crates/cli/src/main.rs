//! Command-line entry point for the notification bridge.
//!
//! This binary is the composition root. It:
//!
//! 1. **Parses configuration** from the YAML file named by `--config` and
//!    validates it.
//! 2. **Wires observability** through [`telemetry::init`]: `tracing-subscriber`
//!    on stderr plus an OTLP exporter when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 3. **Constructs the dispatcher** with the reqwest transport.
//! 4. **Runs an ad-hoc command**: `test` posts the canned test message and
//!    waits for the answer; `send` posts a free-form message asynchronously
//!    and waits for the dispatcher to drain before exiting.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use bridge::avatar::event_icon;
use bridge::{DestinationName, NotifierConfig, Payload, UserProfile, Username};
use clap::{Parser, Subcommand};
use delivery::Dispatcher;
use tokio::runtime::Handle;
use tracing::{info, warn};

mod telemetry;

#[derive(Debug, Parser)]
#[command(name = "notify", version, about = "Post repository notifications to chat webhooks")]
struct Cli {
    /// YAML configuration file
    #[arg(long, env = "NOTIFY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Overrides `delivery.default_token`
    #[arg(long, env = "NOTIFY_DEFAULT_TOKEN", hide_env_values = true, global = true)]
    default_token: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Account the message is sent on behalf of
    #[arg(long, default_value = "admin", global = true)]
    user: String,

    /// Email address used for the sender's avatar
    #[arg(long, global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Post a test message and wait for the result
    Test {
        /// Destination conversation (default conversation when omitted)
        destination: Option<String>,
    },

    /// Post a message without waiting for the endpoint
    #[command(alias = "post")]
    Send {
        /// Destination conversation (default conversation when omitted)
        destination: Option<String>,

        /// Markdown message body
        #[arg(short, long)]
        message: String,

        /// Message headline
        #[arg(short, long)]
        title: Option<String>,

        /// Activity line (defaults to "<user> sent a message")
        #[arg(short, long)]
        activity: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _telemetry = telemetry::init(&cli.log_level, cli.json_logs)?;

    let config = Arc::new(load_config(cli.config.as_deref(), cli.default_token.clone())?);
    let sender = sender(&cli)?;
    let icon = event_icon(None, &config.icons, &sender);
    let dispatcher = Dispatcher::with_http(Arc::clone(&config), Handle::current());

    match cli.command {
        Command::Test { destination } => {
            let payload = with_destination(
                Payload::test_message(&sender, icon, &config.web.canonical_url),
                destination,
            );
            dispatcher
                .send(&payload)
                .await
                .context("test message was not delivered")?;
            info!("Test message delivered");
        }
        Command::Send {
            destination,
            message,
            title,
            activity,
        } => {
            let payload = with_destination(
                Payload::ad_hoc(&sender, icon, activity, title, message),
                destination,
            );
            if dispatcher.send_async(payload).is_none() {
                warn!("Message was not queued");
            }
            dispatcher.stop();
            dispatcher.drained().await;
        }
    }
    Ok(())
}

fn load_config(
    path: Option<&Path>,
    default_token: Option<String>,
) -> anyhow::Result<NotifierConfig> {
    let mut config = match path {
        Some(path) => {
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            NotifierConfig::from_yaml_str(&document)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => NotifierConfig::default(),
    };
    if let Some(token) = default_token {
        config.delivery.default_token = Some(token);
    }
    Ok(config)
}

fn sender(cli: &Cli) -> anyhow::Result<UserProfile> {
    let username = Username::new(cli.user.trim()).context("--user must not be empty")?;
    Ok(UserProfile {
        username,
        display_name: None,
        email: cli.email.clone().filter(|e| !e.trim().is_empty()),
    })
}

fn with_destination(mut payload: Payload, destination: Option<String>) -> Payload {
    payload.set_destination(destination.and_then(DestinationName::new));
    payload
}
