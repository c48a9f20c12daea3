//! RacePulse feed runner
//!
//! Connects to the live-timing feed and logs every event until interrupted.

use feed_service::{FeedConfig, FeedEvent, FeedSubscriber, LiveTimingClient};
use std::sync::Arc;
use tracing::{debug, info};

struct LogSubscriber;

impl FeedSubscriber for LogSubscriber {
    fn on_event(&self, event: &FeedEvent) -> anyhow::Result<()> {
        if event.is_raw() {
            debug!(topic = event.topic(), "raw event");
        } else {
            info!(topic = event.topic(), "event");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = FeedConfig::from_env();
    info!(negotiate_url = %config.negotiate_url, "starting feed client");

    let client = LiveTimingClient::new(config)?;
    client.attach(Arc::new(LogSubscriber));
    client.connect().await;
    info!("feed running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    client.disconnect().await;
    Ok(())
}
