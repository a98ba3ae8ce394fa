//! `buddy client`: interactive chat session

use std::sync::Arc;

use buddy_core::{Error, Roster};
use buddy_net::Client;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::Config;
use crate::console;
use crate::error::Result;
use crate::poller::Poller;
use crate::state::ClientState;

pub async fn run_client(config: &Config, screen_name: &str) -> Result<()> {
    if screen_name.trim().is_empty() {
        return Err(Error::Validation("Please enter a Screen Name.".to_string()).into());
    }

    let client = Client::new(config.client.server_url.as_str());
    let roster = Roster::new(config.client.buddies.iter().map(String::as_str));
    let state = Arc::new(ClientState::new(screen_name, roster));

    info!(
        server = client.base_url(),
        user = state.screen_name(),
        "Starting client session"
    );

    let poller = Poller::new(client.clone(), state.clone(), config.poll_interval());
    let refresh = poller.refresh_handle();

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let polling = tokio::spawn(poller.run(shutdown_rx));

    console::run(client, state, refresh).await;

    let _ = shutdown_tx.send(());
    if let Err(e) = polling.await {
        debug!(error = %e, "Poller task ended abnormally");
    }
    Ok(())
}
