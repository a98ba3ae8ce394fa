//! Roster status polling
//!
//! Fetches statuses for the roster on a fixed period, starting immediately.
//! One loop performs every fetch, so fetches never overlap: a slow response
//! delays the next tick, and refresh requests made while a fetch is running
//! collapse into one follow-up fetch.

use std::sync::Arc;
use std::time::Duration;

use buddy_core::BuddyEntry;
use buddy_net::Client;
use tokio::sync::{broadcast, Notify};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::console;
use crate::state::ClientState;

pub struct Poller {
    client: Client,
    state: Arc<ClientState>,
    period: Duration,
    refresh: Arc<Notify>,
}

impl Poller {
    pub fn new(client: Client, state: Arc<ClientState>, period: Duration) -> Self {
        Self {
            client,
            state,
            period,
            refresh: Arc::new(Notify::new()),
        }
    }

    /// Handle for requesting a fetch ahead of the next tick
    pub fn refresh_handle(&self) -> Arc<Notify> {
        self.refresh.clone()
    }

    /// Fetch statuses for the current roster and update the snapshot
    pub async fn refresh_once(&self) -> buddy_net::Result<Vec<BuddyEntry>> {
        let names = self.state.roster_names();
        let statuses = self.client.get_statuses(&names).await?;
        debug!(requested = names.len(), found = statuses.len(), "Fetched statuses");
        Ok(self.state.apply_statuses(statuses))
    }

    /// Poll until `shutdown` fires, printing the roster after each fetch
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            period_secs = self.period.as_secs(),
            "Starting status polling"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.refresh.notified() => {}
                _ = shutdown.recv() => {
                    debug!("Poller shutting down");
                    break;
                }
            }

            match self.refresh_once().await {
                Ok(entries) => console::print_roster(&entries),
                Err(e) => warn!(error = %e, "Failed to fetch statuses"),
            }
        }
    }
}
