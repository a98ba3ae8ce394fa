//! Client session state
//!
//! Everything here is process-local. The roster, the away banner and the
//! last status snapshot disappear when the client exits; only `/send` and
//! `/status` calls change anything on the server.

use std::sync::{Mutex, MutexGuard, PoisonError};

use buddy_core::{AddBuddy, AwayBanner, BuddyEntry, Error, Result, Roster, StatusRecord};

/// Shared state for one terminal session
pub struct ClientState {
    screen_name: String,
    roster: Mutex<Roster>,
    banner: Mutex<AwayBanner>,
    /// Statuses from the most recent successful poll
    last_statuses: Mutex<Vec<StatusRecord>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ClientState {
    pub fn new(screen_name: impl Into<String>, roster: Roster) -> Self {
        Self {
            screen_name: screen_name.into().trim().to_string(),
            roster: Mutex::new(roster),
            banner: Mutex::new(AwayBanner::default()),
            last_statuses: Mutex::new(Vec::new()),
        }
    }

    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }

    /// Update the away banner for a newly picked status
    ///
    /// Runs before the status is sent, so the banner reflects the choice even
    /// if the server call fails.
    pub fn select_status(&self, status: &str, message: &str) -> Result<()> {
        if self.screen_name.is_empty() {
            return Err(Error::Validation(
                "Please enter a Screen Name before setting your status.".to_string(),
            ));
        }

        lock(&self.banner).apply(status, message);
        Ok(())
    }

    pub fn banner(&self) -> AwayBanner {
        lock(&self.banner).clone()
    }

    pub fn add_buddy(&self, name: &str) -> Result<AddBuddy> {
        lock(&self.roster).add(name)
    }

    pub fn roster_names(&self) -> Vec<String> {
        lock(&self.roster).names().to_vec()
    }

    /// Store a fresh poll result and return the rendered roster
    pub fn apply_statuses(&self, statuses: Vec<StatusRecord>) -> Vec<BuddyEntry> {
        let entries = lock(&self.roster).entries(&statuses);
        *lock(&self.last_statuses) = statuses;
        entries
    }

    /// Roster rendered against the last snapshot
    pub fn entries(&self) -> Vec<BuddyEntry> {
        let statuses = lock(&self.last_statuses);
        lock(&self.roster).entries(&statuses)
    }
}
