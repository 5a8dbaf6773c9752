use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::auth::AuthSession;
use super::store::{ProfileStore, StoreError};
use crate::game::settings::Settings;
use crate::model::UserProfile;

pub const DEFAULT_SYNC_DEBOUNCE: Duration = Duration::from_millis(1000);
/// A save that keeps failing is given up after this many tries. The next
/// profile change schedules a fresh one.
pub const MAX_SYNC_ATTEMPTS: u32 = 5;

/// Outcome of a debounced save, for whoever shows sync status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncNotice {
    Saved(Uuid),
    Failed(String),
}

/// Coalesces bursts of profile changes into one remote save. At most one
/// save is pending; scheduling again cancels it and restarts the wait.
/// A save the store could not take is retried after a growing pause.
pub struct SyncScheduler {
    store: Arc<dyn ProfileStore>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
    notices: mpsc::UnboundedSender<SyncNotice>,
}

impl SyncScheduler {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SyncNotice>) {
        let (notices, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            store,
            debounce,
            pending: None,
            notices,
        };
        (scheduler, receiver)
    }

    pub fn with_settings(
        store: Arc<dyn ProfileStore>,
        settings: &Settings,
    ) -> (Self, mpsc::UnboundedReceiver<SyncNotice>) {
        Self::new(store, settings.sync_debounce())
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Must be called from within a tokio runtime. Returns `false` without
    /// scheduling anything when the session has no credential.
    pub fn schedule(&mut self, auth: &AuthSession, profile: UserProfile) -> bool {
        let Some(credential) = auth.credential().cloned() else {
            debug!(target: "sync", "Not signed in; skipping sync of {}", profile.id);
            return false;
        };
        if self.cancel() {
            debug!(target: "sync", "Restarting debounce for {}", profile.id);
        }

        let store = Arc::clone(&self.store);
        let notices = self.notices.clone();
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            for attempt in 1..=MAX_SYNC_ATTEMPTS {
                match store.save(&credential, &profile).await {
                    Ok(()) => {
                        debug!(target: "sync", "Synced profile {}", profile.id);
                        // nobody listening is fine
                        let _ = notices.send(SyncNotice::Saved(profile.id));
                        return;
                    }
                    Err(err) => {
                        warn!(
                            target: "sync",
                            "Failed to sync profile {} (attempt {}/{}): {}",
                            profile.id,
                            attempt,
                            MAX_SYNC_ATTEMPTS,
                            err
                        );
                        let _ = notices.send(SyncNotice::Failed(err.to_string()));
                        if !is_transient(&err) {
                            return;
                        }
                    }
                }
                if attempt < MAX_SYNC_ATTEMPTS {
                    tokio::time::sleep(debounce * attempt).await;
                }
            }
        }));
        true
    }

    /// Aborts the pending save, if any. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Hands over the pending save so it can be awaited without holding the
    /// scheduler.
    pub fn take_pending(&mut self) -> Option<JoinHandle<()>> {
        self.pending.take()
    }

    /// Waits for the pending save to finish, retries included.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.take_pending() {
            join(handle).await;
        }
    }
}

/// Only an outage is worth retrying; a rejected credential or a broken
/// payload will fail the same way again.
fn is_transient(err: &StoreError) -> bool {
    matches!(err, StoreError::Unavailable(_))
}

pub(super) async fn join(handle: JoinHandle<()>) {
    if let Err(err) = handle.await {
        if !err.is_cancelled() {
            warn!(target: "sync", "Sync task failed: {}", err);
        }
    }
}
