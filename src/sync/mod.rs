//! The boundary to the remote profile service and local persistence.
//!
//! Nothing here changes game state; it only carries finished profiles out
//! and reports back when that fails.

mod auth;
mod leaderboard;
mod orchestrator;
mod scheduler;
mod snapshot;
mod store;

pub use auth::{AuthSession, Credential};
pub use leaderboard::{rank_entries, user_rank, InMemoryLeaderboard, LeaderboardFeed};
pub use orchestrator::SyncOrchestrator;
pub use scheduler::{SyncNotice, SyncScheduler, DEFAULT_SYNC_DEBOUNCE, MAX_SYNC_ATTEMPTS};
pub use snapshot::{LocalSnapshot, STORAGE_NAMESPACE};
pub use store::{InMemoryProfileStore, ProfileStore, StoreError};
