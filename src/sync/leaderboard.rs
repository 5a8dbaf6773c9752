use std::collections::HashMap;

use async_trait::async_trait;
use itertools::Itertools;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::StoreError;
use crate::model::{LeaderboardEntry, LeaderboardKind};

/// Highest score first; ties keep their incoming order.
pub fn rank_entries(
    entries: &[LeaderboardEntry],
    kind: LeaderboardKind,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    entries
        .iter()
        .sorted_by(|a, b| b.score(kind).cmp(&a.score(kind)))
        .take(limit)
        .cloned()
        .collect()
}

/// 1-based position of `user_id` among `entries` when ranked by `kind`.
pub fn user_rank(
    entries: &[LeaderboardEntry],
    kind: LeaderboardKind,
    user_id: Uuid,
) -> Option<usize> {
    rank_entries(entries, kind, entries.len())
        .iter()
        .position(|entry| entry.user_id == user_id)
        .map(|index| index + 1)
}

/// Read-only view of published scores.
#[async_trait]
pub trait LeaderboardFeed: Send + Sync {
    async fn top(
        &self,
        kind: LeaderboardKind,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, StoreError>;

    async fn rank_of(&self, kind: LeaderboardKind, user_id: Uuid)
        -> Result<Option<usize>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryLeaderboard {
    entries: RwLock<HashMap<Uuid, LeaderboardEntry>>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any earlier entry of the same user.
    pub async fn publish(&self, entry: LeaderboardEntry) {
        self.entries.write().await.insert(entry.user_id, entry);
    }

    async fn snapshot(&self) -> Vec<LeaderboardEntry> {
        // joined_at keeps ties in a stable order across calls
        self.entries
            .read()
            .await
            .values()
            .cloned()
            .sorted_by_key(|entry| entry.joined_at)
            .collect()
    }
}

#[async_trait]
impl LeaderboardFeed for InMemoryLeaderboard {
    async fn top(
        &self,
        kind: LeaderboardKind,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(rank_entries(&self.snapshot().await, kind, limit))
    }

    async fn rank_of(
        &self,
        kind: LeaderboardKind,
        user_id: Uuid,
    ) -> Result<Option<usize>, StoreError> {
        Ok(user_rank(&self.snapshot().await, kind, user_id))
    }
}
