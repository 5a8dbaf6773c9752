use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BattleStatus {
    Waiting,
    Playing,
    Ended,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattleParticipant {
    pub user_id: Uuid,
    pub display_name: String,
    pub score: u64,
    pub correct_count: u32,
    pub joined_at: DateTime<Utc>,
    /// Final score already credited to the player's profile.
    #[serde(default)]
    pub settled: bool,
}

impl BattleParticipant {
    pub fn new(user_id: Uuid, display_name: &str) -> Self {
        Self {
            user_id,
            display_name: display_name.to_string(),
            score: 0,
            correct_count: 0,
            joined_at: Utc::now(),
            settled: false,
        }
    }
}
