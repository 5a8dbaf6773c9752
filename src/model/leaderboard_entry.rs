use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserProfile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardKind {
    Single,
    Battle,
    MiniGame,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub coins: u64,
    pub level: u32,
    pub total_problems: u32,
    pub total_time: f64,
    pub correct_answers: u32,
    pub single_mode_score: u64,
    pub battle_mode_score: u64,
    pub mini_game_score: u64,
    pub joined_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn from_profile(username: &str, profile: &UserProfile) -> Self {
        let stats = &profile.stats;
        Self {
            user_id: profile.id,
            username: username.to_string(),
            display_name: profile.name.clone(),
            coins: profile.coins,
            level: profile.character.level,
            total_problems: stats.total_problems(),
            total_time: stats.total_time,
            correct_answers: stats.correct_answers(),
            single_mode_score: stats.mode_scores.single,
            battle_mode_score: stats.mode_scores.battle,
            mini_game_score: stats.mode_scores.mini_game_best,
            joined_at: profile.created_at,
        }
    }

    pub fn score(&self, kind: LeaderboardKind) -> u64 {
        match kind {
            LeaderboardKind::Single => self.single_mode_score,
            LeaderboardKind::Battle => self.battle_mode_score,
            LeaderboardKind::MiniGame => self.mini_game_score,
        }
    }
}
