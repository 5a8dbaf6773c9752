use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Achievement, Character, LearningStats, WrongAnswerSet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub character: Character,
    pub coins: u64,
    pub stats: LearningStats,
    pub achievements: Vec<Achievement>,
    pub wrong_answers: WrongAnswerSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// The only place a fresh profile is built; every field starts populated.
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            character: Character::default(),
            coins: 0,
            stats: LearningStats::default(),
            achievements: Achievement::catalogue(),
            wrong_answers: WrongAnswerSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn add_coins(&mut self, amount: u64) {
        self.coins += amount;
        self.touch();
    }

    /// Deducts `amount` if the balance allows it.
    pub fn spend_coins(&mut self, amount: u64) -> bool {
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        self.touch();
        true
    }
}
