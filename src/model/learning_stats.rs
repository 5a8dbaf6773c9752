use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Difficulty, OperationType};

/// Count of attempts and correct attempts plus the running mean answer time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Tally {
    pub total: u32,
    pub correct: u32,
    pub average_time: f64,
}

impl Tally {
    pub fn record(&mut self, is_correct: bool, time_spent_seconds: f64) {
        let old_total = self.total as f64;
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
        self.average_time =
            (self.average_time * old_total + time_spent_seconds) / self.total as f64;
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct DifficultyBreakdown {
    pub easy: Tally,
    pub medium: Tally,
    pub hard: Tally,
}

impl DifficultyBreakdown {
    pub fn get(&self, difficulty: Difficulty) -> &Tally {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn get_mut(&mut self, difficulty: Difficulty) -> &mut Tally {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct OperationStats {
    pub tally: Tally,
    pub by_difficulty: DifficultyBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DailyStreak {
    pub count: u32,
    /// `None` until the first answer is recorded.
    pub last_played: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ModeScores {
    /// Cumulative over all non-battle sessions.
    pub single: u64,
    /// Cumulative over battles.
    pub battle: u64,
    /// Best single mini-game run.
    pub mini_game_best: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LearningStats {
    pub overall: Tally,
    pub total_time: f64,
    pub multiplication: OperationStats,
    pub division: OperationStats,
    pub streak: DailyStreak,
    pub mode_scores: ModeScores,
}

impl LearningStats {
    pub fn operation(&self, kind: OperationType) -> &OperationStats {
        match kind {
            OperationType::Multiplication => &self.multiplication,
            OperationType::Division => &self.division,
        }
    }

    pub fn operation_mut(&mut self, kind: OperationType) -> &mut OperationStats {
        match kind {
            OperationType::Multiplication => &mut self.multiplication,
            OperationType::Division => &mut self.division,
        }
    }

    pub fn total_problems(&self) -> u32 {
        self.overall.total
    }

    pub fn correct_answers(&self) -> u32 {
        self.overall.correct
    }
}
