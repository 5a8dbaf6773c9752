use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OperationType;

/// Coins granted the moment an achievement unlocks.
pub const ACHIEVEMENT_COIN_REWARD: u64 = 100;

/// Number of trailing session answers that must all be correct for a perfect run.
pub const PERFECT_RUN_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstProblem,
    TenProblems,
    PerfectScore,
    WeekStreak,
    MultiplicationMaster,
    MultiplicationExpert100,
    MultiplicationMaster150,
    MultiplicationGrandmaster200,
    MultiplicationChampion300,
    DivisionMaster,
    DivisionExpert100,
    DivisionMaster150,
    DivisionGrandmaster200,
    DivisionChampion300,
}

/// The statistic an achievement's progress is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementMetric {
    TotalProblems,
    OperationTotal(OperationType),
    DailyStreak,
    /// Last answers of the current session all correct.
    PerfectRun,
}

impl AchievementId {
    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstProblem,
            Self::TenProblems,
            Self::PerfectScore,
            Self::WeekStreak,
            Self::MultiplicationMaster,
            Self::DivisionMaster,
            Self::DivisionExpert100,
            Self::DivisionMaster150,
            Self::DivisionGrandmaster200,
            Self::DivisionChampion300,
            Self::MultiplicationExpert100,
            Self::MultiplicationMaster150,
            Self::MultiplicationGrandmaster200,
            Self::MultiplicationChampion300,
        ]
    }

    pub fn target(&self) -> u32 {
        match self {
            Self::FirstProblem => 1,
            Self::TenProblems => 10,
            Self::PerfectScore => PERFECT_RUN_LENGTH as u32,
            Self::WeekStreak => 7,
            Self::MultiplicationMaster | Self::DivisionMaster => 50,
            Self::MultiplicationExpert100 | Self::DivisionExpert100 => 100,
            Self::MultiplicationMaster150 | Self::DivisionMaster150 => 150,
            Self::MultiplicationGrandmaster200 | Self::DivisionGrandmaster200 => 200,
            Self::MultiplicationChampion300 | Self::DivisionChampion300 => 300,
        }
    }

    pub fn metric(&self) -> AchievementMetric {
        match self {
            Self::FirstProblem | Self::TenProblems => AchievementMetric::TotalProblems,
            Self::PerfectScore => AchievementMetric::PerfectRun,
            Self::WeekStreak => AchievementMetric::DailyStreak,
            Self::MultiplicationMaster
            | Self::MultiplicationExpert100
            | Self::MultiplicationMaster150
            | Self::MultiplicationGrandmaster200
            | Self::MultiplicationChampion300 => {
                AchievementMetric::OperationTotal(OperationType::Multiplication)
            }
            Self::DivisionMaster
            | Self::DivisionExpert100
            | Self::DivisionMaster150
            | Self::DivisionGrandmaster200
            | Self::DivisionChampion300 => {
                AchievementMetric::OperationTotal(OperationType::Division)
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::FirstProblem => "First Step",
            Self::TenProblems => "Hard Worker",
            Self::PerfectScore => "Perfect!",
            Self::WeekStreak => "Power of Habit",
            Self::MultiplicationMaster => "Multiplication Master",
            Self::MultiplicationExpert100 => "Multiplication Expert",
            Self::MultiplicationMaster150 => "Multiplication Virtuoso",
            Self::MultiplicationGrandmaster200 => "Multiplication Grandmaster",
            Self::MultiplicationChampion300 => "Multiplication Champion",
            Self::DivisionMaster => "Division Master",
            Self::DivisionExpert100 => "Division Expert",
            Self::DivisionMaster150 => "Division Virtuoso",
            Self::DivisionGrandmaster200 => "Division Grandmaster",
            Self::DivisionChampion300 => "Division Champion",
        }
    }

    pub fn description(&self) -> String {
        match self.metric() {
            AchievementMetric::TotalProblems if self.target() == 1 => {
                "Solved your first problem!".to_string()
            }
            AchievementMetric::TotalProblems => format!("Solved {} problems!", self.target()),
            AchievementMetric::PerfectRun => {
                format!("Answered {} problems in a row correctly!", self.target())
            }
            AchievementMetric::DailyStreak => {
                format!("Practised {} days in a row!", self.target())
            }
            AchievementMetric::OperationTotal(kind) => {
                format!("Solved {} {} problems!", self.target(), kind)
            }
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.metric() {
            AchievementMetric::TotalProblems if self.target() == 1 => "🎯",
            AchievementMetric::TotalProblems => "📚",
            AchievementMetric::PerfectRun => "⭐",
            AchievementMetric::DailyStreak => "🔥",
            AchievementMetric::OperationTotal(OperationType::Multiplication) => "✖️",
            AchievementMetric::OperationTotal(OperationType::Division) => "➗",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    pub progress: u32,
    pub target: u32,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn locked(id: AchievementId) -> Self {
        Self {
            id,
            progress: 0,
            target: id.target(),
            unlocked: false,
            unlocked_at: None,
        }
    }

    pub fn catalogue() -> Vec<Achievement> {
        AchievementId::all()
            .iter()
            .copied()
            .map(Achievement::locked)
            .collect()
    }
}
