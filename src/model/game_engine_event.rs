use uuid::Uuid;

use super::{AchievementId, GameMode, Problem, UserAnswer, UserProfile};
use crate::game::session::SessionSummary;
use crate::game::settings::Settings;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEngineEvent {
    SessionStarted {
        session_id: Uuid,
        mode: GameMode,
        total_problems: usize,
    },
    ProblemPresented {
        index: usize,
        problem: Problem,
    },
    AnswerRecorded {
        answer: UserAnswer,
        correct_answer: u32,
        correct_remainder: Option<u32>,
        added_to_wrong_answers: bool,
    },
    HintRevealed {
        hint: String,
        hints_used: u32,
    },
    AchievementUnlocked(AchievementId),
    LeveledUp(u32),
    SessionEnded(SessionSummary),
    ProfileChanged(UserProfile),
    SettingsChanged(Settings),
    CommandRejected(String),
}
