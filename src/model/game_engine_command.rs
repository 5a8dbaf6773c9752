use uuid::Uuid;

use super::{Difficulty, GameMode, OperationType};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsChange {
    pub sound_enabled: Option<bool>,
    pub music_enabled: Option<bool>,
    pub show_visual_help: Option<bool>,
    pub time_limit_enabled: Option<bool>,
    pub difficulty: Option<Difficulty>,
    pub word_problem_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEngineCommand {
    StartSession {
        mode: GameMode,
        kind: OperationType,
        difficulty: Option<Difficulty>, // settings default when None
        count: usize,
    },
    SubmitAnswer {
        answer: u32,
        remainder: Option<u32>,
        time_spent_seconds: Option<f64>,
    },
    NextProblem,
    EndSession,
    RevealHint,
    PurchaseItem(String),
    EquipItem(String),
    RemoveWrongAnswer(Uuid),
    ReplayWrongAnswers(usize), // limit
    RecordMiniGameScore(u64),
    UpdateSettings(SettingsChange),
}
