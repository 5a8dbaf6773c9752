mod achievement;
mod battle;
mod character;
mod difficulty;
mod game_engine_command;
mod game_engine_event;
mod game_mode;
mod leaderboard_entry;
mod learning_stats;
mod operation_type;
mod problem;
mod timer_state;
mod user_answer;
mod user_profile;
mod wrong_answer_set;

pub use achievement::{
    Achievement, AchievementId, AchievementMetric, ACHIEVEMENT_COIN_REWARD, PERFECT_RUN_LENGTH,
};
pub use battle::{BattleParticipant, BattleStatus};
pub use character::{Character, CharacterItem, ItemSlot, EXPERIENCE_PER_LEVEL};
pub use difficulty::Difficulty;
pub use game_engine_command::{GameEngineCommand, SettingsChange};
pub use game_engine_event::GameEngineEvent;
pub use game_mode::{GameMode, ScoreBucket};
pub use leaderboard_entry::{LeaderboardEntry, LeaderboardKind};
pub use learning_stats::{
    DailyStreak, DifficultyBreakdown, LearningStats, ModeScores, OperationStats, Tally,
};
pub use operation_type::OperationType;
pub use problem::{Problem, ProblemKey, VisualCategory, VisualHelp};
pub use timer_state::TimerState;
pub use user_answer::UserAnswer;
pub use user_profile::UserProfile;
pub use wrong_answer_set::WrongAnswerSet;
