pub mod achievements;
pub mod battle_room;
pub mod checker;
pub mod game_engine;
pub mod generator;
pub mod hints;
mod phrasing;
pub mod progress;
pub mod session;
pub mod settings;
pub mod shop;

pub use checker::check_answer;
pub use game_engine::{EngineError, GameEngine};
pub use generator::{ProblemGenerator, RandomSource};
pub use hints::{hints, HintReveal};
pub use session::{GameSession, SessionError, SessionSummary};
