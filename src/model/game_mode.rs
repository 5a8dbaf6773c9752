use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Adventure,
    Practice,
    Challenge,
    Single,
    Battle,
    MiniGame,
}

/// Which cumulative score bucket a finished session feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBucket {
    Single,
    Battle,
    MiniGame,
}

impl GameMode {
    pub fn score_bucket(&self) -> ScoreBucket {
        match self {
            GameMode::Battle => ScoreBucket::Battle,
            GameMode::MiniGame => ScoreBucket::MiniGame,
            GameMode::Adventure | GameMode::Practice | GameMode::Challenge | GameMode::Single => {
                ScoreBucket::Single
            }
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Single
    }
}
