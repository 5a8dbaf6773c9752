use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[readonly::make]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAnswer {
    pub problem_id: Uuid,
    pub answer: u32,
    pub remainder: Option<u32>,
    pub is_correct: bool,
    pub time_spent_seconds: f64,
    pub hints_used: u32,
}

impl UserAnswer {
    pub fn new(
        problem_id: Uuid,
        answer: u32,
        remainder: Option<u32>,
        is_correct: bool,
        time_spent_seconds: f64,
        hints_used: u32,
    ) -> Self {
        Self {
            problem_id,
            answer,
            remainder,
            is_correct,
            time_spent_seconds: time_spent_seconds.max(0.0),
            hints_used,
        }
    }

    /// The same submission, counted wrong because it came in after the clock
    /// ran out.
    pub fn out_of_time(self) -> Self {
        Self {
            is_correct: false,
            ..self
        }
    }
}
