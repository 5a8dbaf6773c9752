use std::time::SystemTime;

use log::{info, trace};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::checker::check_answer;
use crate::model::{
    Difficulty, GameMode, OperationType, Problem, TimerState, UserAnswer, PERFECT_RUN_LENGTH,
};

pub const POINTS_PER_CORRECT: u64 = 100;
pub const COINS_PER_CORRECT: u64 = 10;
pub const COINS_PER_STAR: u64 = 50;
pub const EXPERIENCE_PER_CORRECT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot start a session without problems")]
    NoProblems,
    #[error("session is exhausted: all {0} problems have been presented")]
    Exhausted(usize),
    #[error("problem {0} already has an answer")]
    AlreadyAnswered(usize),
    #[error("problem {0} has not been answered yet")]
    Unanswered(usize),
    #[error("answer is for problem {answered} but the current problem is {current}")]
    WrongProblem { answered: Uuid, current: Uuid },
    #[error("session has already ended")]
    Ended,
    #[error("no session in progress")]
    NoSession,
}

/// What a finished session is worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub mode: GameMode,
    pub answered: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub stars: u8,
    pub score: u64,
    pub coins_earned: u64,
    pub experience_earned: u32,
}

/// 3 stars from 90%, 2 from 70%, 1 from 50%; all thresholds inclusive.
pub fn stars_for_accuracy(accuracy: f64) -> u8 {
    if accuracy >= 0.9 {
        3
    } else if accuracy >= 0.7 {
        2
    } else if accuracy >= 0.5 {
        1
    } else {
        0
    }
}

/// One run through a queue of problems: created, answered one problem at a
/// time, then ended explicitly by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSession {
    id: Uuid,
    mode: GameMode,
    kind: OperationType,
    difficulty: Difficulty,
    problems: Vec<Problem>,
    current_index: usize,
    answers: Vec<UserAnswer>,
    timer_state: TimerState,
    score: u64,
    stars: Option<u8>,
}

impl GameSession {
    pub fn new(
        mode: GameMode,
        kind: OperationType,
        difficulty: Difficulty,
        problems: Vec<Problem>,
        now: SystemTime,
    ) -> Result<Self, SessionError> {
        if problems.is_empty() {
            return Err(SessionError::NoProblems);
        }
        let session = Self {
            id: Uuid::new_v4(),
            mode,
            kind,
            difficulty,
            problems,
            current_index: 0,
            answers: vec![],
            timer_state: TimerState::started_at(now),
            score: 0,
            stars: None,
        };
        info!(
            target: "session",
            "Session {} started: {:?} {} {} with {} problems",
            session.id,
            mode,
            kind,
            difficulty,
            session.problems.len()
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn kind(&self) -> OperationType {
        self.kind
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn stars(&self) -> Option<u8> {
        self.stars
    }

    pub fn timer_state(&self) -> &TimerState {
        &self.timer_state
    }

    pub fn is_ended(&self) -> bool {
        self.timer_state.is_ended()
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.problems.get(self.current_index)
    }

    /// Every problem has been presented; the caller may now end the session.
    pub fn is_completable(&self) -> bool {
        self.current_index >= self.problems.len()
    }

    /// The problem on screen is the final one in the queue.
    pub fn is_last_problem(&self) -> bool {
        self.current_index + 1 == self.problems.len()
    }

    pub fn current_answered(&self) -> bool {
        self.answers.len() > self.current_index
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    /// The trailing answers of this session form an unbroken correct run of
    /// [`PERFECT_RUN_LENGTH`].
    pub fn has_perfect_run(&self) -> bool {
        self.answers.len() >= PERFECT_RUN_LENGTH
            && self.answers[self.answers.len() - PERFECT_RUN_LENGTH..]
                .iter()
                .all(|a| a.is_correct)
    }

    fn ensure_open(&self) -> Result<&Problem, SessionError> {
        if self.is_ended() {
            return Err(SessionError::Ended);
        }
        let problem = self
            .current_problem()
            .ok_or(SessionError::Exhausted(self.problems.len()))?;
        if self.current_answered() {
            return Err(SessionError::AlreadyAnswered(self.current_index));
        }
        Ok(problem)
    }

    /// Checks a candidate answer against the current problem and packages it
    /// for [`GameSession::submit_answer`]. When `time_spent_seconds` is `None`
    /// the time since the problem was shown is used.
    pub fn grade(
        &self,
        answer: u32,
        remainder: Option<u32>,
        time_spent_seconds: Option<f64>,
        hints_used: u32,
        now: SystemTime,
    ) -> Result<UserAnswer, SessionError> {
        let problem = self.ensure_open()?;
        let time_spent =
            time_spent_seconds.unwrap_or_else(|| self.timer_state.lap_seconds(now));
        Ok(UserAnswer::new(
            problem.id,
            answer,
            remainder,
            check_answer(problem, answer, remainder),
            time_spent,
            hints_used,
        ))
    }

    /// Appends the answer for the current problem and returns that problem.
    pub fn submit_answer(&mut self, answer: UserAnswer) -> Result<&Problem, SessionError> {
        let problem_id = self.ensure_open()?.id;
        if answer.problem_id != problem_id {
            return Err(SessionError::WrongProblem {
                answered: answer.problem_id,
                current: problem_id,
            });
        }
        if answer.is_correct {
            self.score += POINTS_PER_CORRECT;
        }
        trace!(
            target: "session",
            "Session {} problem {}: correct={} score={}",
            self.id,
            self.current_index,
            answer.is_correct,
            self.score
        );
        self.answers.push(answer);
        Ok(&self.problems[self.current_index])
    }

    pub fn advance(&mut self, now: SystemTime) -> Result<(), SessionError> {
        if self.is_ended() {
            return Err(SessionError::Ended);
        }
        if self.is_completable() {
            return Err(SessionError::Exhausted(self.problems.len()));
        }
        if !self.current_answered() {
            return Err(SessionError::Unanswered(self.current_index));
        }
        self.current_index += 1;
        self.timer_state = self.timer_state.next_problem(now);
        Ok(())
    }

    /// Terminal transition. Rewards cover whatever was answered, so a session
    /// may end early.
    pub fn end(&mut self, now: SystemTime) -> Result<SessionSummary, SessionError> {
        if self.is_ended() {
            return Err(SessionError::Ended);
        }
        let answered = self.answers.len();
        let correct = self.correct_count();
        let accuracy = if answered > 0 {
            correct as f64 / answered as f64
        } else {
            0.0
        };
        let stars = stars_for_accuracy(accuracy);
        self.stars = Some(stars);
        self.timer_state = self.timer_state.ended(now);

        let summary = SessionSummary {
            session_id: self.id,
            mode: self.mode,
            answered,
            correct,
            accuracy,
            stars,
            score: self.score,
            coins_earned: COINS_PER_CORRECT * correct as u64 + COINS_PER_STAR * stars as u64,
            experience_earned: EXPERIENCE_PER_CORRECT * correct as u32,
        };
        info!(target: "session", "Session {} ended: {:?}", self.id, summary);
        Ok(summary)
    }
}
