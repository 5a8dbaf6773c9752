use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Problem, ProblemKey};

/// Previously missed problems in insertion order, deduplicated by
/// [`ProblemKey`] rather than by instance id.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct WrongAnswerSet {
    problems: Vec<Problem>,
}

impl WrongAnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when a problem with the same key is already stored.
    pub fn insert(&mut self, problem: Problem) -> bool {
        if self.contains_key(&problem.key()) {
            return false;
        }
        self.problems.push(problem);
        true
    }

    pub fn contains_key(&self, key: &ProblemKey) -> bool {
        self.problems.iter().any(|p| p.key() == *key)
    }

    pub fn remove(&mut self, problem_id: Uuid) -> Option<Problem> {
        let index = self.problems.iter().position(|p| p.id == problem_id)?;
        Some(self.problems.remove(index))
    }

    pub fn get(&self, problem_id: Uuid) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == problem_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}
