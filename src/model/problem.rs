use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Difficulty, OperationType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VisualCategory {
    Blocks,
    Fruits,
    Animals,
}

impl VisualCategory {
    pub fn all() -> [VisualCategory; 3] {
        [
            VisualCategory::Blocks,
            VisualCategory::Fruits,
            VisualCategory::Animals,
        ]
    }
}

/// What an external renderer needs to draw the problem as objects: `group_count`
/// groups of `unit_count` for multiplication, `unit_count` objects split by
/// `group_count` for division.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisualHelp {
    pub category: VisualCategory,
    pub unit_count: u32,
    pub group_count: u32,
}

/// Logical identity of a problem, independent of the generated instance id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemKey {
    pub operand1: u32,
    pub operand2: u32,
    pub kind: OperationType,
}

/// A single arithmetic fact. Values can only be built through the
/// constructors below, which keep `answer`/`remainder` consistent with the
/// operands.
#[readonly::make]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Problem {
    pub id: Uuid,
    pub kind: OperationType,
    pub operand1: u32,
    pub operand2: u32,
    pub answer: u32,
    /// Always `Some` for division (possibly zero), `None` for multiplication.
    pub remainder: Option<u32>,
    pub difficulty: Difficulty,
    pub question_text: String,
    pub visual_help: Option<VisualHelp>,
}

impl Problem {
    pub fn multiplication(operand1: u32, operand2: u32, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: OperationType::Multiplication,
            operand1,
            operand2,
            answer: operand1 * operand2,
            remainder: None,
            difficulty,
            question_text: format!("{operand1} × {operand2} = ?"),
            visual_help: None,
        }
    }

    /// Builds `dividend ÷ divisor`; quotient and remainder are derived.
    pub fn division(dividend: u32, divisor: u32, difficulty: Difficulty) -> Self {
        assert!(divisor > 0, "divisor must be positive");
        let answer = dividend / divisor;
        let remainder = dividend % divisor;
        let question_text = if remainder == 0 {
            format!("{dividend} ÷ {divisor} = ?")
        } else {
            format!("{dividend} ÷ {divisor} = ? (find the quotient and the remainder)")
        };
        Self {
            id: Uuid::new_v4(),
            kind: OperationType::Division,
            operand1: dividend,
            operand2: divisor,
            answer,
            remainder: Some(remainder),
            difficulty,
            question_text,
            visual_help: None,
        }
    }

    pub fn with_question_text(mut self, question_text: String) -> Self {
        self.question_text = question_text;
        self
    }

    pub fn with_visual_help(mut self, visual_help: VisualHelp) -> Self {
        self.visual_help = Some(visual_help);
        self
    }

    pub fn key(&self) -> ProblemKey {
        ProblemKey {
            operand1: self.operand1,
            operand2: self.operand2,
            kind: self.kind,
        }
    }

    pub fn remainder_value(&self) -> u32 {
        self.remainder.unwrap_or(0)
    }

    pub fn has_remainder(&self) -> bool {
        self.remainder_value() > 0
    }

    pub fn symbolic(&self) -> String {
        format!("{} {} {}", self.operand1, self.kind.symbol(), self.operand2)
    }

    /// Checks the arithmetic relationship between operands, answer and remainder.
    pub fn is_consistent(&self) -> bool {
        match self.kind {
            OperationType::Multiplication => {
                self.remainder.is_none() && self.answer == self.operand1 * self.operand2
            }
            OperationType::Division => {
                let remainder = self.remainder_value();
                self.operand2 > 0
                    && remainder < self.operand2
                    && self.operand1 == self.operand2 * self.answer + remainder
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_derives_quotient_and_remainder() {
        let problem = Problem::division(17, 5, Difficulty::Medium);
        assert_eq!(problem.answer, 3);
        assert_eq!(problem.remainder, Some(2));
        assert!(problem.has_remainder());
        assert!(problem.is_consistent());
        assert!(problem.question_text.contains("remainder"));
    }

    #[test]
    fn test_exact_division_uses_plain_question() {
        let problem = Problem::division(42, 6, Difficulty::Easy);
        assert_eq!(problem.answer, 7);
        assert_eq!(problem.remainder, Some(0));
        assert_eq!(problem.question_text, "42 ÷ 6 = ?");
    }

    #[test]
    fn test_key_ignores_instance_id() {
        let a = Problem::multiplication(3, 4, Difficulty::Easy);
        let b = Problem::multiplication(3, 4, Difficulty::Hard);
        assert_ne!(a.id, b.id);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), Problem::multiplication(4, 3, Difficulty::Easy).key());
    }

    #[test]
    #[should_panic(expected = "divisor must be positive")]
    fn test_zero_divisor_is_rejected() {
        Problem::division(10, 0, Difficulty::Easy);
    }

    #[test]
    fn test_serde_keeps_invariants() {
        let problem = Problem::division(29, 4, Difficulty::Hard);
        let json = serde_json::to_string(&problem).unwrap();
        let restored: Problem = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, problem);
        assert!(restored.is_consistent());
    }
}
