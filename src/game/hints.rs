use crate::model::{OperationType, Problem};

/// Largest operand still covered by the times tables.
const TIMES_TABLE_MAX: u32 = 9;

/// The ordered hint sequence for a problem. Two or three entries, always the
/// same for the same problem.
pub fn hints(problem: &Problem) -> Vec<String> {
    let (a, b) = (problem.operand1, problem.operand2);
    let mut hints = Vec::with_capacity(3);
    match problem.kind {
        OperationType::Multiplication => {
            hints.push(format!("Add {a} together {b} times!"));
            hints.push(format!("{a} × {b} means {b} groups of {a}."));
            if a <= TIMES_TABLE_MAX && b <= TIMES_TABLE_MAX {
                hints.push(format!("Think of the {a} times table!"));
            }
        }
        OperationType::Division => {
            hints.push(format!("If you put {a} into piles of {b}, how many piles do you get?"));
            hints.push(format!("Think: {b} × ? = {a}"));
            if problem.has_remainder() {
                hints.push(
                    "If it doesn't divide evenly, something is left over: that's the remainder!"
                        .to_string(),
                );
            }
        }
    }
    hints
}

/// How much of a problem's hint sequence has been shown so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintReveal {
    shown: usize,
    hints_used: u32,
}

impl HintReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Reveals one more hint of `hints`; returns it, or `None` once every hint
    /// is already visible (which does not count as a use).
    pub fn reveal_next<'a>(&mut self, hints: &'a [String]) -> Option<&'a str> {
        let hint = hints.get(self.shown)?;
        self.shown += 1;
        self.hints_used += 1;
        Some(hint.as_str())
    }

    pub fn visible<'a>(&self, hints: &'a [String]) -> &'a [String] {
        &hints[..self.shown.min(hints.len())]
    }
}
