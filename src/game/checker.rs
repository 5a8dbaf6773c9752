use crate::model::{OperationType, Problem};

/// A division with a nonzero remainder needs both parts right; everything else
/// compares the answer only and ignores any supplied remainder.
pub fn check_answer(problem: &Problem, answer: u32, remainder: Option<u32>) -> bool {
    if problem.kind == OperationType::Division && problem.has_remainder() {
        return answer == problem.answer && remainder == problem.remainder;
    }
    answer == problem.answer
}
