use std::ops::RangeInclusive;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::phrasing;
use crate::model::{Difficulty, OperationType, Problem, VisualCategory, VisualHelp};

/// Default share of problems rendered as word problems.
pub const WORD_PROBLEM_RATIO: f64 = 0.3;

/// Smallest quotient a division problem may have.
const MIN_QUOTIENT: u32 = 2;
const DIVISORS: RangeInclusive<u32> = 2..=9;

/// The randomness the generator consumes. Implemented for every [`Rng`]; tests
/// substitute a scripted source to force specific operands.
pub trait RandomSource {
    fn int_in(&mut self, range: RangeInclusive<u32>) -> u32;

    fn chance(&mut self, probability: f64) -> bool;

    fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty set");
        self.int_in(0..=(len as u32 - 1)) as usize
    }
}

impl<R: Rng> RandomSource for R {
    fn int_in(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.random_range(range)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.random_bool(probability.clamp(0.0, 1.0))
    }
}

/// Operand ranges for one `(operation, difficulty)` pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandRanges {
    pub first: RangeInclusive<u32>,
    pub second: RangeInclusive<u32>,
}

fn checked_range(min: u32, max: u32, difficulty: Difficulty) -> RangeInclusive<u32> {
    assert!(
        min <= max,
        "empty operand range {}..={} for {} difficulty",
        min,
        max,
        difficulty
    );
    min..=max
}

/// Multiplication operand ranges. Medium picks one of two shapes per problem,
/// so `shape_two_digit` selects the two-digit by small single-digit variant.
pub fn multiplication_ranges(difficulty: Difficulty, shape_two_digit: bool) -> OperandRanges {
    let (first, second) = match difficulty {
        Difficulty::Easy => ((2, 5), (2, 5)),
        Difficulty::Medium if shape_two_digit => ((10, 20), (2, 5)),
        Difficulty::Medium => ((2, 9), (2, 9)),
        Difficulty::Hard => ((10, 99), (2, 10)),
    };
    OperandRanges {
        first: checked_range(first.0, first.1, difficulty),
        second: checked_range(second.0, second.1, difficulty),
    }
}

/// Quotient range for a given divisor so that `divisor × quotient` stays
/// within the tier's dividend ceiling.
pub fn quotient_range(difficulty: Difficulty, divisor: u32) -> RangeInclusive<u32> {
    checked_range(MIN_QUOTIENT, difficulty.max_dividend() / divisor, difficulty)
}

pub struct ProblemGenerator<S: RandomSource = StdRng> {
    source: S,
    word_problem_ratio: f64,
}

impl ProblemGenerator<StdRng> {
    /// A generator over `StdRng`; pass a seed for reproducible sequences.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        trace!(target: "generator", "Seeding problem generator with {}", seed);
        Self::with_source(StdRng::seed_from_u64(seed))
    }
}

impl<S: RandomSource> ProblemGenerator<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            word_problem_ratio: WORD_PROBLEM_RATIO,
        }
    }

    pub fn with_word_problem_ratio(mut self, ratio: f64) -> Self {
        self.set_word_problem_ratio(ratio);
        self
    }

    pub fn set_word_problem_ratio(&mut self, ratio: f64) {
        self.word_problem_ratio = ratio.clamp(0.0, 1.0);
    }

    pub fn generate(&mut self, kind: OperationType, difficulty: Difficulty) -> Problem {
        let problem = match kind {
            OperationType::Multiplication => self.multiplication(difficulty),
            OperationType::Division => self.division(difficulty),
        };
        debug_assert!(problem.is_consistent());
        trace!(target: "generator", "Generated {:?}: {}", kind, problem.question_text);
        problem
    }

    pub fn generate_many(
        &mut self,
        kind: OperationType,
        difficulty: Difficulty,
        count: usize,
    ) -> Vec<Problem> {
        (0..count).map(|_| self.generate(kind, difficulty)).collect()
    }

    fn multiplication(&mut self, difficulty: Difficulty) -> Problem {
        let shape_two_digit = difficulty == Difficulty::Medium && self.source.chance(0.5);
        let ranges = multiplication_ranges(difficulty, shape_two_digit);
        let operand1 = self.source.int_in(ranges.first);
        let operand2 = self.source.int_in(ranges.second);

        let mut problem = Problem::multiplication(operand1, operand2, difficulty);
        if self.source.chance(self.word_problem_ratio) {
            let index = self.source.index(phrasing::multiplication_story_count());
            problem = problem.with_question_text(phrasing::multiplication_story(
                index, operand1, operand2,
            ));
        }
        let visual_help = self.visual_help(operand1, operand2);
        problem.with_visual_help(visual_help)
    }

    fn division(&mut self, difficulty: Difficulty) -> Problem {
        let divisor = self.source.int_in(DIVISORS);
        let quotient = self.source.int_in(quotient_range(difficulty, divisor));
        let remainder = if self.source.chance(difficulty.remainder_probability()) {
            self.source.int_in(1..=divisor - 1)
        } else {
            0
        };
        let dividend = divisor * quotient + remainder;

        let mut problem = Problem::division(dividend, divisor, difficulty);
        if self.source.chance(self.word_problem_ratio) {
            let has_remainder = remainder > 0;
            let index = self.source.index(phrasing::division_story_count(has_remainder));
            problem = problem.with_question_text(phrasing::division_story(
                index,
                dividend,
                divisor,
                has_remainder,
            ));
        }
        let visual_help = self.visual_help(dividend, divisor);
        problem.with_visual_help(visual_help)
    }

    fn visual_help(&mut self, unit_count: u32, group_count: u32) -> VisualHelp {
        let categories = VisualCategory::all();
        VisualHelp {
            category: categories[self.source.index(categories.len())],
            unit_count,
            group_count,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use std::collections::VecDeque;

    use test_context::test_context;

    use super::*;
    use crate::tests::UsingLogger;

    /// Replays queued integers and coin flips; falls back to the range start
    /// and `false` once exhausted.
    #[derive(Default)]
    pub struct ScriptedSource {
        pub ints: VecDeque<u32>,
        pub coins: VecDeque<bool>,
    }

    impl ScriptedSource {
        pub fn new(ints: &[u32], coins: &[bool]) -> Self {
            Self {
                ints: ints.iter().copied().collect(),
                coins: coins.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn int_in(&mut self, range: RangeInclusive<u32>) -> u32 {
            let value = self.ints.pop_front().unwrap_or(*range.start());
            assert!(range.contains(&value), "{value} outside {range:?}");
            value
        }

        fn chance(&mut self, _probability: f64) -> bool {
            self.coins.pop_front().unwrap_or(false)
        }
    }

    #[test]
    fn test_forced_easy_multiplication() {
        // operand1, operand2, visual category; no word problem
        let source = ScriptedSource::new(&[3, 4, 0], &[false]);
        let problem = ProblemGenerator::with_source(source)
            .generate(OperationType::Multiplication, Difficulty::Easy);
        assert_eq!(problem.operand1, 3);
        assert_eq!(problem.operand2, 4);
        assert_eq!(problem.answer, 12);
        assert_eq!(problem.remainder, None);
        assert_eq!(problem.question_text, "3 × 4 = ?");
        assert_eq!(
            problem.visual_help,
            Some(VisualHelp {
                category: VisualCategory::Blocks,
                unit_count: 3,
                group_count: 4,
            })
        );
    }

    #[test]
    fn test_forced_division_with_remainder() {
        // divisor, quotient, remainder, visual category; remainder coin then word problem coin
        let source = ScriptedSource::new(&[5, 3, 2, 1], &[true, false]);
        let problem = ProblemGenerator::with_source(source)
            .generate(OperationType::Division, Difficulty::Medium);
        assert_eq!(problem.operand1, 17);
        assert_eq!(problem.operand2, 5);
        assert_eq!(problem.answer, 3);
        assert_eq!(problem.remainder, Some(2));
        assert_eq!(problem.visual_help.map(|v| v.unit_count), Some(17));
    }

    #[test]
    fn test_word_problem_uses_operands() {
        // operands, story index, visual category
        let source = ScriptedSource::new(&[4, 5, 0, 2], &[true]);
        let problem = ProblemGenerator::with_source(source)
            .generate(OperationType::Multiplication, Difficulty::Easy);
        assert_eq!(problem.question_text, phrasing::multiplication_story(0, 4, 5));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_generated_problems_hold_invariants(_: &mut UsingLogger) {
        let mut generator = ProblemGenerator::new(Some(7));
        for kind in OperationType::all() {
            for difficulty in Difficulty::all() {
                for problem in generator.generate_many(kind, difficulty, 500) {
                    assert!(problem.is_consistent(), "{problem:?}");
                    assert_eq!(problem.kind, kind);
                    assert_eq!(problem.difficulty, difficulty);
                    assert!(problem.visual_help.is_some());
                    match kind {
                        OperationType::Multiplication => {
                            assert_eq!(problem.answer, problem.operand1 * problem.operand2);
                            assert!(problem.answer <= 990);
                        }
                        OperationType::Division => {
                            let remainder = problem.remainder.unwrap();
                            assert!(remainder < problem.operand2);
                            assert!((2..=9).contains(&problem.operand2));
                            assert_eq!(
                                problem.operand1,
                                problem.operand2 * problem.answer + remainder
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_easy_division_never_has_remainder() {
        let mut generator = ProblemGenerator::new(Some(11));
        let problems = generator.generate_many(OperationType::Division, Difficulty::Easy, 1000);
        assert!(problems.iter().all(|p| p.remainder == Some(0)));
    }

    #[test]
    fn test_harder_division_produces_remainders() {
        let mut generator = ProblemGenerator::new(Some(13));
        for difficulty in [Difficulty::Medium, Difficulty::Hard] {
            let problems = generator.generate_many(OperationType::Division, difficulty, 500);
            assert!(problems.iter().any(|p| p.has_remainder()), "{difficulty}");
        }
    }

    #[test]
    fn test_word_problem_ratio_is_respected() {
        let mut generator = ProblemGenerator::new(Some(3)).with_word_problem_ratio(0.0);
        let problems =
            generator.generate_many(OperationType::Multiplication, Difficulty::Hard, 200);
        assert!(problems.iter().all(|p| p.question_text.contains('×')));

        let mut generator = ProblemGenerator::new(Some(3)).with_word_problem_ratio(1.0);
        let problems =
            generator.generate_many(OperationType::Multiplication, Difficulty::Hard, 200);
        assert!(problems.iter().all(|p| !p.question_text.contains('×')));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = ProblemGenerator::new(Some(99)).generate_many(
            OperationType::Division,
            Difficulty::Hard,
            20,
        );
        let b = ProblemGenerator::new(Some(99)).generate_many(
            OperationType::Division,
            Difficulty::Hard,
            20,
        );
        let keys = |ps: &[Problem]| ps.iter().map(|p| p.key()).collect::<Vec<_>>();
        assert_eq!(keys(&a), keys(&b));
        assert_ne!(a[0].id, b[0].id);
    }

    #[test]
    fn test_generate_many_count() {
        let mut generator = ProblemGenerator::new(None);
        assert!(generator
            .generate_many(OperationType::Multiplication, Difficulty::Easy, 0)
            .is_empty());
        assert_eq!(
            generator
                .generate_many(OperationType::Multiplication, Difficulty::Medium, 10)
                .len(),
            10
        );
    }

    #[test]
    fn test_quotient_range_fits_ceiling() {
        for difficulty in Difficulty::all() {
            for divisor in 2..=9 {
                let range = quotient_range(difficulty, divisor);
                assert!(divisor * range.end() <= difficulty.max_dividend());
            }
        }
    }
}
