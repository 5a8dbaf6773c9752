//! Folding answers and finished sessions into a profile.
//!
//! Everything here mutates values the caller owns and reports what changed;
//! persistence is left to whoever observes the returned outcomes.

use chrono::NaiveDate;
use log::{debug, info};

use super::achievements;
use super::session::{GameSession, SessionError, SessionSummary};
use crate::helpers::Clock;
use crate::model::{
    AchievementId, DailyStreak, LearningStats, Problem, ScoreBucket, UserAnswer, UserProfile,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub answer: UserAnswer,
    pub problem: Problem,
    pub added_to_wrong_answers: bool,
    pub streak_changed: bool,
    pub unlocked: Vec<AchievementId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionEnd {
    pub summary: SessionSummary,
    pub leveled_up: bool,
    pub unlocked: Vec<AchievementId>,
}

/// Moves the daily streak to `today`. Only the first answer of a new day
/// changes it; returns whether it changed.
pub fn update_streak(streak: &mut DailyStreak, today: NaiveDate) -> bool {
    if streak.last_played == Some(today) {
        return false;
    }
    let yesterday = today.pred_opt();
    streak.count = match streak.last_played {
        Some(last) if Some(last) == yesterday => streak.count + 1,
        _ => 1,
    };
    streak.last_played = Some(today);
    true
}

/// Counts one answer at the global, per-operation and per-difficulty levels.
pub fn record_answer_stats(
    stats: &mut LearningStats,
    problem: &Problem,
    answer: &UserAnswer,
    today: NaiveDate,
) -> bool {
    let time = answer.time_spent_seconds;
    stats.overall.record(answer.is_correct, time);
    stats.total_time += time;

    let operation = stats.operation_mut(problem.kind);
    operation.tally.record(answer.is_correct, time);
    operation
        .by_difficulty
        .get_mut(problem.difficulty)
        .record(answer.is_correct, time);

    update_streak(&mut stats.streak, today)
}

/// Submits an answer to the session and applies its side effects to the
/// profile: statistics, streak, wrong-answer note, achievements.
pub fn submit_answer(
    profile: &mut UserProfile,
    session: &mut GameSession,
    answer: UserAnswer,
    clock: &dyn Clock,
) -> Result<AnswerOutcome, SessionError> {
    let problem = session.submit_answer(answer.clone())?.clone();

    let streak_changed = record_answer_stats(&mut profile.stats, &problem, &answer, clock.today());
    if streak_changed {
        debug!(target: "progress", "Daily streak now {}", profile.stats.streak.count);
    }
    let added_to_wrong_answers =
        !answer.is_correct && profile.wrong_answers.insert(problem.clone());
    profile.touch();

    let unlocked = achievements::evaluate(profile, Some(&*session), clock.now());
    Ok(AnswerOutcome {
        answer,
        problem,
        added_to_wrong_answers,
        streak_changed,
        unlocked,
    })
}

/// Ends the session and credits coins, experience and mode score.
pub fn end_session(
    profile: &mut UserProfile,
    session: &mut GameSession,
    clock: &dyn Clock,
) -> Result<SessionEnd, SessionError> {
    let summary = session.end(clock.now().into())?;

    profile.add_coins(summary.coins_earned);
    let leveled_up = profile.character.gain_experience(summary.experience_earned);
    if leveled_up {
        info!(target: "progress", "Reached level {}", profile.character.level);
    }
    let scores = &mut profile.stats.mode_scores;
    match summary.mode.score_bucket() {
        ScoreBucket::Single => scores.single += summary.score,
        ScoreBucket::Battle => scores.battle += summary.score,
        ScoreBucket::MiniGame => scores.mini_game_best = scores.mini_game_best.max(summary.score),
    }

    let unlocked = achievements::evaluate(profile, Some(&*session), clock.now());
    Ok(SessionEnd {
        summary,
        leveled_up,
        unlocked,
    })
}

/// Keeps the best mini-game run; returns `true` for a new best.
pub fn record_mini_game_score(profile: &mut UserProfile, score: u64) -> bool {
    let best = &mut profile.stats.mode_scores.mini_game_best;
    if score <= *best {
        return false;
    }
    *best = score;
    profile.touch();
    true
}

/// Adds a finished battle's score to the cumulative battle total.
pub fn record_battle_score(profile: &mut UserProfile, score: u64) {
    profile.stats.mode_scores.battle += score;
    profile.touch();
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use chrono::Days;
    use test_context::test_context;

    use super::*;
    use crate::helpers::FixedClock;
    use crate::model::{Difficulty, GameMode, OperationType, ACHIEVEMENT_COIN_REWARD};
    use crate::tests::UsingLogger;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session_with(problems: Vec<Problem>, mode: GameMode) -> GameSession {
        let kind = problems[0].kind;
        let difficulty = problems[0].difficulty;
        GameSession::new(mode, kind, difficulty, problems, SystemTime::now()).unwrap()
    }

    fn answer(
        profile: &mut UserProfile,
        session: &mut GameSession,
        correct: bool,
        seconds: f64,
        clock: &FixedClock,
    ) -> AnswerOutcome {
        let problem = session.current_problem().unwrap();
        let given = if correct { problem.answer } else { problem.answer + 1 };
        let graded = session
            .grade(given, problem.remainder, Some(seconds), 0, SystemTime::now())
            .unwrap();
        let outcome = submit_answer(profile, session, graded, clock).unwrap();
        session.advance(SystemTime::now()).unwrap();
        outcome
    }

    #[test]
    fn test_streak_transitions() {
        let mut streak = DailyStreak::default();
        assert!(update_streak(&mut streak, day(2026, 3, 1)));
        assert_eq!(streak.count, 1);

        assert!(!update_streak(&mut streak, day(2026, 3, 1)));
        assert_eq!(streak.count, 1);

        assert!(update_streak(&mut streak, day(2026, 3, 2)));
        assert_eq!(streak.count, 2);

        assert!(update_streak(&mut streak, day(2026, 3, 5)));
        assert_eq!(streak.count, 1);
        assert_eq!(streak.last_played, Some(day(2026, 3, 5)));
    }

    #[test]
    fn test_streak_counts_once_per_day() {
        let today = day(2026, 5, 10);
        let mut profile = UserProfile::new("Jo");
        profile.stats.streak = DailyStreak {
            count: 4,
            last_played: today.checked_sub_days(Days::new(1)),
        };
        let clock = FixedClock::on(today);
        let problems = (0..5)
            .map(|_| Problem::multiplication(3, 3, Difficulty::Easy))
            .collect();
        let mut session = session_with(problems, GameMode::Practice);

        let changes: Vec<bool> = (0..5)
            .map(|_| answer(&mut profile, &mut session, true, 2.0, &clock).streak_changed)
            .collect();
        assert_eq!(changes, vec![true, false, false, false, false]);
        assert_eq!(profile.stats.streak.count, 5);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_second_session_same_day_keeps_streak(_: &mut UsingLogger) {
        let clock = FixedClock::on(day(2026, 6, 1));
        let mut profile = UserProfile::new("Jo");
        let problem = || vec![Problem::multiplication(4, 3, Difficulty::Easy)];

        let mut first = session_with(problem(), GameMode::Practice);
        assert!(answer(&mut profile, &mut first, true, 2.0, &clock).streak_changed);
        end_session(&mut profile, &mut first, &clock).unwrap();
        assert_eq!(profile.stats.streak.count, 1);

        let mut second = session_with(problem(), GameMode::Practice);
        assert!(!answer(&mut profile, &mut second, false, 2.0, &clock).streak_changed);
        end_session(&mut profile, &mut second, &clock).unwrap();
        assert_eq!(profile.stats.streak.count, 1);
        assert_eq!(profile.stats.streak.last_played, Some(day(2026, 6, 1)));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_stats_at_every_level(_: &mut UsingLogger) {
        let clock = FixedClock::on(day(2026, 1, 15));
        let mut profile = UserProfile::new("Jo");
        let problems = vec![
            Problem::division(17, 5, Difficulty::Medium),
            Problem::division(20, 4, Difficulty::Medium),
            Problem::division(9, 3, Difficulty::Medium),
        ];
        let mut session = session_with(problems, GameMode::Single);
        answer(&mut profile, &mut session, true, 3.0, &clock);
        answer(&mut profile, &mut session, false, 6.0, &clock);
        answer(&mut profile, &mut session, true, 9.0, &clock);

        let stats = &profile.stats;
        for tally in [
            stats.overall,
            stats.division.tally,
            *stats.division.by_difficulty.get(Difficulty::Medium),
        ] {
            assert_eq!(tally.total, 3);
            assert_eq!(tally.correct, 2);
            assert!(tally.correct <= tally.total);
            assert!((tally.average_time - 6.0).abs() < 1e-9);
        }
        assert_eq!(stats.multiplication.tally.total, 0);
        assert_eq!(stats.division.by_difficulty.get(Difficulty::Easy).total, 0);
        assert!((stats.total_time - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_answers_are_noted_once() {
        let clock = FixedClock::on(day(2026, 2, 2));
        let mut profile = UserProfile::new("Jo");
        let problems = vec![
            Problem::multiplication(6, 7, Difficulty::Medium),
            Problem::multiplication(6, 7, Difficulty::Medium),
            Problem::multiplication(8, 7, Difficulty::Medium),
        ];
        let mut session = session_with(problems, GameMode::Practice);

        assert!(answer(&mut profile, &mut session, false, 1.0, &clock).added_to_wrong_answers);
        assert!(!answer(&mut profile, &mut session, false, 1.0, &clock).added_to_wrong_answers);
        assert!(!answer(&mut profile, &mut session, true, 1.0, &clock).added_to_wrong_answers);
        assert_eq!(profile.wrong_answers.len(), 1);
    }

    #[test]
    fn test_correct_answer_does_not_prune_wrong_answers() {
        let clock = FixedClock::on(day(2026, 2, 2));
        let mut profile = UserProfile::new("Jo");
        let problems = vec![
            Problem::multiplication(6, 7, Difficulty::Medium),
            Problem::multiplication(6, 7, Difficulty::Medium),
        ];
        let mut session = session_with(problems, GameMode::Practice);
        answer(&mut profile, &mut session, false, 1.0, &clock);
        answer(&mut profile, &mut session, true, 1.0, &clock);
        assert_eq!(profile.wrong_answers.len(), 1);
    }

    #[test]
    fn test_ten_correct_session_rewards() {
        let clock = FixedClock::on(day(2026, 4, 1));
        let mut profile = UserProfile::new("Jo");
        let problems = (0..10)
            .map(|i| Problem::multiplication(2 + i, 3, Difficulty::Easy))
            .collect();
        let mut session = session_with(problems, GameMode::Single);

        let mut perfect_unlocks = 0;
        for _ in 0..10 {
            let outcome = answer(&mut profile, &mut session, true, 2.0, &clock);
            perfect_unlocks += outcome
                .unlocked
                .iter()
                .filter(|id| **id == AchievementId::PerfectScore)
                .count();
        }
        assert_eq!(perfect_unlocks, 1);
        // first problem, ten problems, perfect score
        assert_eq!(profile.coins, 3 * ACHIEVEMENT_COIN_REWARD);

        let end = end_session(&mut profile, &mut session, &clock).unwrap();
        assert_eq!(end.summary.stars, 3);
        assert_eq!(end.summary.coins_earned, 10 * 10 + 50 * 3);
        assert!(end.unlocked.is_empty());
        assert_eq!(profile.coins, 3 * ACHIEVEMENT_COIN_REWARD + 250);
        assert_eq!(profile.character.experience, 50);
        assert_eq!(profile.stats.mode_scores.single, 1000);
        assert_eq!(profile.stats.mode_scores.battle, 0);
        assert!(!end.leveled_up);

        assert_eq!(
            end_session(&mut profile, &mut session, &clock),
            Err(SessionError::Ended)
        );
    }

    #[test]
    fn test_battle_session_feeds_battle_score() {
        let clock = FixedClock::on(day(2026, 4, 1));
        let mut profile = UserProfile::new("Jo");
        let problems = vec![Problem::multiplication(4, 4, Difficulty::Easy)];
        let mut session = session_with(problems, GameMode::Battle);
        answer(&mut profile, &mut session, true, 1.0, &clock);
        end_session(&mut profile, &mut session, &clock).unwrap();
        assert_eq!(profile.stats.mode_scores.battle, 100);
        assert_eq!(profile.stats.mode_scores.single, 0);
    }

    #[test]
    fn test_mini_game_keeps_best() {
        let mut profile = UserProfile::new("Jo");
        assert!(record_mini_game_score(&mut profile, 700));
        assert!(!record_mini_game_score(&mut profile, 300));
        assert!(!record_mini_game_score(&mut profile, 700));
        assert_eq!(profile.stats.mode_scores.mini_game_best, 700);
    }

    #[test]
    fn test_operation_mix_keeps_invariants() {
        let clock = FixedClock::on(day(2026, 6, 6));
        let mut profile = UserProfile::new("Jo");
        let mut generator = crate::game::generator::ProblemGenerator::new(Some(1));
        let mut times = vec![];
        for (i, kind) in [OperationType::Multiplication, OperationType::Division]
            .into_iter()
            .enumerate()
        {
            let problems = generator.generate_many(kind, Difficulty::Hard, 8);
            let mut session = session_with(problems, GameMode::Practice);
            for j in 0..8 {
                let seconds = (i * 8 + j) as f64;
                times.push(seconds);
                answer(&mut profile, &mut session, j % 3 != 0, seconds, &clock);
            }
        }
        let mean = times.iter().sum::<f64>() / times.len() as f64;
        assert!((profile.stats.overall.average_time - mean).abs() < 1e-9);
        assert_eq!(profile.stats.overall.total, 16);
        assert_eq!(
            profile.stats.multiplication.tally.total + profile.stats.division.tally.total,
            16
        );
        assert!(profile.stats.overall.correct <= profile.stats.overall.total);
    }
}
