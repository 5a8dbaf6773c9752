use chrono::{DateTime, Utc};
use log::info;

use super::session::GameSession;
use crate::model::{
    AchievementId, AchievementMetric, LearningStats, UserProfile, ACHIEVEMENT_COIN_REWARD,
    PERFECT_RUN_LENGTH,
};

/// Length of the unbroken run of correct answers at the end of the session.
fn trailing_correct_run(session: &GameSession) -> u32 {
    session
        .answers()
        .iter()
        .rev()
        .take_while(|a| a.is_correct)
        .take(PERFECT_RUN_LENGTH)
        .count() as u32
}

fn measure(metric: AchievementMetric, stats: &LearningStats, session: Option<&GameSession>) -> u32 {
    match metric {
        AchievementMetric::TotalProblems => stats.total_problems(),
        AchievementMetric::OperationTotal(kind) => stats.operation(kind).tally.total,
        AchievementMetric::DailyStreak => stats.streak.count,
        AchievementMetric::PerfectRun => session.map(trailing_correct_run).unwrap_or(0),
    }
}

/// Recomputes progress for every locked achievement and unlocks those that
/// reached their target, crediting the coin reward once per unlock. Returns
/// the ids unlocked by this call.
pub fn evaluate(
    profile: &mut UserProfile,
    session: Option<&GameSession>,
    now: DateTime<Utc>,
) -> Vec<AchievementId> {
    let stats = &profile.stats;
    let mut unlocked = vec![];
    for achievement in profile.achievements.iter_mut().filter(|a| !a.unlocked) {
        let progress = measure(achievement.id.metric(), stats, session);
        if progress >= achievement.target {
            achievement.unlocked = true;
            achievement.unlocked_at = Some(now);
            achievement.progress = achievement.target;
            unlocked.push(achievement.id);
        } else {
            achievement.progress = achievement.progress.max(progress);
        }
    }

    if !unlocked.is_empty() {
        for id in &unlocked {
            info!(target: "achievements", "Unlocked {:?} ({})", id, id.title());
        }
        profile.add_coins(ACHIEVEMENT_COIN_REWARD * unlocked.len() as u64);
    }
    unlocked
}
