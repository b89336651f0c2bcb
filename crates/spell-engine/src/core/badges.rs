use crate::assets::catalog::{BadgeDefinition, BadgeRule};
use crate::core::profile::Profile;

impl BadgeRule {
    /// Test the rule against an already-updated profile.
    pub fn is_met(&self, profile: &Profile, level_count: u32) -> bool {
        match *self {
            BadgeRule::LevelsCompleted(n) => profile.completed_level_ids.len() as u32 >= n,
            BadgeRule::CorrectWords(n) => profile.correct_word_count >= n,
            BadgeRule::TotalPoints(n) => profile.total_points >= n,
            BadgeRule::CorrectStreak(n) => profile.consecutive_correct_streak >= n,
            BadgeRule::AllLevelsCompleted => {
                level_count > 0
                    && (1..=level_count).all(|id| {
                        profile.completed_level_ids.iter().any(|l| l.0 == id)
                    })
            }
        }
    }
}

/// Award every badge whose rule now holds and that the profile lacks.
///
/// Runs once per level completion, after the profile totals are updated.
/// Returns the newly earned ids in catalog order.
pub fn evaluate(profile: &mut Profile, badges: &[BadgeDefinition], level_count: u32) -> Vec<String> {
    let mut earned = Vec::new();
    for badge in badges {
        if profile.has_badge(&badge.id) {
            continue;
        }
        if badge.rule.is_met(profile, level_count) {
            profile.earn_badge(&badge.id);
            earned.push(badge.id.clone());
        }
    }
    if !earned.is_empty() {
        log::info!("{} earned badges: {:?}", profile.name, earned);
    }
    earned
}
