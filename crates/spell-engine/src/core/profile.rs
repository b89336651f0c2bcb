use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::api::types::LevelId;

/// Player pictures offered on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Avatar {
    #[default]
    Dragon,
    Cat,
    Robot,
    Fox,
    Owl,
}

impl Avatar {
    pub const ALL: [Avatar; 5] = [
        Avatar::Dragon,
        Avatar::Cat,
        Avatar::Robot,
        Avatar::Fox,
        Avatar::Owl,
    ];

    /// Stable id used in storage and by the UI.
    pub fn id(self) -> &'static str {
        match self {
            Avatar::Dragon => "dragon",
            Avatar::Cat => "cat",
            Avatar::Robot => "robot",
            Avatar::Fox => "fox",
            Avatar::Owl => "owl",
        }
    }

    pub fn from_id(id: &str) -> Option<Avatar> {
        Avatar::ALL.into_iter().find(|a| a.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Avatar::Dragon => "Dragon",
            Avatar::Cat => "Kitty",
            Avatar::Robot => "Robo",
            Avatar::Fox => "Foxy",
            Avatar::Owl => "Owly",
        }
    }

    pub fn picture(self) -> &'static str {
        match self {
            Avatar::Dragon => "🐉",
            Avatar::Cat => "🐱",
            Avatar::Robot => "🤖",
            Avatar::Fox => "🦊",
            Avatar::Owl => "🦉",
        }
    }
}

/// One resolved word, appended when the player moves past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub was_correct: bool,
    pub attempt_count: u32,
    pub level_id: LevelId,
}

/// Durable, cumulative record of one player's progress.
///
/// Every field defaults, so records written by older builds still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub avatar: Avatar,
    pub total_points: u32,
    pub correct_word_count: u32,
    pub highest_unlocked_level: LevelId,
    pub completed_level_ids: BTreeSet<LevelId>,
    /// In the order they were earned. Never shrinks.
    pub earned_badge_ids: Vec<String>,
    pub word_history: Vec<WordRecord>,
    /// Reset to 0 by any incorrect word.
    pub consecutive_correct_streak: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            avatar: Avatar::default(),
            total_points: 0,
            correct_word_count: 0,
            highest_unlocked_level: LevelId(1),
            completed_level_ids: BTreeSet::new(),
            earned_badge_ids: Vec::new(),
            word_history: Vec::new(),
            consecutive_correct_streak: 0,
        }
    }
}

impl Profile {
    /// A fresh profile for a new player.
    pub fn new(name: &str, avatar: Avatar) -> Self {
        Self {
            name: name.to_string(),
            avatar,
            ..Self::default()
        }
    }

    /// Record the outcome of one word. Called exactly once per word, on advance.
    pub fn record_word(&mut self, record: WordRecord) {
        if record.was_correct {
            self.consecutive_correct_streak += 1;
        } else {
            self.consecutive_correct_streak = 0;
        }
        self.word_history.push(record);
    }

    /// Fold a finished level attempt into the cumulative totals.
    ///
    /// Adding the level id is idempotent; `highest_unlocked_level` only rises
    /// and never exceeds `level_count`.
    pub fn apply_level_completion(
        &mut self,
        level_id: LevelId,
        session_points: u32,
        session_correct: u32,
        level_count: u32,
    ) {
        self.total_points += session_points;
        self.correct_word_count += session_correct;
        self.completed_level_ids.insert(level_id);
        let unlocked = level_id.next().0.min(level_count.max(1));
        if unlocked > self.highest_unlocked_level.0 {
            self.highest_unlocked_level = LevelId(unlocked);
        }
    }

    /// Level 1 is always open; any other level opens once its predecessor is done.
    pub fn is_level_unlocked(&self, level_id: LevelId) -> bool {
        level_id.0 == 1
            || (level_id.0 > 1 && self.completed_level_ids.contains(&LevelId(level_id.0 - 1)))
    }

    pub fn has_badge(&self, id: &str) -> bool {
        self.earned_badge_ids.iter().any(|b| b == id)
    }

    /// Add a badge id. Returns false if it was already earned.
    pub fn earn_badge(&mut self, id: &str) -> bool {
        if self.has_badge(id) {
            return false;
        }
        self.earned_badge_ids.push(id.to_string());
        true
    }

    /// Share of history entries answered correctly, as a rounded percentage.
    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(&self.word_history)
    }
}

/// Rounded percentage of correct records; 0 for an empty history.
pub fn accuracy_percent(history: &[WordRecord]) -> u32 {
    if history.is_empty() {
        return 0;
    }
    let correct = history.iter().filter(|r| r.was_correct).count();
    ((correct as f64 / history.len() as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, correct: bool) -> WordRecord {
        WordRecord {
            word: word.to_string(),
            was_correct: correct,
            attempt_count: 1,
            level_id: LevelId(1),
        }
    }

    #[test]
    fn new_profile_defaults() {
        let p = Profile::new("Mia", Avatar::Fox);
        assert_eq!(p.name, "Mia");
        assert_eq!(p.avatar, Avatar::Fox);
        assert_eq!(p.highest_unlocked_level, LevelId(1));
        assert_eq!(p.total_points, 0);
        assert!(p.completed_level_ids.is_empty());
    }

    #[test]
    fn streak_counts_and_resets() {
        let mut p = Profile::default();
        p.record_word(record("cat", true));
        p.record_word(record("sun", true));
        assert_eq!(p.consecutive_correct_streak, 2);
        p.record_word(record("pen", false));
        assert_eq!(p.consecutive_correct_streak, 0);
        assert_eq!(p.word_history.len(), 3);
    }

    #[test]
    fn completion_accumulates_and_unlocks() {
        let mut p = Profile::default();
        p.apply_level_completion(LevelId(1), 40, 6, 4);
        assert_eq!(p.total_points, 40);
        assert_eq!(p.correct_word_count, 6);
        assert!(p.completed_level_ids.contains(&LevelId(1)));
        assert_eq!(p.highest_unlocked_level, LevelId(2));
    }

    #[test]
    fn completion_is_idempotent_for_level_set() {
        let mut p = Profile::default();
        p.apply_level_completion(LevelId(1), 10, 2, 4);
        p.apply_level_completion(LevelId(1), 10, 2, 4);
        assert_eq!(p.completed_level_ids.len(), 1);
        assert_eq!(p.total_points, 20);
    }

    #[test]
    fn unlock_is_clamped_and_never_lowers() {
        let mut p = Profile::default();
        p.apply_level_completion(LevelId(4), 0, 0, 4);
        assert_eq!(p.highest_unlocked_level, LevelId(4));
        p.apply_level_completion(LevelId(1), 0, 0, 4);
        assert_eq!(p.highest_unlocked_level, LevelId(4));
    }

    #[test]
    fn level_unlock_follows_predecessor() {
        let mut p = Profile::default();
        assert!(p.is_level_unlocked(LevelId(1)));
        assert!(!p.is_level_unlocked(LevelId(2)));
        assert!(!p.is_level_unlocked(LevelId(0)));
        p.apply_level_completion(LevelId(1), 0, 0, 4);
        assert!(p.is_level_unlocked(LevelId(2)));
        assert!(!p.is_level_unlocked(LevelId(3)));
    }

    #[test]
    fn badges_are_unique() {
        let mut p = Profile::default();
        assert!(p.earn_badge("word_explorer"));
        assert!(!p.earn_badge("word_explorer"));
        assert_eq!(p.earned_badge_ids, vec!["word_explorer".to_string()]);
    }

    #[test]
    fn accuracy_rounds() {
        let history = vec![record("a", true), record("b", true), record("c", false)];
        assert_eq!(accuracy_percent(&history), 67);
        assert_eq!(accuracy_percent(&[]), 0);
    }

    #[test]
    fn avatar_ids_round_trip() {
        for avatar in Avatar::ALL {
            assert_eq!(Avatar::from_id(avatar.id()), Some(avatar));
        }
        assert_eq!(Avatar::from_id("unicorn"), None);
    }

    #[test]
    fn profile_tolerates_missing_fields() {
        let p: Profile = serde_json::from_str(r#"{ "name": "Ben", "total_points": 12 }"#).unwrap();
        assert_eq!(p.name, "Ben");
        assert_eq!(p.total_points, 12);
        assert_eq!(p.avatar, Avatar::Dragon);
        assert_eq!(p.highest_unlocked_level, LevelId(1));
    }
}
