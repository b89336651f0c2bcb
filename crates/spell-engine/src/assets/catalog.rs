use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::LevelId;

/// Embed the shipped word and badge content at compile time.
const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/catalog.json");

/// Static game content: the level map and the badge table.
/// Loaded from a JSON document and validated once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Levels in map order. Ids run 1..=N without gaps.
    pub levels: Vec<Level>,
    /// Badge definitions, evaluated in this order.
    #[serde(default)]
    pub badges: Vec<BadgeDefinition>,
}

/// One word to spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    /// Lowercase ASCII letters.
    pub word: String,
    /// Opaque picture reference shown next to the tiles (an emoji in the shipped content).
    pub picture: String,
    /// Clue revealed on request.
    pub hint: String,
}

impl WordItem {
    pub fn new(word: &str, picture: &str, hint: &str) -> Self {
        Self {
            word: word.to_string(),
            picture: picture.to_string(),
            hint: hint.to_string(),
        }
    }
}

/// A themed group of words of similar difficulty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub description: String,
    pub words: Vec<WordItem>,
    /// Shortest word length in this level (display only).
    #[serde(default)]
    pub min_letters: u32,
    /// Base reward for a correct answer.
    #[serde(default = "default_points_per_word")]
    pub points_per_word: u32,
}

/// A permanent achievement unlocked by a rule over the cumulative profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub description: String,
    pub rule: BadgeRule,
}

/// Unlock predicate of a badge, described as data.
///
/// JSON forms: `{"levels_completed": 1}`, `{"correct_words": 10}`,
/// `{"total_points": 100}`, `{"correct_streak": 3}`, `"all_levels_completed"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRule {
    /// At least this many distinct levels completed.
    LevelsCompleted(u32),
    /// At least this many words spelled correctly, across all sessions.
    CorrectWords(u32),
    /// At least this many points, across all sessions.
    TotalPoints(u32),
    /// Running streak of correct words at the moment a level completes.
    CorrectStreak(u32),
    /// Every level in the catalog completed.
    AllLevelsCompleted,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog has no levels")]
    NoLevels,
    #[error("level ids must run 1..=N in order; position {position} holds id {found}")]
    NonContiguousLevel { position: usize, found: u32 },
    #[error("level {0} has no words")]
    EmptyLevel(u32),
    #[error("word {word:?} in level {level} must be lowercase ASCII letters")]
    InvalidWord { level: u32, word: String },
    #[error("badge id {0:?} appears more than once")]
    DuplicateBadge(String),
}

fn default_points_per_word() -> u32 {
    5
}

impl Catalog {
    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The four-level, five-badge content shipped with the game.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    /// Check the structural invariants the session engine relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.levels.is_empty() {
            return Err(CatalogError::NoLevels);
        }
        for (position, level) in self.levels.iter().enumerate() {
            if level.id.0 as usize != position + 1 {
                return Err(CatalogError::NonContiguousLevel {
                    position,
                    found: level.id.0,
                });
            }
            if level.words.is_empty() {
                return Err(CatalogError::EmptyLevel(level.id.0));
            }
            for item in &level.words {
                let valid = !item.word.is_empty()
                    && item.word.bytes().all(|b| b.is_ascii_lowercase());
                if !valid {
                    return Err(CatalogError::InvalidWord {
                        level: level.id.0,
                        word: item.word.clone(),
                    });
                }
            }
        }
        for (i, badge) in self.badges.iter().enumerate() {
            if self.badges[..i].iter().any(|b| b.id == badge.id) {
                return Err(CatalogError::DuplicateBadge(badge.id.clone()));
            }
        }
        Ok(())
    }

    /// Look up a level by id. Returns None if not in the catalog.
    pub fn level(&self, id: LevelId) -> Option<&Level> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.levels.get(index)
    }

    /// Number of levels on the map.
    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }
}
