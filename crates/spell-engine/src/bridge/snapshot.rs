//! JSON views handed to the TypeScript presentation layer.
//! Must stay in sync with TypeScript `snapshot.ts`.
//!
//! The UI polls these after each tick; none of them carry behaviour.
//! Field names are the wire format: renaming one is a protocol change.

use serde::Serialize;

use crate::api::types::{LevelId, TokenId};
use crate::assets::catalog::Catalog;
use crate::core::profile::{Profile, WordRecord};
use crate::core::session::{LetterToken, Session};

/// Version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The logged-in player, for the map and header.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView<'a> {
    pub version: u32,
    pub name: &'a str,
    pub avatar: &'static str,
    pub avatar_picture: &'static str,
    pub total_points: u32,
    pub correct_word_count: u32,
    pub highest_unlocked_level: LevelId,
    pub completed_level_ids: Vec<LevelId>,
    pub earned_badge_ids: &'a [String],
    pub consecutive_correct_streak: u32,
    pub accuracy_percent: u32,
    pub word_history: &'a [WordRecord],
}

impl<'a> ProfileView<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            name: &profile.name,
            avatar: profile.avatar.id(),
            avatar_picture: profile.avatar.picture(),
            total_points: profile.total_points,
            correct_word_count: profile.correct_word_count,
            highest_unlocked_level: profile.highest_unlocked_level,
            completed_level_ids: profile.completed_level_ids.iter().copied().collect(),
            earned_badge_ids: &profile.earned_badge_ids,
            consecutive_correct_streak: profile.consecutive_correct_streak,
            accuracy_percent: profile.accuracy_percent(),
            word_history: &profile.word_history,
        }
    }
}

/// One letter tile as drawn on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub id: TokenId,
    pub letter: char,
}

/// The play screen.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView<'a> {
    pub version: u32,
    pub level_id: LevelId,
    pub level_name: &'a str,
    pub word_index: usize,
    pub word_count: usize,
    pub word: &'a str,
    pub picture: &'a str,
    pub hint: &'a str,
    pub letter_pool: Vec<TileView>,
    pub answer_slots: Vec<TileView>,
    pub attempt_count: u32,
    pub session_points: u32,
    pub session_correct_count: u32,
    pub complete: bool,
    pub awaiting_advance: bool,
    pub last_submission_correct: Option<bool>,
    /// True when the shown result is for the final word.
    pub is_last_word: bool,
}

impl<'a> SessionView<'a> {
    pub fn new(session: &'a Session, catalog: &'a Catalog) -> Self {
        let current = session.current_word();
        let tiles = |tokens: &[LetterToken]| {
            tokens
                .iter()
                .map(|t| TileView {
                    id: t.id,
                    letter: t.letter,
                })
                .collect::<Vec<_>>()
        };
        Self {
            version: SNAPSHOT_VERSION,
            level_id: session.level_id(),
            level_name: catalog
                .level(session.level_id())
                .map(|l| l.name.as_str())
                .unwrap_or(""),
            word_index: session.word_index(),
            word_count: session.word_count(),
            word: current.map(|w| w.word.as_str()).unwrap_or(""),
            picture: current.map(|w| w.picture.as_str()).unwrap_or(""),
            hint: current.map(|w| w.hint.as_str()).unwrap_or(""),
            letter_pool: tiles(session.letter_pool()),
            answer_slots: tiles(session.answer_slots()),
            attempt_count: session.attempt_count(),
            session_points: session.session_points(),
            session_correct_count: session.session_correct_count(),
            complete: session.is_complete(),
            awaiting_advance: session.awaiting_advance(),
            last_submission_correct: session.last_submission_correct(),
            is_last_word: session.word_index() + 1 >= session.word_count(),
        }
    }
}

/// One stop on the adventure map.
#[derive(Debug, Clone, Serialize)]
pub struct LevelView<'a> {
    pub id: LevelId,
    pub name: &'a str,
    pub theme: &'a str,
    pub picture: &'a str,
    pub description: &'a str,
    pub word_count: usize,
    pub unlocked: bool,
    pub completed: bool,
    /// The level the player should play next.
    pub current: bool,
}

/// Build the map for a profile.
pub fn level_map<'a>(catalog: &'a Catalog, profile: &Profile) -> Vec<LevelView<'a>> {
    catalog
        .levels
        .iter()
        .map(|level| {
            let completed = profile.completed_level_ids.contains(&level.id);
            LevelView {
                id: level.id,
                name: &level.name,
                theme: &level.theme,
                picture: &level.picture,
                description: &level.description,
                word_count: level.words.len(),
                unlocked: profile.is_level_unlocked(level.id),
                completed,
                current: level.id == profile.highest_unlocked_level && !completed,
            }
        })
        .collect()
}
