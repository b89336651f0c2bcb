//! One playthrough of one level: the current word, its letter tiles, the
//! player's answer, grading and advancement.

use serde::{Deserialize, Serialize};

use crate::api::types::{LevelId, TokenId};
use crate::assets::catalog::{Catalog, Level, WordItem};
use crate::core::badges;
use crate::core::profile::{Profile, WordRecord};
use crate::core::random::{shuffle, RandomSource};

/// One selectable occurrence of a letter in the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterToken {
    pub letter: char,
    pub id: TokenId,
}

/// Point values applied when an answer is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoring {
    /// Reward for any correct answer.
    pub base: u32,
    /// Extra reward when the very first try at a word is correct.
    pub first_try_bonus: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            base: 5,
            first_try_bonus: 2,
        }
    }
}

/// Result of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub correct: bool,
    pub points: u32,
    /// Attempts at this word including this one.
    pub attempts: u32,
}

/// What `advance` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The next word is now current.
    NextWord { word_index: usize },
    /// The level is finished and the profile updated.
    LevelComplete(LevelSummary),
}

/// Figures shown on the level-complete screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub level_id: LevelId,
    pub session_points: u32,
    pub session_correct: u32,
    pub total_words: usize,
    pub accuracy_percent: u32,
    pub stars: u8,
    pub new_badges: Vec<String>,
}

/// Transient state of the active level attempt.
///
/// The tiles of the current word are always split between `letter_pool` and
/// `answer_slots`, never duplicated and never lost.
#[derive(Debug, Clone)]
pub struct Session {
    level_id: LevelId,
    scoring: Scoring,
    word_order: Vec<WordItem>,
    word_index: usize,
    letter_pool: Vec<LetterToken>,
    answer_slots: Vec<LetterToken>,
    attempt_count: u32,
    session_points: u32,
    session_correct_count: u32,
    complete: bool,
    awaiting_advance: bool,
    last_submission_correct: Option<bool>,
}

impl Session {
    /// Begin a level: shuffle its words, then the first word's tiles.
    pub fn start(level: &Level, first_try_bonus: u32, rng: &mut dyn RandomSource) -> Self {
        let mut words = level.words.clone();
        shuffle(&mut words, rng);
        let scoring = Scoring {
            base: level.points_per_word,
            first_try_bonus,
        };
        Self::with_order(level.id, scoring, words, 0, rng)
            .unwrap_or_else(|| Self::empty(level.id, scoring))
    }

    /// Rebuild a session from a saved word order, positioned at `word_index`.
    /// Returns None when the order is empty or the index is past the end.
    pub fn resume(
        level: &Level,
        first_try_bonus: u32,
        words: Vec<WordItem>,
        word_index: usize,
        rng: &mut dyn RandomSource,
    ) -> Option<Self> {
        let scoring = Scoring {
            base: level.points_per_word,
            first_try_bonus,
        };
        Self::with_order(level.id, scoring, words, word_index, rng)
    }

    fn with_order(
        level_id: LevelId,
        scoring: Scoring,
        word_order: Vec<WordItem>,
        word_index: usize,
        rng: &mut dyn RandomSource,
    ) -> Option<Self> {
        let word = word_order.get(word_index)?;
        let letter_pool = shuffled_tokens(&word.word, rng);
        Some(Self {
            letter_pool,
            word_order,
            word_index,
            ..Self::empty(level_id, scoring)
        })
    }

    fn empty(level_id: LevelId, scoring: Scoring) -> Self {
        Self {
            level_id,
            scoring,
            word_order: Vec::new(),
            word_index: 0,
            letter_pool: Vec::new(),
            answer_slots: Vec::new(),
            attempt_count: 0,
            session_points: 0,
            session_correct_count: 0,
            complete: false,
            awaiting_advance: false,
            last_submission_correct: None,
        }
    }

    // ---- Read access ----

    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    /// The per-session word order (persisted so a reload can resume it).
    pub fn word_order(&self) -> &[WordItem] {
        &self.word_order
    }

    pub fn word_count(&self) -> usize {
        self.word_order.len()
    }

    pub fn current_word(&self) -> Option<&WordItem> {
        self.word_order.get(self.word_index)
    }

    pub fn letter_pool(&self) -> &[LetterToken] {
        &self.letter_pool
    }

    pub fn answer_slots(&self) -> &[LetterToken] {
        &self.answer_slots
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn session_points(&self) -> u32 {
        self.session_points
    }

    pub fn session_correct_count(&self) -> u32 {
        self.session_correct_count
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn awaiting_advance(&self) -> bool {
        self.awaiting_advance
    }

    pub fn last_submission_correct(&self) -> Option<bool> {
        self.last_submission_correct
    }

    /// The answer as typed so far, tags stripped.
    pub fn answer_text(&self) -> String {
        self.answer_slots.iter().map(|t| t.letter).collect()
    }

    fn accepts_input(&self) -> bool {
        !self.complete && !self.awaiting_advance
    }

    // ---- Operations ----

    /// Move a tile from the pool to the end of the answer.
    /// Returns false (and changes nothing) while a result is shown or if the tile is not in the pool.
    pub fn select_letter(&mut self, token: TokenId) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match self.letter_pool.iter().position(|t| t.id == token) {
            Some(idx) => {
                let tile = self.letter_pool.remove(idx);
                self.answer_slots.push(tile);
                true
            }
            None => false,
        }
    }

    /// Move a tile from the answer back to the end of the pool.
    pub fn deselect_letter(&mut self, token: TokenId) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match self.answer_slots.iter().position(|t| t.id == token) {
            Some(idx) => {
                let tile = self.answer_slots.remove(idx);
                self.letter_pool.push(tile);
                true
            }
            None => false,
        }
    }

    /// Grade the current answer. Does not touch the profile; that happens on advance.
    pub fn submit_answer(&mut self) -> Option<Submission> {
        if !self.accepts_input() {
            return None;
        }
        let target = self.current_word()?.word.to_lowercase();
        let correct = self.answer_text().to_lowercase() == target;
        let points = if correct {
            let bonus = if self.attempt_count == 0 {
                self.scoring.first_try_bonus
            } else {
                0
            };
            self.scoring.base + bonus
        } else {
            0
        };

        self.attempt_count += 1;
        self.last_submission_correct = Some(correct);
        self.session_points += points;
        if correct {
            self.session_correct_count += 1;
        }
        self.awaiting_advance = true;

        Some(Submission {
            correct,
            points,
            attempts: self.attempt_count,
        })
    }

    /// Dismiss a wrong result and let the player try the same word again.
    ///
    /// The answer tiles return to the pool; the attempt counter is kept, so a
    /// later correct answer earns the base reward without the first-try bonus.
    /// Returns false unless an incorrect result is currently shown.
    pub fn retry_word(&mut self) -> bool {
        if self.complete || !self.awaiting_advance || self.last_submission_correct != Some(false) {
            return false;
        }
        self.letter_pool.append(&mut self.answer_slots);
        self.awaiting_advance = false;
        self.last_submission_correct = None;
        true
    }

    /// Commit the shown result to the profile and move on.
    ///
    /// Exactly one history entry is written per word. After the last word the
    /// level-completion totals and badge evaluation are applied and the
    /// session becomes terminal.
    pub fn advance(
        &mut self,
        profile: &mut Profile,
        catalog: &Catalog,
        rng: &mut dyn RandomSource,
    ) -> Option<Advance> {
        if !self.awaiting_advance || self.complete {
            return None;
        }
        let word = self.current_word()?.word.clone();
        profile.record_word(WordRecord {
            word,
            was_correct: self.last_submission_correct.unwrap_or(false),
            attempt_count: self.attempt_count,
            level_id: self.level_id,
        });

        let next_index = self.word_index + 1;
        if let Some(next) = self.word_order.get(next_index) {
            self.letter_pool = shuffled_tokens(&next.word, rng);
            self.word_index = next_index;
            self.answer_slots.clear();
            self.attempt_count = 0;
            self.awaiting_advance = false;
            self.last_submission_correct = None;
            return Some(Advance::NextWord {
                word_index: next_index,
            });
        }

        self.complete = true;
        self.awaiting_advance = false;
        profile.apply_level_completion(
            self.level_id,
            self.session_points,
            self.session_correct_count,
            catalog.level_count(),
        );
        let new_badges = badges::evaluate(profile, &catalog.badges, catalog.level_count());

        let total_words = self.word_order.len();
        let accuracy = if total_words == 0 {
            0
        } else {
            ((self.session_correct_count as f64 / total_words as f64) * 100.0).round() as u32
        };
        Some(Advance::LevelComplete(LevelSummary {
            level_id: self.level_id,
            session_points: self.session_points,
            session_correct: self.session_correct_count,
            total_words,
            accuracy_percent: accuracy,
            stars: stars_for_accuracy(accuracy),
            new_badges,
        }))
    }
}

/// Split a word into tagged tiles and shuffle them.
fn shuffled_tokens(word: &str, rng: &mut dyn RandomSource) -> Vec<LetterToken> {
    let mut tokens: Vec<LetterToken> = word
        .chars()
        .enumerate()
        .map(|(i, letter)| LetterToken {
            letter,
            id: TokenId(i as u32),
        })
        .collect();
    shuffle(&mut tokens, rng);
    tokens
}

/// Star rating for the level-complete screen.
pub fn stars_for_accuracy(accuracy_percent: u32) -> u8 {
    if accuracy_percent >= 80 {
        3
    } else if accuracy_percent >= 50 {
        2
    } else {
        1
    }
}
