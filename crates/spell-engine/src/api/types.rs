use serde::{Deserialize, Serialize};

/// Identifier of a level in the catalog (1-based, contiguous).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub u32);

impl LevelId {
    /// The next level in map order.
    pub fn next(self) -> LevelId {
        LevelId(self.0 + 1)
    }
}

/// Unique tag carried by one letter tile of the current word.
/// Tags are the letter's position in the word, so repeated letters stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u32);

/// A request for the audio collaborator to read `text` aloud.
/// Fire-and-forget: nothing in the engine waits on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechRequest {
    pub text: String,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A game event communicated from Rust to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// An answer was graded; the result stays on screen until `advance`.
    WordGraded {
        correct: bool,
        points: u32,
        attempts: u32,
    },
    /// The next word of the level is now current.
    WordAdvanced { word_index: usize },
    /// The last word was resolved and the profile has been updated.
    LevelCompleted {
        level_id: LevelId,
        session_points: u32,
        session_correct: u32,
        total_words: usize,
        stars: u8,
        new_badges: Vec<String>,
    },
}
