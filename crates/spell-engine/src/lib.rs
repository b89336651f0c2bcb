pub mod api;
pub mod assets;
pub mod bridge;
pub mod core;
pub mod input;
pub mod report;
pub mod storage;

// Re-export key types at crate root for convenience
pub use api::game::{GameConfig, GameContent, LoginError, SpellingGame};
pub use api::types::{GameEvent, LevelId, SpeechRequest, TokenId};
pub use assets::catalog::{BadgeDefinition, BadgeRule, Catalog, CatalogError, Level, WordItem};
pub use bridge::snapshot::{level_map, LevelView, ProfileView, SessionView, SNAPSHOT_VERSION};
pub use core::profile::{Avatar, Profile, WordRecord};
pub use core::random::{RandomSource, XorShiftRng};
pub use core::session::{Advance, LetterToken, LevelSummary, Session, Submission};
pub use input::queue::{Command, CommandQueue};
pub use report::dashboard::{ClassSummary, Dashboard, LevelProgress, PupilReport};
pub use storage::{KeyValueStore, MemoryStore, ProfileStore, SessionRecord, StorageError};
