use thiserror::Error;

use crate::api::types::{GameEvent, LevelId, SpeechRequest, TokenId};
use crate::assets::catalog::{Catalog, CatalogError};
use crate::core::profile::{Avatar, Profile};
use crate::core::random::RandomSource;
use crate::core::session::{Advance, Session, Submission};
use crate::input::queue::{Command, CommandQueue};
use crate::report::dashboard::Dashboard;
use crate::storage::{KeyValueStore, ProfileStore, SessionRecord};

/// Configuration for the game, provided by the content crate.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Extra points when the first try at a word is correct (default: 2).
    pub first_try_bonus: u32,
    /// Shortest accepted player name after trimming (default: 2).
    pub min_name_len: usize,
    /// Prefix for every storage key (default: "spelladventure").
    pub storage_prefix: String,
    /// Spoken after a wrong answer.
    pub retry_phrase: String,
    /// Read each new word aloud when it appears (default: true).
    pub auto_speak_words: bool,
    /// Speech synthesis rate (default: 0.8).
    pub speech_rate: f32,
    /// Speech synthesis pitch (default: 1.1).
    pub speech_pitch: f32,
    /// Speech synthesis volume (default: 1.0).
    pub speech_volume: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            first_try_bonus: 2,
            min_name_len: 2,
            storage_prefix: "spelladventure".to_string(),
            retry_phrase: "Oops! Try again!".to_string(),
            auto_speak_words: true,
            speech_rate: 0.8,
            speech_pitch: 1.1,
            speech_volume: 1.0,
        }
    }
}

/// The contract every shipped game fulfils: its content and its settings.
pub trait GameContent {
    /// Return game configuration. Called once before the catalog is loaded.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// The levels and badges to play.
    fn catalog(&self) -> Result<Catalog, CatalogError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("please enter your name")]
    EmptyName,
    #[error("name must be at least {min} letters")]
    NameTooShort { min: usize },
}

/// The session engine: owns the profile, the active session and the store,
/// and applies player commands to them.
///
/// One instance per page. Every operation runs to completion; invalid input
/// is ignored rather than reported.
pub struct SpellingGame<S: KeyValueStore> {
    config: GameConfig,
    catalog: Catalog,
    store: ProfileStore<S>,
    rng: Box<dyn RandomSource>,
    profile: Profile,
    logged_in: bool,
    session: Option<Session>,
    events: Vec<GameEvent>,
    speech: Vec<SpeechRequest>,
}

impl<S: KeyValueStore> SpellingGame<S> {
    /// Build the game and restore the last active player, if any.
    pub fn new(config: GameConfig, catalog: Catalog, store: S, rng: Box<dyn RandomSource>) -> Self {
        let store = ProfileStore::new(store, &config.storage_prefix);
        let mut game = Self {
            config,
            catalog,
            store,
            rng,
            profile: Profile::default(),
            logged_in: false,
            session: None,
            events: Vec::new(),
            speech: Vec::new(),
        };
        if let Some(name) = game.store.active_player() {
            if let Some(profile) = game.store.find(&name) {
                log::info!("Restored player {:?}", name);
                game.profile = profile;
                game.logged_in = true;
            }
        }
        game
    }

    // ---- Read access ----

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn store(&self) -> &ProfileStore<S> {
        &self.store
    }

    /// Every pupil with saved progress on this device.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(&self.store.all_profiles(), &self.catalog)
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take the speech requests emitted since the last drain.
    pub fn drain_speech(&mut self) -> Vec<SpeechRequest> {
        std::mem::take(&mut self.speech)
    }

    // ---- Player lifecycle ----

    /// Log in by name. A returning name keeps its progress and takes the new avatar.
    pub fn login(&mut self, name: &str, avatar: Avatar) -> Result<(), LoginError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LoginError::EmptyName);
        }
        if name.chars().count() < self.config.min_name_len {
            return Err(LoginError::NameTooShort {
                min: self.config.min_name_len,
            });
        }

        self.profile = match self.store.find(name) {
            Some(mut existing) => {
                existing.avatar = avatar;
                log::info!("Welcome back, {}", name);
                existing
            }
            None => {
                log::info!("New player {}", name);
                Profile::new(name, avatar)
            }
        };
        self.session = None;
        self.logged_in = true;
        if self.store.load_session().is_some_and(|r| r.player != name) {
            self.store.clear_session();
        }
        self.persist_profile();
        if let Err(e) = self.store.set_active_player(Some(name)) {
            log::warn!("Could not remember active player: {}", e);
        }
        Ok(())
    }

    /// Leave the game. Progress stays on the device; the level in progress does not.
    pub fn logout(&mut self) {
        self.session = None;
        self.logged_in = false;
        self.store.clear_session();
        if let Err(e) = self.store.set_active_player(None) {
            log::warn!("Could not clear active player: {}", e);
        }
    }

    /// Wipe the active player's progress and discard any session.
    pub fn reset(&mut self) {
        if !self.profile.name.is_empty() {
            if let Err(e) = self.store.remove(&self.profile.name) {
                log::warn!("Could not remove profile record: {}", e);
            }
        }
        self.store.clear_session();
        if let Err(e) = self.store.set_active_player(None) {
            log::warn!("Could not clear active player: {}", e);
        }
        log::info!("Progress reset for {:?}", self.profile.name);
        self.profile = Profile::default();
        self.session = None;
        self.logged_in = false;
    }

    // ---- Session engine ----

    /// Start a fresh attempt at a level, replacing any current session.
    /// Unknown levels, and any level while nobody is logged in, are ignored.
    pub fn start_level(&mut self, level_id: LevelId) -> bool {
        if !self.logged_in {
            log::debug!("Ignoring start of level {} with no player", level_id.0);
            return false;
        }
        let Some(level) = self.catalog.level(level_id) else {
            log::debug!("Ignoring start of unknown level {}", level_id.0);
            return false;
        };
        let session = Session::start(level, self.config.first_try_bonus, self.rng.as_mut());
        log::info!("Level {} started", level_id.0);
        self.install_session(session);
        true
    }

    /// Continue the saved attempt at `level_id` if there is one, else start fresh.
    pub fn resume_level(&mut self, level_id: LevelId) -> bool {
        if !self.logged_in {
            log::debug!("Ignoring resume of level {} with no player", level_id.0);
            return false;
        }
        let Some(level) = self.catalog.level(level_id) else {
            log::debug!("Ignoring resume of unknown level {}", level_id.0);
            return false;
        };
        let resumed = self
            .store
            .load_session()
            .filter(|record| record.level_id == level_id && record.player == self.profile.name)
            .and_then(|record| {
                Session::resume(
                    level,
                    self.config.first_try_bonus,
                    record.words,
                    record.word_index,
                    self.rng.as_mut(),
                )
            });
        match resumed {
            Some(session) => {
                log::info!("Level {} resumed at word {}", level_id.0, session.word_index() + 1);
                self.install_session(session);
                true
            }
            None => self.start_level(level_id),
        }
    }

    fn install_session(&mut self, session: Session) {
        self.session = Some(session);
        self.save_session_record();
        self.speak_current_word();
    }

    pub fn select_letter(&mut self, token: TokenId) -> bool {
        match self.session.as_mut() {
            Some(session) => session.select_letter(token),
            None => false,
        }
    }

    pub fn deselect_letter(&mut self, token: TokenId) -> bool {
        match self.session.as_mut() {
            Some(session) => session.deselect_letter(token),
            None => false,
        }
    }

    /// Grade the answer. The profile is only touched on `advance`.
    pub fn submit_answer(&mut self) -> Option<Submission> {
        let result = self.session.as_mut()?.submit_answer()?;
        self.events.push(GameEvent::WordGraded {
            correct: result.correct,
            points: result.points,
            attempts: result.attempts,
        });
        if !result.correct {
            self.speech.push(SpeechRequest::new(self.config.retry_phrase.clone()));
        }
        Some(result)
    }

    /// Dismiss a wrong result and try the same word again.
    pub fn retry_word(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => session.retry_word(),
            None => false,
        }
    }

    /// Commit the shown result and move to the next word or finish the level.
    pub fn advance(&mut self) -> Option<Advance> {
        let Some(session) = self.session.as_mut() else {
            log::warn!("advance() called with no active session");
            return None;
        };
        let Some(step) = session.advance(&mut self.profile, &self.catalog, self.rng.as_mut()) else {
            log::warn!("advance() called with no result to move past");
            return None;
        };
        self.persist_profile();

        match &step {
            Advance::NextWord { word_index } => {
                self.events.push(GameEvent::WordAdvanced {
                    word_index: *word_index,
                });
                self.save_session_record();
                self.speak_current_word();
            }
            Advance::LevelComplete(summary) => {
                log::info!(
                    "Level {} complete: {} points, {}/{} correct",
                    summary.level_id.0,
                    summary.session_points,
                    summary.session_correct,
                    summary.total_words
                );
                self.store.clear_session();
                self.events.push(GameEvent::LevelCompleted {
                    level_id: summary.level_id,
                    session_points: summary.session_points,
                    session_correct: summary.session_correct,
                    total_words: summary.total_words,
                    stars: summary.stars,
                    new_badges: summary.new_badges.clone(),
                });
            }
        }
        Some(step)
    }

    /// Ask the audio collaborator to read `text`. Fire-and-forget.
    pub fn speak(&mut self, text: &str) {
        if !text.is_empty() {
            self.speech.push(SpeechRequest::new(text));
        }
    }

    // ---- Command dispatch ----

    /// Apply one command. Rejected logins are logged and otherwise ignored.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Login { name, avatar } => {
                if let Err(e) = self.login(&name, avatar) {
                    log::debug!("Login rejected: {}", e);
                }
            }
            Command::Logout => self.logout(),
            Command::StartLevel(id) => {
                self.start_level(id);
            }
            Command::ResumeLevel(id) => {
                self.resume_level(id);
            }
            Command::SelectLetter(token) => {
                self.select_letter(token);
            }
            Command::DeselectLetter(token) => {
                self.deselect_letter(token);
            }
            Command::Submit => {
                self.submit_answer();
            }
            Command::Retry => {
                self.retry_word();
            }
            Command::Advance => {
                self.advance();
            }
            Command::Speak(text) => self.speak(&text),
            Command::Reset => self.reset(),
        }
    }

    /// Drain the queue and apply every command in order.
    pub fn process(&mut self, queue: &mut CommandQueue) {
        for command in queue.drain() {
            self.apply(command);
        }
    }

    // ---- Persistence helpers ----

    fn persist_profile(&mut self) {
        if let Err(e) = self.store.persist(&self.profile) {
            log::warn!("Could not save progress for {:?}: {}", self.profile.name, e);
        }
    }

    fn save_session_record(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let record = SessionRecord {
            player: self.profile.name.clone(),
            level_id: session.level_id(),
            word_index: session.word_index(),
            words: session.word_order().to_vec(),
        };
        if let Err(e) = self.store.save_session(&record) {
            log::warn!("Could not save session record: {}", e);
        }
    }

    fn speak_current_word(&mut self) {
        if !self.config.auto_speak_words {
            return;
        }
        if let Some(word) = self.session.as_ref().and_then(|s| s.current_word()) {
            self.speech.push(SpeechRequest::new(word.word.clone()));
        }
    }
}
