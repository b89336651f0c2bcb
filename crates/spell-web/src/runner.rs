use serde::Serialize;
use spell_engine::{
    level_map, Avatar, CatalogError, Command, CommandQueue, GameConfig, GameContent, GameEvent,
    KeyValueStore, LevelId, PupilReport, ProfileView, SessionView, SpeechRequest, SpellingGame,
    TokenId, XorShiftRng,
};

/// Generic game runner that wires a content crate to the engine.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<S: KeyValueStore> {
    game: SpellingGame<S>,
    commands: CommandQueue,
    /// Events from the last tick, serialized for the UI.
    events_json: String,
}

#[derive(Serialize)]
struct AvatarView {
    id: &'static str,
    name: &'static str,
    picture: &'static str,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not serialize snapshot: {}", e);
            "null".to_string()
        }
    }
}

impl<S: KeyValueStore> GameRunner<S> {
    /// Load the content's catalog and build the engine on top of `store`.
    pub fn new<G: GameContent>(content: G, store: S, seed: u64) -> Result<Self, CatalogError> {
        let config = content.config();
        let catalog = content.catalog()?;
        log::info!(
            "Catalog loaded: {} levels, {} badges",
            catalog.level_count(),
            catalog.badges.len()
        );
        let game = SpellingGame::new(config, catalog, store, Box::new(XorShiftRng::new(seed)));
        Ok(Self {
            game,
            commands: CommandQueue::new(),
            events_json: "[]".to_string(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        self.game.config()
    }

    pub fn game(&self) -> &SpellingGame<S> {
        &self.game
    }

    /// Queue a command for the next tick.
    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Log in immediately so the login screen can show the reason for a refusal.
    /// Commands queued before the login are applied first.
    /// Returns an empty string on success.
    pub fn login(&mut self, name: &str, avatar_id: &str) -> String {
        self.game.process(&mut self.commands);
        let avatar = Avatar::from_id(avatar_id).unwrap_or_default();
        match self.game.login(name, avatar) {
            Ok(()) => String::new(),
            Err(e) => e.to_string(),
        }
    }

    pub fn start_level(&mut self, level_id: u32) {
        self.push_command(Command::StartLevel(LevelId(level_id)));
    }

    pub fn resume_level(&mut self, level_id: u32) {
        self.push_command(Command::ResumeLevel(LevelId(level_id)));
    }

    pub fn select_letter(&mut self, token: u32) {
        self.push_command(Command::SelectLetter(TokenId(token)));
    }

    pub fn deselect_letter(&mut self, token: u32) {
        self.push_command(Command::DeselectLetter(TokenId(token)));
    }

    /// Apply queued commands and collect what the UI must react to.
    /// Returns the speech requests for the audio collaborator.
    pub fn tick(&mut self) -> Vec<SpeechRequest> {
        self.game.process(&mut self.commands);
        let events: Vec<GameEvent> = self.game.drain_events();
        self.events_json = to_json(&events);
        self.game.drain_speech()
    }

    // ---- JSON accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn events_json(&self) -> String {
        self.events_json.clone()
    }

    pub fn profile_json(&self) -> String {
        if !self.game.is_logged_in() {
            return "null".to_string();
        }
        to_json(&ProfileView::new(self.game.profile()))
    }

    pub fn session_json(&self) -> String {
        match self.game.session() {
            Some(session) => to_json(&SessionView::new(session, self.game.catalog())),
            None => "null".to_string(),
        }
    }

    pub fn level_map_json(&self) -> String {
        to_json(&level_map(self.game.catalog(), self.game.profile()))
    }

    pub fn dashboard_json(&self) -> String {
        to_json(&self.game.dashboard())
    }

    /// Pretty report for one pupil, for the dashboard's export button.
    pub fn pupil_report_json(&self, name: &str) -> String {
        let Some(profile) = self.game.store().find(name) else {
            return "null".to_string();
        };
        match PupilReport::new(&profile, self.game.catalog()).to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not export report for {:?}: {}", name, e);
                "null".to_string()
            }
        }
    }

    pub fn avatars_json(&self) -> String {
        let avatars: Vec<AvatarView> = Avatar::ALL
            .into_iter()
            .map(|a| AvatarView {
                id: a.id(),
                name: a.display_name(),
                picture: a.picture(),
            })
            .collect();
        to_json(&avatars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spell_engine::{Catalog, MemoryStore};

    struct Builtin;

    impl GameContent for Builtin {
        fn catalog(&self) -> Result<Catalog, CatalogError> {
            Catalog::builtin()
        }
    }

    struct Broken;

    impl GameContent for Broken {
        fn catalog(&self) -> Result<Catalog, CatalogError> {
            Catalog::from_json("{\"levels\": []}")
        }
    }

    fn runner() -> GameRunner<MemoryStore> {
        GameRunner::new(Builtin, MemoryStore::new(), 99).unwrap()
    }

    #[test]
    fn broken_catalog_is_reported() {
        assert!(GameRunner::new(Broken, MemoryStore::new(), 1).is_err());
    }

    #[test]
    fn login_reports_reason() {
        let mut r = runner();
        assert_eq!(r.login("A", "cat"), "name must be at least 2 letters");
        assert_eq!(r.profile_json(), "null");
        assert_eq!(r.login("Ava", "unicorn"), "");
        let profile: serde_json::Value = serde_json::from_str(&r.profile_json()).unwrap();
        assert_eq!(profile["name"], "Ava");
        assert_eq!(profile["avatar"], "dragon");
    }

    #[test]
    fn commands_wait_for_tick() {
        let mut r = runner();
        r.login("Ava", "owl");
        r.start_level(1);
        assert_eq!(r.session_json(), "null");
        let speech = r.tick();
        assert_eq!(speech.len(), 1);
        let session: serde_json::Value = serde_json::from_str(&r.session_json()).unwrap();
        assert_eq!(session["level_id"], 1);
        assert_eq!(session["word"], speech[0].text.as_str());
    }

    #[test]
    fn login_after_queued_logout_stays_logged_in() {
        let mut r = runner();
        r.login("Ava", "cat");
        r.push_command(Command::Logout);
        assert_eq!(r.login("Ben", "owl"), "");
        r.tick();
        assert!(r.game().is_logged_in());
        assert_eq!(r.game().profile().name, "Ben");
    }

    #[test]
    fn queued_commands_run_before_login() {
        let mut r = runner();
        r.login("Ava", "cat");
        r.start_level(2);
        r.login("Ava", "fox");
        // the login discards the session the queued start created
        assert!(r.game().session().is_none());
        assert_eq!(r.game().store().load_session().unwrap().level_id, LevelId(2));
    }

    #[test]
    fn tick_publishes_events() {
        let mut r = runner();
        r.login("Ava", "cat");
        r.start_level(1);
        r.tick();
        r.push_command(Command::Submit);
        let speech = r.tick();
        assert_eq!(speech, vec![SpeechRequest::new("Oops! Try again!")]);
        let events: serde_json::Value = serde_json::from_str(&r.events_json()).unwrap();
        assert_eq!(events[0]["kind"], "word_graded");
        assert_eq!(events[0]["correct"], false);

        r.tick();
        assert_eq!(r.events_json(), "[]");
    }

    #[test]
    fn map_and_avatars_serialize() {
        let r = runner();
        let map: serde_json::Value = serde_json::from_str(&r.level_map_json()).unwrap();
        assert_eq!(map.as_array().unwrap().len(), 4);
        assert_eq!(map[0]["unlocked"], true);
        assert_eq!(map[1]["unlocked"], false);

        let avatars: serde_json::Value = serde_json::from_str(&r.avatars_json()).unwrap();
        assert_eq!(avatars[1]["name"], "Kitty");
    }

    #[test]
    fn dashboard_and_report_export() {
        let mut r = runner();
        r.login("Ava", "fox");
        let dashboard: serde_json::Value = serde_json::from_str(&r.dashboard_json()).unwrap();
        assert_eq!(dashboard["summary"]["pupil_count"], 1);
        assert!(r.pupil_report_json("Ava").contains("\"name\": \"Ava\""));
        assert_eq!(r.pupil_report_json("Nobody"), "null");
    }
}
