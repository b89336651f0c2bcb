use serde::{Deserialize, Serialize};

use crate::api::types::LevelId;
use crate::assets::catalog::WordItem;
use crate::core::profile::Profile;
use crate::storage::{KeyValueStore, StorageError};

/// Transient record of the level in progress, so a reload can pick it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Player who started the attempt; only they may resume it.
    #[serde(default)]
    pub player: String,
    pub level_id: LevelId,
    pub word_index: usize,
    pub words: Vec<WordItem>,
}

/// Profile and session records on top of a key-value store.
///
/// Layout under `prefix`:
/// ```text
/// {prefix}_player:{name}   one Profile JSON document per player
/// {prefix}_players         JSON array of player names (dashboard roster)
/// {prefix}_active_player   name of the logged-in player
/// {prefix}_session_words   SessionRecord for the level in progress
/// ```
pub struct ProfileStore<S: KeyValueStore> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(store: S, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    fn player_key(&self, name: &str) -> String {
        format!("{}_player:{}", self.prefix, name)
    }

    fn roster_key(&self) -> String {
        format!("{}_players", self.prefix)
    }

    fn active_key(&self) -> String {
        format!("{}_active_player", self.prefix)
    }

    fn session_key(&self) -> String {
        format!("{}_session_words", self.prefix)
    }

    // ---- Profiles ----

    /// The stored profile for `name`, or None if absent or unreadable.
    pub fn find(&self, name: &str) -> Option<Profile> {
        let raw = self.store.get(&self.player_key(name))?;
        match serde_json::from_str::<Profile>(&raw) {
            Ok(mut profile) => {
                profile.name = name.to_string();
                Some(profile)
            }
            Err(e) => {
                log::warn!("Ignoring unreadable profile for {:?}: {}", name, e);
                None
            }
        }
    }

    /// The stored profile for `name`, or the default empty profile.
    pub fn load(&self, name: &str) -> Profile {
        self.find(name).unwrap_or_default()
    }

    /// Write the profile under its name and make sure it is on the roster.
    pub fn persist(&mut self, profile: &Profile) -> Result<(), StorageError> {
        if profile.name.is_empty() {
            return Ok(());
        }
        let data = serde_json::to_string(profile)?;
        self.store.set(&self.player_key(&profile.name), &data)?;

        let mut roster = self.roster();
        if !roster.iter().any(|n| n == &profile.name) {
            roster.push(profile.name.clone());
            self.store
                .set(&self.roster_key(), &serde_json::to_string(&roster)?)?;
        }
        Ok(())
    }

    /// Delete a player's record and drop them from the roster.
    pub fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        self.store.remove(&self.player_key(name));
        let mut roster = self.roster();
        let before = roster.len();
        roster.retain(|n| n != name);
        if roster.len() != before {
            self.store
                .set(&self.roster_key(), &serde_json::to_string(&roster)?)?;
        }
        Ok(())
    }

    /// Names of every player who has saved progress on this device.
    pub fn roster(&self) -> Vec<String> {
        self.store
            .get(&self.roster_key())
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Every readable profile on the roster, in roster order.
    pub fn all_profiles(&self) -> Vec<Profile> {
        self.roster().iter().filter_map(|name| self.find(name)).collect()
    }

    // ---- Active player ----

    pub fn active_player(&self) -> Option<String> {
        self.store.get(&self.active_key()).filter(|n| !n.is_empty())
    }

    pub fn set_active_player(&mut self, name: Option<&str>) -> Result<(), StorageError> {
        match name {
            Some(name) => self.store.set(&self.active_key(), name),
            None => {
                self.store.remove(&self.active_key());
                Ok(())
            }
        }
    }

    // ---- Session record ----

    pub fn save_session(&mut self, record: &SessionRecord) -> Result<(), StorageError> {
        let data = serde_json::to_string(record)?;
        self.store.set(&self.session_key(), &data)
    }

    /// The saved session, or None if absent or unreadable.
    pub fn load_session(&self) -> Option<SessionRecord> {
        let raw = self.store.get(&self.session_key())?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Ignoring unreadable session record: {}", e);
                None
            }
        }
    }

    pub fn clear_session(&mut self) {
        self.store.remove(&self.session_key());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::Avatar;
    use crate::storage::MemoryStore;

    fn store() -> ProfileStore<MemoryStore> {
        ProfileStore::new(MemoryStore::new(), "test")
    }

    fn store_with(key: &str, value: &str) -> ProfileStore<MemoryStore> {
        let mut backend = MemoryStore::new();
        backend.set(key, value).unwrap();
        ProfileStore::new(backend, "test")
    }

    #[test]
    fn persist_then_load() {
        let mut s = store();
        let mut p = Profile::new("Ava", Avatar::Owl);
        p.total_points = 42;
        s.persist(&p).unwrap();
        assert_eq!(s.load("Ava"), p);
        assert_eq!(s.roster(), vec!["Ava".to_string()]);
    }

    #[test]
    fn unknown_name_loads_default() {
        let s = store();
        assert_eq!(s.load("Nobody"), Profile::default());
        assert!(s.find("Nobody").is_none());
    }

    #[test]
    fn malformed_record_is_treated_as_absent() {
        let s = store_with("test_player:Ava", "{not json");
        assert!(s.find("Ava").is_none());
        assert_eq!(s.load("Ava"), Profile::default());
    }

    #[test]
    fn nameless_profile_is_not_written() {
        let mut s = store();
        s.persist(&Profile::default()).unwrap();
        assert!(s.backend().is_empty());
    }

    #[test]
    fn roster_has_each_name_once() {
        let mut s = store();
        let p = Profile::new("Ava", Avatar::Owl);
        s.persist(&p).unwrap();
        s.persist(&p).unwrap();
        s.persist(&Profile::new("Ben", Avatar::Cat)).unwrap();
        assert_eq!(s.roster(), vec!["Ava".to_string(), "Ben".to_string()]);
        assert_eq!(s.all_profiles().len(), 2);
    }

    #[test]
    fn remove_drops_record_and_roster_entry() {
        let mut s = store();
        s.persist(&Profile::new("Ava", Avatar::Owl)).unwrap();
        s.remove("Ava").unwrap();
        assert!(s.find("Ava").is_none());
        assert!(s.roster().is_empty());
    }

    #[test]
    fn active_player_marker() {
        let mut s = store();
        assert_eq!(s.active_player(), None);
        s.set_active_player(Some("Ava")).unwrap();
        assert_eq!(s.active_player().as_deref(), Some("Ava"));
        s.set_active_player(None).unwrap();
        assert_eq!(s.active_player(), None);
    }

    #[test]
    fn session_record_round_trip_and_clear() {
        let mut s = store();
        let record = SessionRecord {
            player: "Ava".to_string(),
            level_id: LevelId(2),
            word_index: 3,
            words: vec![WordItem::new("fish", "🐟", "Swims")],
        };
        s.save_session(&record).unwrap();
        assert_eq!(s.load_session(), Some(record));
        s.clear_session();
        assert_eq!(s.load_session(), None);
    }

    #[test]
    fn corrupt_session_record_is_ignored() {
        let s = store_with("test_session_words", "[1,2");
        assert_eq!(s.load_session(), None);
    }
}
