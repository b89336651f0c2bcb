use spell_engine::{KeyValueStore, MemoryStore, StorageError};

/// Browser `localStorage`, or an in-memory map when the page cannot reach it
/// (private browsing, sandboxed iframes). Progress then lasts for the page only.
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        match storage {
            Some(storage) => BrowserStore::Local(storage),
            None => {
                log::warn!("localStorage unavailable, progress will not be kept");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Local(storage) => storage.get_item(key).ok().flatten(),
            BrowserStore::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            BrowserStore::Local(storage) => {
                storage
                    .set_item(key, value)
                    .map_err(|e| StorageError::Rejected {
                        key: key.to_string(),
                        reason: format!("{:?}", e),
                    })
            }
            BrowserStore::Memory(store) => store.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) {
        match self {
            BrowserStore::Local(storage) => {
                if let Err(e) = storage.remove_item(key) {
                    log::warn!("Could not remove {:?}: {:?}", key, e);
                }
            }
            BrowserStore::Memory(store) => store.remove(key),
        }
    }
}
