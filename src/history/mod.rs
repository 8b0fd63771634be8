//! Best-effort local persistence of chat transcripts and the chosen language.

mod sqlite;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

pub use sqlite::SqliteStore;

use crate::assistant::{ChatMessage, StoreError};

/// Default storage slot for the assistant transcript.
pub const DEFAULT_HISTORY_KEY: &str = "illunare-ai-history";

/// Default key for the saved answer language.
pub const DEFAULT_LANGUAGE_KEY: &str = "illunare-ai-language";

/// Key-value storage for transcripts.
///
/// Each slot holds the whole transcript; `save` replaces the previous value.
/// Preferences are plain strings kept apart from the transcript slots.
pub trait TranscriptStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Vec<ChatMessage>, StoreError>;
    fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<(), StoreError>;
    fn clear(&self, key: &str) -> Result<(), StoreError>;
    fn load_preference(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save_preference(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store, used when nothing should touch the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Vec<ChatMessage>>>,
    preferences: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned().unwrap_or_default())
    }

    fn save(&self, key: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), messages.to_vec());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn load_preference(&self, key: &str) -> Result<Option<String>, StoreError> {
        let preferences = self.preferences.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(preferences.get(key).cloned())
    }

    fn save_preference(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.preferences
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
