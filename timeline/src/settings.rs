//! Persisted UI preferences behind an injected storage port.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser client keeps theme choice and the session token in
//! `localStorage`. Here that collaborator is the [`StoragePort`] trait: the
//! store is opened once at startup and handed to consumers by reference, and
//! tests run against [`MemoryStorage`].

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::reactions::DEFAULT_COMPACT_CAP;

pub const PREFERENCES_KEY: &str = "chatline_preferences";
pub const SESSION_TOKEN_KEY: &str = "chatline_session_token";

/// Opaque string key-value storage.
pub trait StoragePort {
    fn read(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`TimelineError::Storage`] when the value cannot be persisted.
    fn write(&mut self, key: &str, value: &str) -> Result<(), TimelineError>;

    /// # Errors
    ///
    /// Returns [`TimelineError::Storage`] when the key cannot be removed.
    fn remove(&mut self, key: &str) -> Result<(), TimelineError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), TimelineError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), TimelineError> {
        self.values.remove(key);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: ThemeMode,
    /// Follow the mood of recent messages with the cosmetic theme.
    pub mood_theme: bool,
    pub compact_reactions: bool,
    pub reaction_cap: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            mood_theme: true,
            compact_reactions: true,
            reaction_cap: DEFAULT_COMPACT_CAP,
        }
    }
}

pub struct SettingsStore<S: StoragePort> {
    storage: S,
    preferences: Preferences,
}

impl<S: StoragePort> SettingsStore<S> {
    /// Load preferences once. Missing or corrupt stored values fall back to
    /// defaults.
    pub fn open(storage: S) -> Self {
        let preferences = storage
            .read(PREFERENCES_KEY)
            .and_then(|raw| match serde_json::from_str::<Preferences>(&raw) {
                Ok(prefs) => Some(prefs),
                Err(error) => {
                    tracing::warn!(%error, "stored preferences unreadable; using defaults");
                    None
                }
            })
            .unwrap_or_default();
        Self { storage, preferences }
    }

    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Mutate preferences and persist the result.
    ///
    /// # Errors
    ///
    /// Propagates serialization and storage failures; the in-memory copy is
    /// only replaced once the write succeeds.
    pub fn update(&mut self, f: impl FnOnce(&mut Preferences)) -> Result<&Preferences, TimelineError> {
        let mut next = self.preferences.clone();
        f(&mut next);
        let raw = serde_json::to_string(&next)?;
        self.storage.write(PREFERENCES_KEY, &raw)?;
        self.preferences = next;
        Ok(&self.preferences)
    }

    #[must_use]
    pub fn session_token(&self) -> Option<String> {
        self.storage.read(SESSION_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// # Errors
    ///
    /// Propagates storage failures.
    pub fn set_session_token(&mut self, token: &str) -> Result<(), TimelineError> {
        self.storage.write(SESSION_TOKEN_KEY, token)
    }

    /// Forget everything stored locally and return to defaults.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub fn reset(&mut self) -> Result<(), TimelineError> {
        self.storage.remove(PREFERENCES_KEY)?;
        self.storage.remove(SESSION_TOKEN_KEY)?;
        self.preferences = Preferences::default();
        tracing::info!("local state reset");
        Ok(())
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
