use super::*;

#[derive(Default)]
struct ReadOnlyStorage {
    inner: MemoryStorage,
}

impl StoragePort for ReadOnlyStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.inner.read(key)
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), TimelineError> {
        Err(TimelineError::Storage("quota exceeded".to_owned()))
    }

    fn remove(&mut self, key: &str) -> Result<(), TimelineError> {
        self.inner.remove(key)
    }
}

#[test]
fn open_without_stored_value_uses_defaults() {
    let store = SettingsStore::open(MemoryStorage::new());
    assert_eq!(store.preferences(), &Preferences::default());
    assert_eq!(store.preferences().reaction_cap, 3);
    assert!(store.session_token().is_none());
}

#[test]
fn update_persists_and_reopen_reads_it_back() {
    let mut store = SettingsStore::open(MemoryStorage::new());
    store
        .update(|p| {
            p.theme = ThemeMode::Dark;
            p.mood_theme = false;
        })
        .unwrap();

    let reopened = SettingsStore::open(store.storage().clone());
    assert_eq!(reopened.preferences().theme, ThemeMode::Dark);
    assert!(!reopened.preferences().mood_theme);
}

#[test]
fn corrupt_or_partial_stored_preferences() {
    let mut storage = MemoryStorage::new();
    storage.write(PREFERENCES_KEY, "{not json").unwrap();
    assert_eq!(SettingsStore::open(storage).preferences(), &Preferences::default());

    let mut storage = MemoryStorage::new();
    storage.write(PREFERENCES_KEY, r#"{"theme":"light"}"#).unwrap();
    let store = SettingsStore::open(storage);
    assert_eq!(store.preferences().theme, ThemeMode::Light);
    assert!(store.preferences().compact_reactions);
}

#[test]
fn failed_write_keeps_previous_preferences() {
    let mut store = SettingsStore::open(ReadOnlyStorage::default());
    let err = store.update(|p| p.theme = ThemeMode::Dark).unwrap_err();
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(store.preferences().theme, ThemeMode::System);
}

#[test]
fn reset_clears_token_and_preferences() {
    let mut store = SettingsStore::open(MemoryStorage::new());
    store.set_session_token("tok-1").unwrap();
    store.update(|p| p.reaction_cap = 5).unwrap();
    assert_eq!(store.session_token().as_deref(), Some("tok-1"));

    store.reset().unwrap();
    assert!(store.session_token().is_none());
    assert_eq!(store.preferences(), &Preferences::default());
    assert!(store.storage().read(PREFERENCES_KEY).is_none());
}

#[test]
fn theme_mode_parse() {
    assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
    assert_eq!(ThemeMode::parse("sepia"), None);
}
