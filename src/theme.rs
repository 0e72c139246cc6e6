use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings key holding the persisted theme.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parses a stored theme value; unknown values fall back to light.
    pub fn from_str(value: &str) -> Theme {
        match value {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn flipped(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Key-value persistence capability for user settings. Injected into the
/// theme service so it can be exercised without a real settings file.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>>;
}

/// JSON-file-backed settings store. Values are cached in memory and written
/// through on every set. A missing or unreadable file starts empty.
pub struct FileSettings {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileSettings {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        FileSettings { path, values }
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.values.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Default settings file location for the interactive client.
pub fn default_settings_path() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".horario-prefs.json")
}

/// Explicit theme state with get/set/toggle over an injected store,
/// replacing ambient global theme lookups.
pub struct ThemeService<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> ThemeService<S> {
    pub fn new(store: S) -> Self {
        ThemeService { store }
    }

    pub fn get(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .map(|value| Theme::from_str(&value))
            .unwrap_or_default()
    }

    pub fn set(&mut self, theme: Theme) -> Result<(), Box<dyn std::error::Error>> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Flips the current theme, persists it, and returns the new theme.
    pub fn toggle(&mut self) -> Result<Theme, Box<dyn std::error::Error>> {
        let next = self.get().flipped();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Default)]
    struct MemorySettings {
        values: HashMap<String, String>,
    }

    impl SettingsStore for MemorySettings {
        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn defaults_to_light_when_nothing_stored() {
        let service = ThemeService::new(MemorySettings::default());
        assert_eq!(service.get(), Theme::Light);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut service = ThemeService::new(MemorySettings::default());
        assert_eq!(service.toggle().expect("toggle"), Theme::Dark);
        assert_eq!(service.get(), Theme::Dark);
        assert_eq!(service.toggle().expect("toggle"), Theme::Light);
        assert_eq!(service.get(), Theme::Light);
    }

    #[test]
    fn unknown_stored_value_falls_back_to_light() {
        let mut store = MemorySettings::default();
        store.set(THEME_KEY, "solarized").expect("set");
        let service = ThemeService::new(store);
        assert_eq!(service.get(), Theme::Light);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "horario-settings-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));

        let mut service = ThemeService::new(FileSettings::open(&path));
        service.set(Theme::Dark).expect("persist theme");

        let reopened = ThemeService::new(FileSettings::open(&path));
        std::fs::remove_file(&path).ok();
        assert_eq!(reopened.get(), Theme::Dark);
    }

    #[test]
    fn corrupt_settings_file_starts_empty() {
        let path = std::env::temp_dir().join(format!(
            "horario-settings-bad-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::write(&path, "{not json").expect("write corrupt file");

        let service = ThemeService::new(FileSettings::open(&path));
        std::fs::remove_file(&path).ok();
        assert_eq!(service.get(), Theme::Light);
    }
}
