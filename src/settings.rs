use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::context::{Language, SessionContext, Theme};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserPreferences {
    #[serde(default)]
    language: Language,
    #[serde(default)]
    theme: Theme,
}

impl From<&UserPreferences> for SessionContext {
    fn from(prefs: &UserPreferences) -> Self {
        SessionContext::new(prefs.language, prefs.theme)
    }
}

/// Language and theme flags, read once at startup and rewritten on every toggle.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserPreferences>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserPreferences::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn context(&self) -> SessionContext {
        match self.data.read() {
            Ok(guard) => SessionContext::from(&*guard),
            Err(poisoned) => SessionContext::from(&*poisoned.into_inner()),
        }
    }

    pub fn set_language(&self, language: Language) -> Result<SessionContext> {
        self.update(|prefs| prefs.language = language)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<SessionContext> {
        self.update(|prefs| prefs.theme = theme)
    }

    fn update(&self, apply: impl FnOnce(&mut UserPreferences)) -> Result<SessionContext> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        apply(&mut guard);
        self.persist(&guard)?;
        Ok(SessionContext::from(&*guard))
    }

    fn persist(&self, data: &UserPreferences) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.context(), SessionContext::default());
    }

    #[test]
    fn toggles_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store.set_language(Language::Tr).unwrap();
        store.set_theme(Theme::Dark).unwrap();

        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(
            reloaded.context(),
            SessionContext::new(Language::Tr, Theme::Dark)
        );
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.context().language, Language::En);
    }
}
