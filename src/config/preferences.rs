//! User preferences, persisted beside progress

use serde::{Deserialize, Serialize};

use crate::progress::backend::{PREFERENCES_KEY, StorageBackend};
use crate::progress::StorageError;
use crate::timer::DEFAULT_WARNING_THRESHOLD_SECS;

/// Reader-facing display and timer preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// "light", "dark" or "system"
    pub theme: String,
    /// Body text size in pixels
    pub font_size: u16,
    pub show_timer: bool,
    /// Save progress after every answer
    pub auto_save: bool,
    pub warning_threshold_secs: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "system".to_string(),
            font_size: 16,
            show_timer: true,
            auto_save: true,
            warning_threshold_secs: DEFAULT_WARNING_THRESHOLD_SECS,
        }
    }
}

impl Preferences {
    /// Load preferences, falling back to defaults when missing or unreadable
    pub fn load<B: StorageBackend>(backend: &B) -> Self {
        let raw = match backend.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                tracing::error!("Error reading preferences: {}", e);
                return Self::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::error!("Error parsing preferences: {}", e);
            Self::default()
        })
    }

    pub fn save<B: StorageBackend>(&self, backend: &mut B) -> Result<(), StorageError> {
        let contents = serde_json::to_string(self)?;
        backend.set(PREFERENCES_KEY, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryBackend;

    #[test]
    fn missing_preferences_are_defaults() {
        let backend = MemoryBackend::new();
        assert_eq!(Preferences::load(&backend), Preferences::default());
    }

    #[test]
    fn saved_preferences_load_back() {
        let mut backend = MemoryBackend::new();
        let prefs = Preferences { theme: "dark".into(), font_size: 18, ..Default::default() };
        prefs.save(&mut backend).unwrap();

        assert_eq!(Preferences::load(&backend), prefs);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let mut backend = MemoryBackend::new();
        backend.set(PREFERENCES_KEY, r#"{"theme":"light"}"#).unwrap();

        let prefs = Preferences::load(&backend);
        assert_eq!(prefs.theme, "light");
        assert_eq!(prefs.font_size, 16);
        assert!(prefs.show_timer);
    }

    #[test]
    fn corrupt_preferences_are_defaults() {
        let mut backend = MemoryBackend::new();
        backend.set(PREFERENCES_KEY, "][").unwrap();
        assert_eq!(Preferences::load(&backend), Preferences::default());
    }
}
