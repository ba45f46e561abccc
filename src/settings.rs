//! Player preferences
//!
//! Opaque to the simulation; stored and published by the repository.

use serde::{Deserialize, Serialize};

/// Languages with translated string tables
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["ko", "en"];

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub sound_enabled: bool,
    pub music_enabled: bool,
    pub vibration_enabled: bool,
    /// ISO 639-1 language code
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            vibration_enabled: true,
            language: "ko".to_string(),
        }
    }
}

impl Settings {
    /// Switch language; unsupported codes are ignored and return false
    pub fn set_language(&mut self, code: &str) -> bool {
        let code = code.trim().to_lowercase();
        if !SUPPORTED_LANGUAGES.contains(&code.as_str()) {
            return false;
        }
        self.language = code;
        true
    }

    /// Music only plays when sound is on
    pub fn effective_music(&self) -> bool {
        self.music_enabled && self.sound_enabled
    }
}
