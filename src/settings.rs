//! Player preferences
//!
//! Persisted in LocalStorage on the web. Scores are never stored here.

use serde::{Deserialize, Serialize};

/// UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        // Accept full language tags such as "ko-KR"
        match lower.split(['-', '_']).next().unwrap_or_default() {
            "en" => Some(Locale::En),
            "ko" | "kr" => Some(Locale::Ko),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub locale: Locale,

    // === Audio ===
    /// Play sound cues at all
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show the NICE!/GREAT! combo call-outs
    pub combo_callouts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::En,

            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,

            combo_callouts: true,
        }
    }
}

impl Settings {
    /// Volume actually applied to sound cues
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "giwa_dodge_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_tag() {
        assert_eq!(Locale::from_str("ko-KR"), Some(Locale::Ko));
        assert_eq!(Locale::from_str("EN_us"), Some(Locale::En));
        assert_eq!(Locale::from_str("fr"), None);
        assert_eq!(Locale::Ko.as_str(), "ko");
    }

    #[test]
    fn test_sound_disabled_silences() {
        let settings = Settings {
            sound_enabled: false,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
        assert!((Settings::default().effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_old_json_gets_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "locale": "Ko" }"#).unwrap();
        assert_eq!(settings.locale, Locale::Ko);
        assert!(settings.sound_enabled);
    }
}
