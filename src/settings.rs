//! Player preferences
//!
//! Persisted separately from progress, under its own storage key.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::persistence::StorageBackend;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Multiplier on ambient and precipitation particle rates
    pub fn emission_density(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Camera shake on impacts and grazes
    pub screen_shake: bool,
    /// Rain and snow
    pub weather_effects: bool,

    // === Audio ===
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no zoom pulses)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            weather_effects: true,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Density of the persona's ambient particle stream
    pub fn ambient_density(&self) -> f32 {
        self.quality.emission_density()
    }

    /// Density of rain and snow; zero with weather effects off
    pub fn weather_density(&self) -> f32 {
        if self.weather_effects {
            self.quality.emission_density()
        } else {
            0.0
        }
    }

    /// Load settings, falling back to defaults on a missing or bad document
    pub fn load(storage: &impl StorageBackend) -> Self {
        if let Some(json) = storage.get_item(SETTINGS_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(err) => log::warn!("Ignoring bad settings: {err}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, storage: &mut impl StorageBackend) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(SETTINGS_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(err) => log::warn!("Failed to serialize settings: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(Settings::default().effective_screen_shake());
    }

    #[test]
    fn test_weather_toggle_only_zeroes_precipitation() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.weather_density(), 1.0);
        settings.weather_effects = false;
        assert_eq!(settings.weather_density(), 0.0);
        assert_eq!(settings.ambient_density(), 1.0);

        settings.quality = QualityPreset::Low;
        assert_eq!(settings.ambient_density(), 0.25);
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            quality: QualityPreset::Low,
            muted: true,
            ..Settings::default()
        };
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_bad_settings_fall_back() {
        let mut storage = MemoryStorage::new();
        storage.set_item(SETTINGS_KEY, "[1, 2");
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
