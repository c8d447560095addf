//! Player preferences
//!
//! Persisted separately from game balance in LocalStorage.

use serde::{Deserialize, Serialize};

/// Colour presets for the globe and mode tints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorPreset {
    #[default]
    Classic,
    HighContrast,
}

impl ColorPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorPreset::Classic => "Classic",
            ColorPreset::HighContrast => "High Contrast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(ColorPreset::Classic),
            "high" | "high contrast" | "high-contrast" => Some(ColorPreset::HighContrast),
            _ => None,
        }
    }

    /// Opacity multiplier for hidden-hemisphere strokes
    pub fn back_emphasis(&self) -> f32 {
        match self {
            ColorPreset::Classic => 1.0,
            ColorPreset::HighContrast => 1.6,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Colour preset
    pub colors: ColorPreset,

    // === Globe interaction ===
    /// Spin per dragged pixel (degrees)
    pub drag_spin_per_px: f32,
    /// Tilt per dragged pixel (degrees)
    pub drag_tilt_per_px: f32,

    // === Globe drawing ===
    /// Draw the faint hidden half of parallels and meridians
    pub show_back_curves: bool,
    /// Draw country outlines once they are loaded
    pub show_outlines: bool,

    // === Accessibility ===
    /// Reduced motion (no pulsing grace bar)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            colors: ColorPreset::Classic,

            drag_spin_per_px: 0.5,
            drag_tilt_per_px: 0.3,

            show_back_curves: true,
            show_outlines: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a colour preset
    pub fn from_preset(preset: ColorPreset) -> Self {
        Self {
            colors: preset,
            ..Self::default()
        }
    }

    /// Convert a pointer drag in pixels to (spin, tilt) degrees
    pub fn drag_to_degrees(&self, dx_px: f32, dy_px: f32) -> (f32, f32) {
        (dx_px * self.drag_spin_per_px, dy_px * self.drag_tilt_per_px)
    }

    /// Parse settings JSON, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "globe_hunt_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json_or_default(&json);
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
    fn drag_uses_per_axis_sensitivity() {
        let s = Settings::default();
        assert_eq!(s.drag_to_degrees(10.0, 10.0), (5.0, 3.0));
    }

    #[test]
    fn bad_json_falls_back() {
        assert_eq!(Settings::from_json_or_default("{not json"), Settings::default());
        let s = Settings::from_json_or_default(r#"{"reduced_motion": true}"#);
        assert!(s.reduced_motion);
        assert!(s.show_outlines);
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!(ColorPreset::from_str("High"), Some(ColorPreset::HighContrast));
        assert_eq!(ColorPreset::from_str("classic"), Some(ColorPreset::Classic));
        assert_eq!(ColorPreset::from_str("neon"), None);
        assert_eq!(Settings::from_preset(ColorPreset::HighContrast).colors.as_str(), "High Contrast");
    }
}
