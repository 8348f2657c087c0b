//! Game settings and preferences
//!
//! Persisted separately from gameplay (which is never saved) in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::Mode;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode picked last time
    pub mode: Mode,

    // === Visual Effects ===
    /// Sparkles and floating score popups
    pub effects: bool,
    /// Temporary happy/disgusted catcher faces
    pub expressions: bool,

    // === Accessibility ===
    /// Reduced motion (no sparkles or popups)
    pub reduced_motion: bool,

    // === Balance ===
    /// Optional balance override; invalid tunings fall back to defaults
    pub tuning: Option<Tuning>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Single,
            effects: true,
            expressions: true,
            reduced_motion: false,
            tuning: None,
        }
    }
}

impl Settings {
    /// Effective sparkle/popup effects (respects reduced_motion)
    pub fn effective_effects(&self) -> bool {
        self.effects && !self.reduced_motion
    }

    /// Balance for a match in `mode`: the override if it validates, otherwise defaults
    pub fn tuning_for(&self, mode: Mode) -> Tuning {
        match &self.tuning {
            Some(tuning) => match tuning.validate(mode.half_count()) {
                Ok(()) => tuning.clone(),
                Err(e) => {
                    log::warn!("Ignoring tuning override: {}", e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "catch_the_honey_settings";

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
                    Err(e) => log::warn!("Discarding unreadable settings: {}", e),
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
