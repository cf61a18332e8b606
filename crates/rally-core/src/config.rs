//! Editor and API configuration.

use serde::{Deserialize, Serialize};

/// Default analysis endpoint when `RALLY_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:54321/functions/v1/multipart-upload";

/// Tunables for the timeline editor.
///
/// Stored as JSON in local storage by the client, so every field has a
/// default and unknown or missing fields fall back to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Precise keyboard step in seconds (used while Shift is held).
    pub step: f64,
    /// Factor applied to `step` for unmodified presses.
    pub fast_multiplier: f64,
    /// Delay before a held key starts repeating.
    pub repeat_delay_ms: u32,
    /// Period of the key repeat once it has started.
    pub repeat_interval_ms: u32,
    /// Smallest allowed rally length while adjusting bounds.
    pub min_gap: f64,
    pub autosave_debounce_ms: u32,
    pub max_undo_steps: usize,
    pub poll_interval_ms: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_factor: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            fast_multiplier: 5.0,
            repeat_delay_ms: 300,
            repeat_interval_ms: 50,
            min_gap: crate::time::MIN_RALLY_GAP,
            autosave_debounce_ms: 500,
            max_undo_steps: 20,
            poll_interval_ms: 3000,
            min_zoom: 1.0,
            max_zoom: 40.0,
            zoom_factor: 1.5,
        }
    }
}

impl EditorConfig {
    /// Step for one bound adjustment. Shift selects the precise step.
    pub fn step_for(&self, precise: bool) -> f64 {
        if precise {
            self.step
        } else {
            self.step * self.fast_multiplier
        }
    }
}

/// Where the analysis service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub url: String,
    /// Sent as `Authorization: Bearer <key>` when present.
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_parts(None, None)
    }
}

impl ApiConfig {
    /// Resolves the endpoint from build-time environment variables.
    pub fn from_build_env() -> Self {
        Self::from_parts(option_env!("RALLY_API_URL"), option_env!("RALLY_API_KEY"))
    }

    fn from_parts(url: Option<&str>, api_key: Option<&str>) -> Self {
        Self {
            url: url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(DEFAULT_API_URL)
                .to_string(),
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
        }
    }
}
