//! Engine configuration.
//!
//! Every heuristic threshold used by the matching and estimation code
//! lives here so it can be tuned (and tested) without touching the
//! matching logic itself. Loaded from config.json next to the executable,
//! falling back to defaults. The config is passed explicitly to the
//! functions that need it; there is no global instance.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable thresholds for chart reconciliation and inventory estimation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Vertical slack in pixels added to a medication row's height when
    /// deciding whether a checkmark belongs to that row. Absorbs skewed
    /// or misaligned chart photos.
    #[serde(default = "default_row_slack_px")]
    pub row_slack_px: f32,
    /// Confidence attached to every emitted dose confirmation.
    #[serde(default = "default_confirmation_confidence")]
    pub confirmation_confidence: f32,
    /// Dose time assumed when the catalog has no schedule for a medication.
    #[serde(default = "default_dose_time")]
    pub default_dose_time: String,
    /// Estimated units for a bottle with a full/labeled-bottle cue.
    #[serde(default = "default_bottle_full_count")]
    pub bottle_full_count: u32,
    /// Conservative estimate for a bottle without a fullness cue.
    #[serde(default = "default_bottle_partial_count")]
    pub bottle_partial_count: u32,
    /// Individually segmented pills needed before a blister pack is
    /// assumed to be fuller than what was segmented.
    #[serde(default = "default_blister_detection_min")]
    pub blister_detection_min: u32,
    /// Floor applied to a sparse blister detection.
    #[serde(default = "default_blister_floor")]
    pub blister_floor: u32,
    /// Confidence attached to synthesized fallback video frame samples.
    #[serde(default = "default_fallback_frame_confidence")]
    pub fallback_frame_confidence: f32,
    /// Days of stock below which the forecast turns "low".
    #[serde(default = "default_min_stock_days")]
    pub min_stock_days: u32,
    /// Vision backend API key. Empty means unconfigured: the host falls
    /// back to the simulated backend.
    #[serde(default)]
    pub api_key: String,
    /// Maximum number of polls of a pending video analysis operation.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,
    /// Delay between polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_row_slack_px() -> f32 {
    50.0
}

fn default_confirmation_confidence() -> f32 {
    0.85
}

fn default_dose_time() -> String {
    "08:00".to_string()
}

fn default_bottle_full_count() -> u32 {
    30
}

fn default_bottle_partial_count() -> u32 {
    15
}

fn default_blister_detection_min() -> u32 {
    5
}

fn default_blister_floor() -> u32 {
    10
}

fn default_fallback_frame_confidence() -> f32 {
    0.7
}

fn default_min_stock_days() -> u32 {
    7
}

fn default_poll_max_attempts() -> u32 {
    30
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            row_slack_px: default_row_slack_px(),
            confirmation_confidence: default_confirmation_confidence(),
            default_dose_time: default_dose_time(),
            bottle_full_count: default_bottle_full_count(),
            bottle_partial_count: default_bottle_partial_count(),
            blister_detection_min: default_blister_detection_min(),
            blister_floor: default_blister_floor(),
            fallback_frame_confidence: default_fallback_frame_confidence(),
            min_stock_days: default_min_stock_days(),
            api_key: String::new(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl RecognitionConfig {
    /// Loads configuration from the given path, or returns defaults if the
    /// file is missing or malformed (malformed files are logged, not fatal).
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("{} not found, using default config", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("Config loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// True when a real vision backend credential is present.
    pub fn backend_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
