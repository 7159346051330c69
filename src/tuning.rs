//! Data-driven game balance
//!
//! Every number that shapes a run lives here so it can be overridden from JSON
//! without a rebuild. Missing fields fall back to the shipped defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, SPAWN_MARGIN_X};

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Player ===
    /// Max horizontal speed (px/s)
    pub player_speed: f32,
    /// Max horizontal speed while the shoes are active (px/s)
    pub player_speed_boosted: f32,
    /// Horizontal acceleration while a direction is held (px/s²)
    pub player_acceleration: f32,
    /// Deceleration when no direction is held (px/s²)
    pub player_drag: f32,

    // === Difficulty ramp ===
    /// Spawns per second at t = 0
    pub initial_spawn_rate: f32,
    /// Fall speed at t = 0 (px/s)
    pub initial_fall_speed: f32,
    /// Added to the spawn rate per elapsed second
    pub spawn_rate_increase: f32,
    /// Added to the fall speed per elapsed second
    pub fall_speed_increase: f32,

    // === Items ===
    /// Probability that a spawn is an item instead of a giwa
    pub item_spawn_chance: f64,
    /// Flat bonus for a chest
    pub chest_score: f64,

    // === Power-up durations (ms) ===
    pub shield_duration_ms: f64,
    pub speed_boost_duration_ms: f64,
    pub slow_motion_duration_ms: f64,
    /// Fall speed multiplier for new spawns during slow motion
    pub slow_motion_factor: f32,

    // === Scoring ===
    /// Passive score per second of play
    pub score_per_tick: f64,
    /// Vertical distance below which a passing giwa counts as a near miss
    pub near_miss_distance: f32,
    /// Horizontal band for a near miss
    pub near_miss_band: f32,
    /// Max gap between near misses that keeps the combo alive (ms)
    pub near_miss_combo_window_ms: f64,
    /// Geometric growth of the near-miss award per combo step
    pub near_miss_combo_multiplier: f64,
    /// Award for the first near miss of a chain
    pub near_miss_base_score: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            player_speed: 300.0,
            player_speed_boosted: 450.0,
            player_acceleration: 1200.0,
            player_drag: 800.0,

            initial_spawn_rate: 1.0,
            initial_fall_speed: 150.0,
            spawn_rate_increase: 0.05,
            fall_speed_increase: 3.0,

            item_spawn_chance: 0.2,
            chest_score: 500.0,

            shield_duration_ms: 2000.0,
            speed_boost_duration_ms: 7000.0,
            slow_motion_duration_ms: 3000.0,
            slow_motion_factor: 0.8,

            score_per_tick: 10.0,
            near_miss_distance: 60.0,
            near_miss_band: 50.0,
            near_miss_combo_window_ms: 2000.0,
            near_miss_combo_multiplier: 1.5,
            near_miss_base_score: 100.0,
        }
    }
}

/// Reasons a tuning file can be rejected
#[derive(Debug)]
pub enum TuningError {
    /// The JSON could not be parsed
    Parse(serde_json::Error),
    /// A field parsed but its value makes no sense
    InvalidValue { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "tuning parse error: {err}"),
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid tuning value for `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl Tuning {
    /// Parse and validate a tuning override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize for logging or export
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::InvalidValue { field, reason })
        }

        if self.screen_width <= 2.0 * SPAWN_MARGIN_X {
            return invalid("screen_width", "must leave room for the spawn margins");
        }
        if self.screen_height <= 0.0 {
            return invalid("screen_height", "must be positive");
        }
        if self.player_speed <= 0.0 || self.player_speed_boosted < self.player_speed {
            return invalid("player_speed_boosted", "must be at least player_speed (> 0)");
        }
        if self.initial_spawn_rate <= 0.0 {
            return invalid("initial_spawn_rate", "must be positive");
        }
        if self.spawn_rate_increase < 0.0 || self.fall_speed_increase < 0.0 {
            return invalid("spawn_rate_increase", "difficulty must not decrease over time");
        }
        if !(0.0..=1.0).contains(&self.item_spawn_chance) {
            return invalid("item_spawn_chance", "must be a probability");
        }
        if !(self.slow_motion_factor > 0.0 && self.slow_motion_factor <= 1.0) {
            return invalid("slow_motion_factor", "must be in (0, 1]");
        }
        if self.near_miss_combo_multiplier < 1.0 {
            return invalid("near_miss_combo_multiplier", "combo awards must not shrink");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let tuning = Tuning::from_json(r#"{ "chest_score": 750.0 }"#).unwrap();
        assert_eq!(tuning.chest_score, 750.0);
        assert_eq!(tuning.initial_spawn_rate, 1.0);
        assert_eq!(tuning.shield_duration_ms, 2000.0);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "item_spawn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::InvalidValue {
                field: "item_spawn_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("tuning parse error"));
    }

    #[test]
    fn test_json_export_reloads() {
        let tuning = Tuning {
            slow_motion_factor: 0.5,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
