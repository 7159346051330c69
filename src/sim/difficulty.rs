//! Difficulty ramp
//!
//! Recomputed from elapsed session time every tick. Both curves are linear
//! and uncapped.

use crate::tuning::Tuning;

/// Spawn rate and fall speed at a point in the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Spawns per second
    pub spawn_rate: f32,
    /// Fall speed for new spawns (px/s)
    pub fall_speed: f32,
}

impl Difficulty {
    pub fn at(tuning: &Tuning, elapsed_secs: f32) -> Self {
        Self {
            spawn_rate: tuning.initial_spawn_rate + tuning.spawn_rate_increase * elapsed_secs,
            fall_speed: tuning.initial_fall_speed + tuning.fall_speed_increase * elapsed_secs,
        }
    }

    /// Milliseconds between spawns
    pub fn spawn_interval_ms(&self) -> f64 {
        1000.0 / self.spawn_rate as f64
    }

    /// Fall speed for the next spawn, slowed while the clock is active
    pub fn effective_fall_speed(&self, slow_motion: bool, slow_motion_factor: f32) -> f32 {
        if slow_motion {
            self.fall_speed * slow_motion_factor
        } else {
            self.fall_speed
        }
    }
}
