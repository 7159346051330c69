//! Giwa Dodge - dodge falling roof tiles, grab power-ups, chain near misses
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, spawning, collisions, scoring)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `ui`: HUD snapshot and localized strings
//! - `wallet`: Placeholder wallet connection and point claiming
//! - `audio`: Sound cues for game events (Web Audio playback on wasm32)
//! - `renderer`: Sprite list plus Canvas 2D drawing on wasm32

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;
pub mod wallet;

pub use settings::{Locale, Settings};
pub use tuning::{Tuning, TuningError};
pub use wallet::{Wallet, WalletError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Frame length used by headless runs (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta fed to the simulation (tab switches, debugger stops)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Collision body sizes (match the generated placeholder textures)
    pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 40.0);
    pub const GIWA_SIZE: Vec2 = Vec2::new(50.0, 30.0);
    pub const ITEM_SIZE: Vec2 = Vec2::new(30.0, 30.0);

    /// Player sits this far above the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 50.0;

    /// Spawned entities start here, above the visible area
    pub const SPAWN_Y: f32 = -20.0;
    /// Horizontal spawn margin from each screen edge
    pub const SPAWN_MARGIN_X: f32 = 30.0;
    /// Entities are culled once this far below the bottom edge
    pub const CULL_MARGIN: f32 = 50.0;

    /// Initial pool capacities
    pub const GIWA_POOL_SIZE: usize = 50;
    pub const ITEM_POOL_SIZE: usize = 20;
}

/// Horizontal/vertical distance between two points, as absolute values
#[inline]
pub fn axis_distance(a: Vec2, b: Vec2) -> Vec2 {
    (a - b).abs()
}

/// Move `value` toward zero by `amount` without crossing it
#[inline]
pub fn approach_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else {
        (value + amount).min(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_zero_does_not_overshoot() {
        assert_eq!(approach_zero(5.0, 10.0), 0.0);
        assert_eq!(approach_zero(-5.0, 10.0), 0.0);
        assert_eq!(approach_zero(20.0, 5.0), 15.0);
        assert_eq!(approach_zero(-20.0, 5.0), -15.0);
    }

    #[test]
    fn test_axis_distance() {
        let d = axis_distance(Vec2::new(10.0, 50.0), Vec2::new(40.0, 20.0));
        assert_eq!(d, Vec2::new(30.0, 30.0));
    }
}
