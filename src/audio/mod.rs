//! Sound cues
//!
//! Which cue a game event plays is decided here so it can be tested off the
//! browser. Playback itself uses the Web Audio API and only exists on wasm32.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

use crate::sim::{GameEvent, ItemKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Session started
    Start,
    /// Chest picked up
    Coin,
    /// Power-up item picked up
    PowerUp,
    /// Giwa bounced off the shield
    ShieldBlock,
    /// Near miss; the combo raises the pitch
    NearMiss { combo: u32 },
    /// A timed power-up wore off
    PowerUpEnd,
    /// Run ended
    GameOver,
    /// Run ended with a new high score
    HighScore,
    /// Points claimed to the wallet
    Claim,
}

impl SoundEffect {
    /// Cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::SessionStarted => Some(SoundEffect::Start),
            GameEvent::Spawned { .. } => None,
            GameEvent::NearMiss { combo, .. } => Some(SoundEffect::NearMiss { combo: *combo }),
            GameEvent::ItemCollected { kind: ItemKind::Chest } => Some(SoundEffect::Coin),
            GameEvent::ItemCollected { .. } => Some(SoundEffect::PowerUp),
            GameEvent::ShieldBlocked => Some(SoundEffect::ShieldBlock),
            GameEvent::PowerUpExpired { .. } => Some(SoundEffect::PowerUpEnd),
            GameEvent::GameOver {
                new_high_score: true,
                ..
            } => Some(SoundEffect::HighScore),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::PointsClaimed { .. } => Some(SoundEffect::Claim),
        }
    }

    /// Minimum gap before the same cue may play again (ms)
    ///
    /// The shield reports a block on every tick a giwa overlaps the player.
    pub fn cooldown_ms(self) -> f64 {
        match self {
            SoundEffect::ShieldBlock => 250.0,
            SoundEffect::PowerUpEnd => 100.0,
            _ => 0.0,
        }
    }
}
