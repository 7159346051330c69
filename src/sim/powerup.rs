//! Timed power-up effects
//!
//! Each kind has at most one pending revert. Arming a kind that is already
//! pending replaces its deadline, so an older timer can never end a refreshed
//! effect early.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Timed effects granted by items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    SpeedBoost,
    SlowMotion,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Shield,
        PowerUpKind::SpeedBoost,
        PowerUpKind::SlowMotion,
    ];

    /// Effect length (ms)
    pub fn duration_ms(self, tuning: &Tuning) -> f64 {
        match self {
            PowerUpKind::Shield => tuning.shield_duration_ms,
            PowerUpKind::SpeedBoost => tuning.speed_boost_duration_ms,
            PowerUpKind::SlowMotion => tuning.slow_motion_duration_ms,
        }
    }

    fn index(self) -> usize {
        match self {
            PowerUpKind::Shield => 0,
            PowerUpKind::SpeedBoost => 1,
            PowerUpKind::SlowMotion => 2,
        }
    }
}

/// Currently active effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUps {
    pub shield: bool,
    pub speed_boost: bool,
    pub slow_motion: bool,
}

impl PowerUps {
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Shield => self.shield,
            PowerUpKind::SpeedBoost => self.speed_boost,
            PowerUpKind::SlowMotion => self.slow_motion,
        }
    }

    pub fn set(&mut self, kind: PowerUpKind, active: bool) {
        match kind {
            PowerUpKind::Shield => self.shield = active,
            PowerUpKind::SpeedBoost => self.speed_boost = active,
            PowerUpKind::SlowMotion => self.slow_motion = active,
        }
    }
}

/// Pending revert deadlines on the session clock, one slot per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerUpTimers {
    deadlines: [Option<f64>; 3],
}

impl PowerUpTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the revert for `kind`, superseding any pending one
    pub fn arm(&mut self, kind: PowerUpKind, now_ms: f64, duration_ms: f64) {
        let slot = &mut self.deadlines[kind.index()];
        if let Some(previous) = slot.replace(now_ms + duration_ms) {
            log::debug!(
                "{:?} refreshed: revert moved from {:.0}ms to {:.0}ms",
                kind,
                previous,
                now_ms + duration_ms
            );
        }
    }

    pub fn clear(&mut self) {
        self.deadlines = [None; 3];
    }

    /// Deadline of the pending revert for `kind`
    pub fn pending(&self, kind: PowerUpKind) -> Option<f64> {
        self.deadlines[kind.index()]
    }

    /// Remove and return every kind whose deadline has been reached
    pub fn take_expired(&mut self, now_ms: f64) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = &mut self.deadlines[kind.index()];
            if slot.is_some_and(|deadline| deadline <= now_ms) {
                *slot = None;
                expired.push(kind);
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_exactly_at_deadline() {
        let mut timers = PowerUpTimers::new();
        timers.arm(PowerUpKind::SpeedBoost, 1000.0, 7000.0);

        assert!(timers.take_expired(7999.0).is_empty());
        assert_eq!(timers.take_expired(8000.0), vec![PowerUpKind::SpeedBoost]);
        assert!(timers.take_expired(9000.0).is_empty());
    }

    #[test]
    fn test_rearm_supersedes_stale_deadline() {
        let mut timers = PowerUpTimers::new();
        timers.arm(PowerUpKind::Shield, 0.0, 2000.0);
        timers.arm(PowerUpKind::Shield, 1500.0, 2000.0);

        // The first deadline (2000) no longer fires
        assert!(timers.take_expired(2000.0).is_empty());
        assert_eq!(timers.pending(PowerUpKind::Shield), Some(3500.0));
        assert_eq!(timers.take_expired(3500.0), vec![PowerUpKind::Shield]);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut timers = PowerUpTimers::new();
        timers.arm(PowerUpKind::Shield, 0.0, 2000.0);
        timers.arm(PowerUpKind::SlowMotion, 0.0, 3000.0);

        assert_eq!(timers.take_expired(2500.0), vec![PowerUpKind::Shield]);
        assert_eq!(timers.pending(PowerUpKind::SlowMotion), Some(3000.0));
    }

    #[test]
    fn test_clear_drops_all_deadlines() {
        let mut timers = PowerUpTimers::new();
        timers.arm(PowerUpKind::Shield, 0.0, 2000.0);
        timers.arm(PowerUpKind::SpeedBoost, 0.0, 10.0);
        timers.clear();
        assert!(timers.take_expired(f64::MAX).is_empty());
    }

    #[test]
    fn test_power_up_flags() {
        let mut flags = PowerUps::default();
        flags.set(PowerUpKind::SlowMotion, true);
        assert!(flags.is_active(PowerUpKind::SlowMotion));
        assert!(!flags.is_active(PowerUpKind::Shield));
    }
}
