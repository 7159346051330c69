//! Score, combo and power-up ledger
//!
//! The one piece of state every subsystem touches each tick. It is passed
//! explicitly as `&mut ScoreLedger`; nothing reaches it globally.

use serde::{Deserialize, Serialize};

use super::powerup::PowerUps;
use crate::tuning::Tuning;

/// Score state for the current session plus process-lifetime records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreLedger {
    pub score: f64,
    /// Best final score this process has seen
    pub high_score: f64,
    pub combo: u32,
    pub power_ups: PowerUps,
    /// Final scores banked for claiming through the wallet
    pub claimable_points: u64,
    /// Session time of the last near miss (ms)
    last_near_miss_ms: f64,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-session values; records survive
    pub fn reset_session(&mut self) {
        self.score = 0.0;
        self.combo = 0;
        self.power_ups = PowerUps::default();
        self.last_near_miss_ms = 0.0;
    }

    /// Add points; score never decreases
    pub fn add_score(&mut self, points: f64) {
        if points > 0.0 {
            self.score += points;
        }
    }

    pub fn last_near_miss_ms(&self) -> f64 {
        self.last_near_miss_ms
    }

    /// Extend or restart the combo chain and award the near-miss bonus
    ///
    /// Returns the points awarded.
    pub fn credit_near_miss(&mut self, now_ms: f64, tuning: &Tuning) -> f64 {
        if now_ms - self.last_near_miss_ms <= tuning.near_miss_combo_window_ms {
            self.combo += 1;
        } else {
            self.combo = 1;
        }
        self.last_near_miss_ms = now_ms;

        let points = tuning.near_miss_base_score
            * tuning
                .near_miss_combo_multiplier
                .powi(self.combo.saturating_sub(1) as i32);
        self.add_score(points);
        points
    }

    /// Drop the combo once the window passes without a near miss
    pub fn expire_combo(&mut self, now_ms: f64, tuning: &Tuning) -> bool {
        if self.combo > 0 && now_ms - self.last_near_miss_ms > tuning.near_miss_combo_window_ms {
            self.combo = 0;
            true
        } else {
            false
        }
    }

    /// Close the session: record the high score and bank the result
    ///
    /// Returns true when the final score set a new high score.
    pub fn game_over(&mut self) -> bool {
        let new_high = self.score > self.high_score;
        self.high_score = self.high_score.max(self.score);
        self.claimable_points += self.score.floor() as u64;
        self.combo = 0;
        self.power_ups = PowerUps::default();
        new_high
    }

    /// Hand over all banked points
    pub fn take_claimable(&mut self) -> u64 {
        std::mem::take(&mut self.claimable_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_chain_within_window() {
        let tuning = Tuning::default();
        let mut ledger = ScoreLedger::new();

        assert_eq!(ledger.credit_near_miss(500.0, &tuning), 100.0);
        assert_eq!(ledger.combo, 1);
        assert_eq!(ledger.credit_near_miss(2500.0, &tuning), 150.0);
        assert_eq!(ledger.combo, 2);
        assert_eq!(ledger.credit_near_miss(3000.0, &tuning), 225.0);
        assert_eq!(ledger.combo, 3);
        assert_eq!(ledger.score, 475.0);
    }

    #[test]
    fn test_gap_restarts_chain_at_one() {
        let tuning = Tuning::default();
        let mut ledger = ScoreLedger::new();
        ledger.credit_near_miss(1000.0, &tuning);
        ledger.credit_near_miss(1500.0, &tuning);
        ledger.credit_near_miss(2000.0, &tuning);
        assert_eq!(ledger.combo, 3);

        // 2001ms gap: never extends, restarts at 1
        let points = ledger.credit_near_miss(4001.0, &tuning);
        assert_eq!(ledger.combo, 1);
        assert_eq!(points, 100.0);
    }

    #[test]
    fn test_combo_timeout() {
        let tuning = Tuning::default();
        let mut ledger = ScoreLedger::new();
        ledger.credit_near_miss(1000.0, &tuning);

        assert!(!ledger.expire_combo(3000.0, &tuning));
        assert_eq!(ledger.combo, 1);
        assert!(ledger.expire_combo(3001.0, &tuning));
        assert_eq!(ledger.combo, 0);
        // Nothing left to expire
        assert!(!ledger.expire_combo(9000.0, &tuning));
    }

    #[test]
    fn test_game_over_keeps_best() {
        let mut ledger = ScoreLedger::new();
        ledger.add_score(1200.7);
        ledger.power_ups.shield = true;
        assert!(ledger.game_over());
        assert_eq!(ledger.high_score, 1200.7);
        assert_eq!(ledger.claimable_points, 1200);
        assert!(!ledger.power_ups.shield);

        ledger.reset_session();
        ledger.add_score(300.0);
        assert!(!ledger.game_over());
        assert_eq!(ledger.high_score, 1200.7);
        assert_eq!(ledger.claimable_points, 1500);
        assert_eq!(ledger.take_claimable(), 1500);
        assert_eq!(ledger.claimable_points, 0);
    }

    #[test]
    fn test_negative_points_ignored() {
        let mut ledger = ScoreLedger::new();
        ledger.add_score(10.0);
        ledger.add_score(-5.0);
        assert_eq!(ledger.score, 10.0);
    }
}
