//! Spawn cadence and spawn-kind selection

use rand::Rng;
use rand::seq::IndexedRandom;

use super::difficulty::Difficulty;
use super::entity::{EntityKind, ItemKind};

/// Tracks when the last spawn happened on the session clock
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnScheduler {
    last_spawn_ms: f64,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_spawn_ms(&self) -> f64 {
        self.last_spawn_ms
    }

    /// Returns true (and restarts the interval) when a spawn is due
    ///
    /// At most one spawn per call: a long frame never produces a backlog.
    /// The boundary is inclusive, so a clock stepped in whole milliseconds
    /// spawns at exactly 1000, 2000, ... at a rate of 1/s.
    pub fn due(&mut self, now_ms: f64, difficulty: &Difficulty) -> bool {
        if now_ms - self.last_spawn_ms >= difficulty.spawn_interval_ms() {
            self.last_spawn_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Pick what to spawn: an item with probability `item_chance`, else a giwa
    pub fn roll<R: Rng>(rng: &mut R, item_chance: f64) -> EntityKind {
        if rng.random_bool(item_chance) {
            let kind = ItemKind::ALL
                .choose(rng)
                .copied()
                .unwrap_or(ItemKind::Chest);
            EntityKind::Item(kind)
        } else {
            EntityKind::Obstacle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_one_spawn_per_second_at_start() {
        let tuning = Tuning {
            spawn_rate_increase: 0.0,
            ..Default::default()
        };
        let difficulty = Difficulty::at(&tuning, 0.0);
        let mut scheduler = SpawnScheduler::new();

        let spawn_times: Vec<f64> = (1..=5000)
            .map(|ms| ms as f64)
            .filter(|&now| scheduler.due(now, &difficulty))
            .collect();
        assert_eq!(spawn_times, vec![1000.0, 2000.0, 3000.0, 4000.0, 5000.0]);
    }

    #[test]
    fn test_no_catch_up_after_long_frame() {
        let difficulty = Difficulty::at(&Tuning::default(), 0.0);
        let mut scheduler = SpawnScheduler::new();

        // Five intervals pass in one frame: still a single spawn
        assert!(scheduler.due(5000.0, &difficulty));
        assert!(!scheduler.due(5016.0, &difficulty));
        assert_eq!(scheduler.last_spawn_ms(), 5000.0);
    }

    #[test]
    fn test_roll_respects_item_chance() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(SpawnScheduler::roll(&mut rng, 0.0), EntityKind::Obstacle);
            assert!(matches!(SpawnScheduler::roll(&mut rng, 1.0), EntityKind::Item(_)));
        }
    }

    #[test]
    fn test_roll_distribution() {
        let mut rng = Pcg32::seed_from_u64(99);
        let rolls = 10_000;
        let mut items = 0;
        let mut seen = std::collections::HashSet::new();
        for _ in 0..rolls {
            if let EntityKind::Item(kind) = SpawnScheduler::roll(&mut rng, 0.2) {
                items += 1;
                seen.insert(kind);
            }
        }
        // 20% +- a generous margin
        assert!((1500..2500).contains(&items), "items = {items}");
        assert_eq!(seen.len(), ItemKind::ALL.len());
    }
}
