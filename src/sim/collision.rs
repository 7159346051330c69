//! Overlap tests and near-miss detection
//!
//! Only active entities are ever considered. Scans stop at the first hit so
//! at most one obstacle and one item resolve per tick.

use std::collections::HashSet;

use super::entity::{FallingEntity, ItemKind};
use super::player::Player;
use super::pool::EntityPool;
use crate::axis_distance;
use crate::tuning::Tuning;

/// First active obstacle overlapping the player
pub fn first_obstacle_hit(player: &Player, obstacles: &EntityPool) -> Option<u32> {
    let body = player.bounds();
    obstacles
        .active()
        .find(|giwa| body.overlaps(&giwa.bounds()))
        .map(|giwa| giwa.id)
}

/// First active item overlapping the player
pub fn first_item_hit(player: &Player, items: &EntityPool) -> Option<(u32, ItemKind)> {
    let body = player.bounds();
    items
        .active()
        .filter(|item| body.overlaps(&item.bounds()))
        .find_map(|item| item.item_kind().map(|kind| (item.id, kind)))
}

/// True when `giwa` is inside the near-miss band around the player
pub fn is_near_miss(player: &Player, giwa: &FallingEntity, tuning: &Tuning) -> bool {
    let d = axis_distance(giwa.pos, player.pos);
    d.y < tuning.near_miss_distance && d.x < tuning.near_miss_band
}

/// Obstacles already credited for a near miss during their current pass
#[derive(Debug, Clone, Default)]
pub struct NearMissTracker {
    credited: HashSet<u32>,
}

impl NearMissTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_credited(&self, id: u32) -> bool {
        self.credited.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.credited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credited.is_empty()
    }

    pub fn clear(&mut self) {
        self.credited.clear();
    }

    /// Credit at most one uncredited obstacle in the band, then prune
    /// entries for obstacles that are no longer active
    pub fn check(&mut self, player: &Player, obstacles: &EntityPool, tuning: &Tuning) -> Option<u32> {
        let credited = obstacles
            .active()
            .filter(|giwa| !self.credited.contains(&giwa.id))
            .find(|giwa| is_near_miss(player, giwa, tuning))
            .map(|giwa| giwa.id);

        if let Some(id) = credited {
            self.credited.insert(id);
        }
        self.prune(obstacles);
        credited
    }

    /// Forget obstacles that have left the active set
    pub fn prune(&mut self, obstacles: &EntityPool) {
        self.credited.retain(|&id| obstacles.is_active(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use crate::sim::score::ScoreLedger;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_obstacle_hit_and_miss() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        let mut pool = EntityPool::new(4, EntityKind::Obstacle);
        let mut rng = Pcg32::seed_from_u64(3);

        let id = pool.spawn(&mut rng, EntityKind::Obstacle, 570.0, 800.0).id;
        // Falls from -20 to 550 in one second, at a random x
        pool.update(1.0, 600.0);
        let giwa_x = pool.get(id).unwrap().pos.x;

        let mut centered = player.clone();
        centered.pos.x = giwa_x;
        assert_eq!(first_obstacle_hit(&centered, &pool), Some(id));

        let mut away = player.clone();
        away.pos.x = if giwa_x > 400.0 { giwa_x - 100.0 } else { giwa_x + 100.0 };
        assert_eq!(first_obstacle_hit(&away, &pool), None);
    }

    #[test]
    fn test_item_hit_reports_kind() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut pool = EntityPool::new(2, EntityKind::Item(ItemKind::Chest));
        let mut rng = Pcg32::seed_from_u64(4);

        let id = pool
            .spawn(&mut rng, EntityKind::Item(ItemKind::Shield), 570.0, 800.0)
            .id;
        pool.update(1.0, 600.0);
        player.pos.x = pool.get(id).unwrap().pos.x + 10.0;

        assert_eq!(first_item_hit(&player, &pool), Some((id, ItemKind::Shield)));
        pool.deactivate(id);
        assert_eq!(first_item_hit(&player, &pool), None);
    }

    #[test]
    fn test_near_miss_credited_once_per_pass() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut pool = EntityPool::new(2, EntityKind::Obstacle);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut tracker = NearMissTracker::new();

        // -20 + 530 = 510: 40px above the player at y = 550
        let id = pool.spawn(&mut rng, EntityKind::Obstacle, 530.0, 800.0).id;
        pool.update(1.0, 600.0);
        player.pos.x = pool.get(id).unwrap().pos.x + 47.0;

        assert_eq!(tracker.check(&player, &pool, &tuning), Some(id));
        assert!(tracker.is_credited(id));
        // Still in the band next tick: no second credit
        assert_eq!(tracker.check(&player, &pool, &tuning), None);

        // Leaves the active set: entry pruned
        pool.deactivate(id);
        assert_eq!(tracker.check(&player, &pool, &tuning), None);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_reused_slot_can_be_credited_again() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut pool = EntityPool::new(1, EntityKind::Obstacle);
        let mut rng = Pcg32::seed_from_u64(9);
        let mut tracker = NearMissTracker::new();
        let mut ledger = ScoreLedger::new();

        let first = pool.spawn(&mut rng, EntityKind::Obstacle, 530.0, 800.0).id;
        pool.update(1.0, 600.0);
        player.pos.x = pool.get(first).unwrap().pos.x + 47.0;
        assert_eq!(tracker.check(&player, &pool, &tuning), Some(first));
        ledger.credit_near_miss(1000.0, &tuning);

        // Same slot, new giwa
        pool.deactivate(first);
        let second = pool.spawn(&mut rng, EntityKind::Obstacle, 530.0, 800.0).id;
        assert_ne!(second, first);
        assert_eq!(pool.capacity(), 1);
        pool.update(1.0, 600.0);
        player.pos.x = pool.get(second).unwrap().pos.x + 47.0;

        assert_eq!(tracker.check(&player, &pool, &tuning), Some(second));
        ledger.credit_near_miss(1500.0, &tuning);
        assert_eq!(ledger.combo, 2);
        assert!(!tracker.is_credited(first));
    }

    #[test]
    fn test_near_miss_outside_band() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut pool = EntityPool::new(2, EntityKind::Obstacle);
        let mut rng = Pcg32::seed_from_u64(6);
        let mut tracker = NearMissTracker::new();

        let id = pool.spawn(&mut rng, EntityKind::Obstacle, 530.0, 800.0).id;
        pool.update(1.0, 600.0);
        player.pos.x = pool.get(id).unwrap().pos.x + 55.0;
        assert_eq!(tracker.check(&player, &pool, &tuning), None);

        // Too high above the player
        player.pos.x -= 10.0;
        player.pos.y = 510.0 + 60.0;
        assert_eq!(tracker.check(&player, &pool, &tuning), None);
    }

    #[test]
    fn test_only_one_near_miss_per_check() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut pool = EntityPool::new(2, EntityKind::Obstacle);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut tracker = NearMissTracker::new();

        pool.spawn(&mut rng, EntityKind::Obstacle, 530.0, 800.0);
        pool.spawn(&mut rng, EntityKind::Obstacle, 530.0, 800.0);
        pool.update(1.0, 600.0);

        // Band wide enough to cover both
        let wide = Tuning {
            near_miss_band: 1000.0,
            ..tuning
        };
        player.pos.x = 400.0;
        assert!(tracker.check(&player, &pool, &wide).is_some());
        assert_eq!(tracker.len(), 1);
        assert!(tracker.check(&player, &pool, &wide).is_some());
        assert_eq!(tracker.len(), 2);
    }
}
