//! Reusable store for falling entities
//!
//! Entities are allocated once and recycled by toggling `active`. The backing
//! list only grows (when a spawn finds no free slot) and never shrinks.

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityKind, FallingEntity};
use crate::consts::{CULL_MARGIN, SPAWN_MARGIN_X, SPAWN_Y};

/// A growable pool of falling entities
#[derive(Debug, Clone)]
pub struct EntityPool {
    entities: Vec<FallingEntity>,
    /// Kind given to freshly allocated dormant slots
    dormant_kind: EntityKind,
    next_id: u32,
}

impl EntityPool {
    /// Pre-allocate `capacity` inactive entities
    pub fn new(capacity: usize, dormant_kind: EntityKind) -> Self {
        Self {
            entities: vec![FallingEntity::dormant(dormant_kind); capacity],
            dormant_kind,
            next_id: 1,
        }
    }

    /// Activate one entity at a random x above the screen
    ///
    /// Reuses the first inactive slot; appends a new one when the pool is
    /// exhausted.
    pub fn spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        kind: EntityKind,
        speed: f32,
        screen_width: f32,
    ) -> &FallingEntity {
        let slot = match self.entities.iter().position(|e| !e.active) {
            Some(slot) => slot,
            None => {
                self.entities.push(FallingEntity::dormant(self.dormant_kind));
                log::debug!(
                    "{:?} pool exhausted, grew to {}",
                    self.dormant_kind,
                    self.entities.len()
                );
                self.entities.len() - 1
            }
        };

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);

        let x = rng.random_range(SPAWN_MARGIN_X..=screen_width - SPAWN_MARGIN_X);
        let entity = &mut self.entities[slot];
        entity.id = id;
        entity.kind = kind;
        entity.pos = Vec2::new(x, SPAWN_Y);
        entity.vel_y = speed;
        entity.active = true;
        entity
    }

    /// Active entities in slot order
    pub fn active(&self) -> impl Iterator<Item = &FallingEntity> {
        self.entities.iter().filter(|e| e.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn is_active(&self, id: u32) -> bool {
        self.active().any(|e| e.id == id)
    }

    pub fn get(&self, id: u32) -> Option<&FallingEntity> {
        self.active().find(|e| e.id == id)
    }

    /// Size of the backing store
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// Return a single entity to the pool; false if it was not active
    pub fn deactivate(&mut self, id: u32) -> bool {
        match self.entities.iter_mut().find(|e| e.active && e.id == id) {
            Some(entity) => {
                entity.deactivate();
                true
            }
            None => false,
        }
    }

    /// Deactivate everything
    pub fn clear(&mut self) {
        self.entities.iter_mut().for_each(FallingEntity::deactivate);
    }

    /// Advance active entities and cull those below the screen
    pub fn update(&mut self, dt_secs: f32, screen_height: f32) {
        let cull_y = screen_height + CULL_MARGIN;
        for entity in self.entities.iter_mut().filter(|e| e.active) {
            entity.pos.y += entity.vel_y * dt_secs;
            if entity.pos.y > cull_y {
                entity.deactivate();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::ItemKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_spawn_reuses_inactive_slot() {
        let mut pool = EntityPool::new(2, EntityKind::Obstacle);
        let mut rng = rng();
        let first = pool.spawn(&mut rng, EntityKind::Obstacle, 150.0, 800.0).id;
        pool.deactivate(first);
        pool.spawn(&mut rng, EntityKind::Obstacle, 150.0, 800.0);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_spawn_grows_when_exhausted() {
        let mut pool = EntityPool::new(2, EntityKind::Obstacle);
        let mut rng = rng();
        for _ in 0..3 {
            pool.spawn(&mut rng, EntityKind::Obstacle, 150.0, 800.0);
        }
        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn test_spawn_position_and_speed() {
        let mut pool = EntityPool::new(20, EntityKind::Item(ItemKind::Chest));
        let mut rng = rng();
        for _ in 0..20 {
            let item = pool.spawn(&mut rng, EntityKind::Item(ItemKind::Clock), 120.0, 800.0);
            assert!(item.pos.x >= 30.0 && item.pos.x <= 770.0);
            assert_eq!(item.pos.y, -20.0);
            assert_eq!(item.vel_y, 120.0);
            assert_eq!(item.item_kind(), Some(ItemKind::Clock));
        }
    }

    #[test]
    fn test_reused_slot_gets_new_id() {
        let mut pool = EntityPool::new(1, EntityKind::Obstacle);
        let mut rng = rng();
        let first = pool.spawn(&mut rng, EntityKind::Obstacle, 150.0, 800.0).id;
        pool.clear();
        let second = pool.spawn(&mut rng, EntityKind::Obstacle, 150.0, 800.0).id;
        assert_ne!(first, second);
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn test_update_culls_off_screen() {
        let mut pool = EntityPool::new(1, EntityKind::Obstacle);
        let mut rng = rng();
        let id = pool.spawn(&mut rng, EntityKind::Obstacle, 100.0, 800.0).id;

        // -20 + 100 * 6.6 = 640: still within the 50px cull margin
        pool.update(6.6, 600.0);
        assert!(pool.is_active(id));

        // 640 + 100 * 0.2 = 660 > 650
        pool.update(0.2, 600.0);
        assert!(!pool.is_active(id));
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn test_deactivate_unknown_id() {
        let mut pool = EntityPool::new(1, EntityKind::Obstacle);
        assert!(!pool.deactivate(42));
    }

    proptest! {
        #[test]
        fn prop_active_never_exceeds_capacity(
            initial in 0usize..8,
            ops in proptest::collection::vec(0u8..3, 1..60),
        ) {
            let mut pool = EntityPool::new(initial, EntityKind::Obstacle);
            let mut rng = rng();
            for op in ops {
                let before = pool.capacity();
                let had_free = pool.active_count() < before;
                match op {
                    0 => {
                        pool.spawn(&mut rng, EntityKind::Obstacle, 200.0, 800.0);
                        // Growth happens only when no inactive slot existed
                        let grew = pool.capacity() > before;
                        prop_assert_eq!(grew, !had_free);
                    }
                    1 => pool.update(0.5, 600.0),
                    _ => {
                        let first = pool.active().next().map(|e| e.id);
                        if let Some(id) = first {
                            pool.deactivate(id);
                        }
                    }
                }
                prop_assert!(pool.active_count() <= pool.capacity());
                prop_assert!(pool.capacity() >= before);
            }
        }
    }
}
