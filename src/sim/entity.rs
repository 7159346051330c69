//! Falling entities and their collision bodies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;
use crate::consts::{GIWA_SIZE, ITEM_SIZE};

/// Collectible item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Flat score bonus
    Chest,
    /// Speed boost
    Shoes,
    /// Temporary invulnerability
    Shield,
    /// Slow motion for new spawns
    Clock,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Chest,
        ItemKind::Shoes,
        ItemKind::Shield,
        ItemKind::Clock,
    ];

    /// Timed effect granted by this item, if any
    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            ItemKind::Chest => None,
            ItemKind::Shoes => Some(PowerUpKind::SpeedBoost),
            ItemKind::Shield => Some(PowerUpKind::Shield),
            ItemKind::Clock => Some(PowerUpKind::SlowMotion),
        }
    }

    /// Texture key used by the renderer
    pub fn texture_key(self) -> &'static str {
        match self {
            ItemKind::Chest => "item-chest",
            ItemKind::Shoes => "item-shoes",
            ItemKind::Shield => "item-shield",
            ItemKind::Clock => "item-clock",
        }
    }
}

/// What a falling entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A giwa tile - ends the run unless shielded
    Obstacle,
    Item(ItemKind),
}

impl EntityKind {
    /// Collision body size
    pub fn size(self) -> Vec2 {
        match self {
            EntityKind::Obstacle => GIWA_SIZE,
            EntityKind::Item(_) => ITEM_SIZE,
        }
    }

    pub fn texture_key(self) -> &'static str {
        match self {
            EntityKind::Obstacle => "giwa",
            EntityKind::Item(item) => item.texture_key(),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap: boxes that only touch along an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// A pooled falling object (giwa or item)
#[derive(Debug, Clone, PartialEq)]
pub struct FallingEntity {
    /// Spawn serial; changes every time the slot is reused
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Fall speed (px/s), fixed at spawn
    pub vel_y: f32,
    pub active: bool,
}

impl FallingEntity {
    /// An inactive placeholder waiting in the pool
    pub fn dormant(kind: EntityKind) -> Self {
        Self {
            id: 0,
            kind,
            pos: Vec2::ZERO,
            vel_y: 0.0,
            active: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.kind.size())
    }

    /// Return to the pool
    pub fn deactivate(&mut self) {
        self.active = false;
        self.vel_y = 0.0;
    }

    /// The item type, for item entities
    pub fn item_kind(&self) -> Option<ItemKind> {
        match self.kind {
            EntityKind::Item(kind) => Some(kind),
            EntityKind::Obstacle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(40.0, 40.0));
        let b = Aabb::new(Vec2::new(130.0, 100.0), Vec2::new(30.0, 30.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let far = Aabb::new(Vec2::new(200.0, 100.0), Vec2::new(30.0, 30.0));
        assert!(!a.overlaps(&far));
    }

    #[test]
    fn test_aabb_touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(40.0, 40.0));
        // a spans x in [-20, 20]; b spans [20, 50]
        let b = Aabb::new(Vec2::new(35.0, 0.0), Vec2::new(30.0, 30.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_item_power_ups() {
        assert_eq!(ItemKind::Chest.power_up(), None);
        assert_eq!(ItemKind::Shoes.power_up(), Some(PowerUpKind::SpeedBoost));
        assert_eq!(ItemKind::Shield.power_up(), Some(PowerUpKind::Shield));
        assert_eq!(ItemKind::Clock.power_up(), Some(PowerUpKind::SlowMotion));
    }

    #[test]
    fn test_deactivate_stops_motion() {
        let mut giwa = FallingEntity::dormant(EntityKind::Obstacle);
        giwa.active = true;
        giwa.vel_y = 150.0;
        giwa.deactivate();
        assert!(!giwa.active);
        assert_eq!(giwa.vel_y, 0.0);
    }
}
