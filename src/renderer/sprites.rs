//! Sprite list and placeholder art
//!
//! Turns the game state into an ordered list of textured quads. When a
//! texture image is missing the canvas draws the placeholder shape described
//! here instead.

use glam::Vec2;

use crate::consts::PLAYER_SIZE;
use crate::sim::{FallingEntity, GameState};

/// Texture keys that are not entity kinds
pub const PLAYER_KEY: &str = "player";
pub const SHIELD_AURA_KEY: &str = "shield-aura";

/// Every key the atlas tries to load
pub const TEXTURE_KEYS: [&str; 7] = [
    PLAYER_KEY,
    "giwa",
    "item-chest",
    "item-shoes",
    "item-shield",
    "item-clock",
    SHIELD_AURA_KEY,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect,
    RoundRect { radius: f32 },
    Circle,
    Ellipse { rx: f32, ry: f32 },
}

/// Generated stand-in for a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placeholder {
    pub shape: Shape,
    /// CSS colour
    pub fill: &'static str,
    /// Outline colour and width
    pub stroke: Option<(&'static str, f32)>,
    /// Character drawn on top
    pub glyph: Option<&'static str>,
}

impl Placeholder {
    pub fn for_key(key: &str) -> Placeholder {
        let plain = |shape, fill| Placeholder {
            shape,
            fill,
            stroke: None,
            glyph: None,
        };
        match key {
            PLAYER_KEY => plain(Shape::Rect, "#00bfff"),
            "giwa" => Placeholder {
                glyph: Some("瓦"),
                ..plain(Shape::RoundRect { radius: 4.0 }, "#ff4444")
            },
            "item-chest" => Placeholder {
                stroke: Some(("#000000", 2.0)),
                ..plain(Shape::Rect, "#ffd700")
            },
            "item-shoes" => plain(Shape::Ellipse { rx: 14.0, ry: 14.0 }, "#00ff00"),
            "item-shield" => plain(Shape::Circle, "#00ffff"),
            "item-clock" => Placeholder {
                stroke: Some(("#ffffff", 2.0)),
                ..plain(Shape::Circle, "#ff00ff")
            },
            SHIELD_AURA_KEY => Placeholder {
                stroke: Some(("#00ffff", 3.0)),
                ..plain(Shape::Circle, "rgba(0, 255, 255, 0.15)")
            },
            _ => plain(Shape::Rect, "#ff00ff"),
        }
    }
}

/// One quad to draw, centred on `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub key: &'static str,
    pub center: Vec2,
    pub size: Vec2,
    pub alpha: f32,
}

impl Sprite {
    fn entity(entity: &FallingEntity) -> Self {
        Self {
            key: entity.kind.texture_key(),
            center: entity.pos,
            size: entity.kind.size(),
            alpha: 1.0,
        }
    }
}

/// Back-to-front draw order: items, giwa, player, shield aura
pub fn sprites(state: &GameState) -> Vec<Sprite> {
    let Some(session) = state.session.as_ref() else {
        return Vec::new();
    };

    let mut list: Vec<Sprite> = session
        .items
        .active()
        .chain(session.obstacles.active())
        .map(Sprite::entity)
        .collect();

    list.push(Sprite {
        key: PLAYER_KEY,
        center: session.player.pos,
        size: PLAYER_SIZE,
        alpha: if state.ledger.power_ups.speed_boost { 0.85 } else { 1.0 },
    });

    if state.ledger.power_ups.shield {
        list.push(Sprite {
            key: SHIELD_AURA_KEY,
            center: session.player.pos,
            size: PLAYER_SIZE * 1.6,
            alpha: 1.0,
        });
    }

    list
}
