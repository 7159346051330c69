//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Time only arrives as a frame delta
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering, audio or DOM dependencies

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod player;
pub mod pool;
pub mod powerup;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{NearMissTracker, first_item_hit, first_obstacle_hit, is_near_miss};
pub use difficulty::Difficulty;
pub use entity::{Aabb, EntityKind, FallingEntity, ItemKind};
pub use player::{MoveIntent, Player, PointerEvent};
pub use pool::EntityPool;
pub use powerup::{PowerUpKind, PowerUpTimers, PowerUps};
pub use score::ScoreLedger;
pub use spawn::SpawnScheduler;
pub use state::{GameEvent, GameState, GameStatus, Session, SessionClock};
pub use tick::{TickInput, autopilot_intent, tick};
