//! Rendering module
//!
//! `sprites` builds the draw list from game state and is platform-free.
//! `canvas` draws it with the Canvas 2D API.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod sprites;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, SpriteAtlas};
pub use sprites::{Placeholder, Shape, Sprite, sprites};
