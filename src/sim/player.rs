//! Player controller
//!
//! Two input channels drive one horizontal intent: held arrow keys, and a
//! pointer/touch pressed on the left or right half of the screen. Keyboard is
//! resolved first and an active pointer overrides it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Aabb;
use crate::approach_zero;
use crate::consts::{PLAYER_BOTTOM_OFFSET, PLAYER_SIZE};
use crate::tuning::Tuning;

/// Desired horizontal movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveIntent {
    #[default]
    None,
    Left,
    Right,
}

impl MoveIntent {
    /// Intent from held arrow keys (left wins when both are held)
    pub fn from_keys(left: bool, right: bool) -> Self {
        if left {
            MoveIntent::Left
        } else if right {
            MoveIntent::Right
        } else {
            MoveIntent::None
        }
    }

    /// Intent from a pointer position: which half of the screen it is on
    pub fn from_pointer_x(x: f32, screen_width: f32) -> Self {
        if x < screen_width / 2.0 {
            MoveIntent::Left
        } else {
            MoveIntent::Right
        }
    }

    fn sign(self) -> f32 {
        match self {
            MoveIntent::None => 0.0,
            MoveIntent::Left => -1.0,
            MoveIntent::Right => 1.0,
        }
    }
}

/// Pointer/touch events delivered between ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { x: f32 },
    Move { x: f32, is_down: bool },
    Up,
}

/// The player sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Horizontal velocity (px/s)
    pub vel_x: f32,
    /// Horizontal acceleration applied this tick (px/s²)
    pub accel_x: f32,
    /// Current speed cap (px/s)
    pub max_speed: f32,
    pub speed_boost: bool,
    /// Latched pointer intent, cleared on pointer up
    pointer_intent: MoveIntent,
    halted: bool,
}

impl Player {
    /// Centered horizontally, near the bottom edge
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.screen_width / 2.0,
                tuning.screen_height - PLAYER_BOTTOM_OFFSET,
            ),
            vel_x: 0.0,
            accel_x: 0.0,
            max_speed: tuning.player_speed,
            speed_boost: false,
            pointer_intent: MoveIntent::None,
            halted: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, PLAYER_SIZE)
    }

    pub fn pointer_intent(&self) -> MoveIntent {
        self.pointer_intent
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, screen_width: f32) {
        match event {
            PointerEvent::Down { x } => {
                self.pointer_intent = MoveIntent::from_pointer_x(x, screen_width);
            }
            PointerEvent::Move { x, is_down: true } => {
                self.pointer_intent = MoveIntent::from_pointer_x(x, screen_width);
            }
            PointerEvent::Move { is_down: false, .. } => {}
            PointerEvent::Up => self.pointer_intent = MoveIntent::None,
        }
    }

    /// Resolve both channels: keyboard first, pointer overrides when pressed
    pub fn resolve_intent(&self, keys: MoveIntent) -> MoveIntent {
        match self.pointer_intent {
            MoveIntent::None => keys,
            pointer => pointer,
        }
    }

    /// Switch between normal and boosted speed caps
    pub fn set_speed_boost(&mut self, active: bool, tuning: &Tuning) {
        self.speed_boost = active;
        self.max_speed = if active {
            tuning.player_speed_boosted
        } else {
            tuning.player_speed
        };
    }

    /// Stop dead (game over)
    pub fn halt(&mut self) {
        self.vel_x = 0.0;
        self.accel_x = 0.0;
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Integrate one tick of horizontal movement
    pub fn update(&mut self, keys: MoveIntent, dt_secs: f32, tuning: &Tuning) {
        if self.halted {
            return;
        }

        let intent = self.resolve_intent(keys);
        self.accel_x = intent.sign() * tuning.player_acceleration;

        if self.accel_x != 0.0 {
            self.vel_x += self.accel_x * dt_secs;
        } else {
            self.vel_x = approach_zero(self.vel_x, tuning.player_drag * dt_secs);
        }
        self.vel_x = self.vel_x.clamp(-self.max_speed, self.max_speed);

        self.pos.x += self.vel_x * dt_secs;

        let half = PLAYER_SIZE.x / 2.0;
        let (min_x, max_x) = (half, tuning.screen_width - half);
        if self.pos.x <= min_x || self.pos.x >= max_x {
            self.pos.x = self.pos.x.clamp(min_x, max_x);
            self.vel_x = 0.0;
        }
    }
}
