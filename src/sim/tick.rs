//! Per-frame simulation step
//!
//! Core game loop: advances one session by a variable frame delta.

use super::collision::{first_item_hit, first_obstacle_hit};
use super::difficulty::Difficulty;
use super::entity::{EntityKind, ItemKind};
use super::player::{MoveIntent, PointerEvent};
use super::powerup::PowerUpKind;
use super::score::ScoreLedger;
use super::spawn::SpawnScheduler;
use super::state::{GameEvent, GameState, Session};
use crate::consts::MAX_FRAME_MS;
use crate::tuning::Tuning;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Arrow-left held
    pub left: bool,
    /// Arrow-right held
    pub right: bool,
    /// Pointer/touch events in arrival order
    pub pointer: Vec<PointerEvent>,
    /// Idle/demo mode - autopilot dodges for the player
    pub idle_mode: bool,
}

/// Advance the game by one frame of `delta_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f64) {
    // Menu and game over are inert
    if !state.is_playing() {
        return;
    }
    let Some(session) = state.session.as_mut() else {
        return;
    };

    let tuning = &state.tuning;
    let ledger = &mut state.ledger;
    let delta_ms = delta_ms.clamp(0.0, MAX_FRAME_MS);
    let dt = (delta_ms / 1000.0) as f32;
    let mut events = Vec::new();

    session.clock.advance(delta_ms);
    let now = session.clock.now_ms();

    // Deferred power-up reverts
    for kind in session.timers.take_expired(now) {
        ledger.power_ups.set(kind, false);
        if kind == PowerUpKind::SpeedBoost {
            session.player.set_speed_boost(false, tuning);
        }
        log::debug!("{:?} expired at {:.0}ms", kind, now);
        events.push(GameEvent::PowerUpExpired { kind });
    }

    // Passive score
    ledger.add_score(tuning.score_per_tick * delta_ms / 1000.0);

    // Near misses
    if session
        .near_misses
        .check(&session.player, &session.obstacles, tuning)
        .is_some()
    {
        let points = ledger.credit_near_miss(now, tuning);
        log::debug!("Near miss: combo {} (+{:.0})", ledger.combo, points);
        events.push(GameEvent::NearMiss {
            combo: ledger.combo,
            points,
        });
    }
    ledger.expire_combo(now, tuning);

    // Difficulty and spawning
    let difficulty = Difficulty::at(tuning, session.clock.elapsed_secs());
    let fall_speed =
        difficulty.effective_fall_speed(ledger.power_ups.slow_motion, tuning.slow_motion_factor);
    if session.spawner.due(now, &difficulty) {
        let kind = SpawnScheduler::roll(&mut state.rng, tuning.item_spawn_chance);
        let pool = match kind {
            EntityKind::Obstacle => &mut session.obstacles,
            EntityKind::Item(_) => &mut session.items,
        };
        pool.spawn(&mut state.rng, kind, fall_speed, tuning.screen_width);
        events.push(GameEvent::Spawned { kind });
    }

    // Player
    let keys = if input.idle_mode {
        autopilot_intent(session, tuning)
    } else {
        MoveIntent::from_keys(input.left, input.right)
    };
    for event in &input.pointer {
        session.player.handle_pointer(*event, tuning.screen_width);
    }
    session.player.update(keys, dt, tuning);

    // Falling entities
    session.obstacles.update(dt, tuning.screen_height);
    session.items.update(dt, tuning.screen_height);

    // Collisions
    let mut hit = false;
    if first_obstacle_hit(&session.player, &session.obstacles).is_some() {
        if ledger.power_ups.shield {
            events.push(GameEvent::ShieldBlocked);
        } else {
            hit = true;
        }
    }
    if !hit {
        if let Some((id, kind)) = first_item_hit(&session.player, &session.items) {
            session.items.deactivate(id);
            apply_item(kind, session, ledger, tuning, now);
            events.push(GameEvent::ItemCollected { kind });
        }
    }

    for event in events {
        state.push_event(event);
    }
    if hit {
        state.game_over();
    }
}

/// Apply a collected item's effect and schedule its revert
fn apply_item(
    kind: ItemKind,
    session: &mut Session,
    ledger: &mut ScoreLedger,
    tuning: &Tuning,
    now_ms: f64,
) {
    log::debug!("Collected {:?}", kind);
    let Some(power_up) = kind.power_up() else {
        ledger.add_score(tuning.chest_score);
        return;
    };

    ledger.power_ups.set(power_up, true);
    if power_up == PowerUpKind::SpeedBoost {
        session.player.set_speed_boost(true, tuning);
    }
    session
        .timers
        .arm(power_up, now_ms, power_up.duration_ms(tuning));
}

/// Demo steering: sidestep the lowest giwa heading for the player, otherwise
/// drift toward the nearest item
pub fn autopilot_intent(session: &Session, tuning: &Tuning) -> MoveIntent {
    let player = &session.player;
    let danger_width = 70.0;

    let threat = session
        .obstacles
        .active()
        .filter(|giwa| giwa.pos.y < player.pos.y + 20.0)
        .filter(|giwa| (giwa.pos.x - player.pos.x).abs() < danger_width)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(giwa) = threat {
        let margin = danger_width + 20.0;
        let room_left = player.pos.x - margin > 0.0;
        let room_right = player.pos.x + margin < tuning.screen_width;
        return match (giwa.pos.x < player.pos.x, room_left, room_right) {
            (true, _, true) | (false, false, _) => MoveIntent::Right,
            _ => MoveIntent::Left,
        };
    }

    let target = session
        .items
        .active()
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|item| item.pos.x);

    match target {
        Some(x) if x < player.pos.x - 10.0 => MoveIntent::Left,
        Some(x) if x > player.pos.x + 10.0 => MoveIntent::Right,
        _ => MoveIntent::None,
    }
}
