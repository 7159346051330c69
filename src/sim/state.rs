//! Game state and session lifecycle
//!
//! `GameState` lives for the whole process. A `Session` (player, pools,
//! clock, timers) is built when play starts and replaced on restart.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::NearMissTracker;
use super::entity::{EntityKind, ItemKind};
use super::player::Player;
use super::pool::EntityPool;
use super::powerup::{PowerUpKind, PowerUpTimers};
use super::score::ScoreLedger;
use super::spawn::SpawnScheduler;
use crate::consts::{GIWA_POOL_SIZE, ITEM_POOL_SIZE};
use crate::tuning::Tuning;

/// Session status as seen by the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Waiting for the player to press start
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended by an unshielded hit
    GameOver,
}

/// Things that happened during a tick, for audio and HUD effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    Spawned { kind: EntityKind },
    NearMiss { combo: u32, points: f64 },
    ItemCollected { kind: ItemKind },
    /// A giwa touched the player while the shield was up
    ShieldBlocked,
    PowerUpExpired { kind: PowerUpKind },
    GameOver { final_score: f64, high_score: f64, new_high_score: bool },
    PointsClaimed { points: u64 },
}

/// Monotonic gameplay time for one session
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionClock {
    elapsed_ms: f64,
}

impl SessionClock {
    pub fn advance(&mut self, delta_ms: f64) {
        self.elapsed_ms += delta_ms.max(0.0);
    }

    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn elapsed_secs(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }
}

/// Everything that exists only while a run is in progress
#[derive(Debug, Clone)]
pub struct Session {
    pub clock: SessionClock,
    pub player: Player,
    pub obstacles: EntityPool,
    pub items: EntityPool,
    pub spawner: SpawnScheduler,
    pub near_misses: NearMissTracker,
    pub timers: PowerUpTimers,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            clock: SessionClock::default(),
            player: Player::new(tuning),
            obstacles: EntityPool::new(GIWA_POOL_SIZE, EntityKind::Obstacle),
            items: EntityPool::new(ITEM_POOL_SIZE, EntityKind::Item(ItemKind::Chest)),
            spawner: SpawnScheduler::new(),
            near_misses: NearMissTracker::new(),
            timers: PowerUpTimers::new(),
        }
    }

    /// Back to a fresh run; pools keep their slots and id counters
    pub fn reset(&mut self, tuning: &Tuning) {
        self.clock = SessionClock::default();
        self.player = Player::new(tuning);
        self.obstacles.clear();
        self.items.clear();
        self.spawner = SpawnScheduler::new();
        self.near_misses.clear();
        self.timers.clear();
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub status: GameStatus,
    pub ledger: ScoreLedger,
    pub session: Option<Session>,
    /// Events since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    /// New game sitting at the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            status: GameStatus::Menu,
            ledger: ScoreLedger::new(),
            session: None,
            events: Vec::new(),
        }
    }

    /// Begin a fresh run (menu -> playing, or replace the current run)
    pub fn start_session(&mut self) {
        self.ledger.reset_session();
        match self.session.as_mut() {
            Some(session) => session.reset(&self.tuning),
            None => self.session = Some(Session::new(&self.tuning)),
        }
        self.status = GameStatus::Playing;
        self.push_event(GameEvent::SessionStarted);
        log::info!(
            "Session started (high score {:.0})",
            self.ledger.high_score
        );
    }

    /// Play again after a game over; ignored in any other status
    pub fn restart_session(&mut self) -> bool {
        if self.status != GameStatus::GameOver {
            log::debug!("Restart ignored while {:?}", self.status);
            return false;
        }
        self.start_session();
        true
    }

    /// End the run after an unshielded hit
    pub fn game_over(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.player.halt();
            session.timers.clear();
        }
        let new_high_score = self.ledger.game_over();
        self.status = GameStatus::GameOver;
        log::info!(
            "Game over: score {:.0}, high score {:.0}{}",
            self.ledger.score,
            self.ledger.high_score,
            if new_high_score { " (new best)" } else { "" }
        );
        self.push_event(GameEvent::GameOver {
            final_score: self.ledger.score,
            high_score: self.ledger.high_score,
            new_high_score,
        });
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Session time, or zero outside a run
    pub fn now_ms(&self) -> f64 {
        self.session.as_ref().map_or(0.0, |s| s.clock.now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_menu_without_session() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.status, GameStatus::Menu);
        assert!(state.session.is_none());
    }

    #[test]
    fn test_start_builds_session() {
        let mut state = GameState::new(1, Tuning::default());
        state.start_session();
        assert_eq!(state.status, GameStatus::Playing);
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.obstacles.capacity(), 50);
        assert_eq!(session.items.capacity(), 20);
        assert_eq!(session.obstacles.active_count(), 0);
        assert_eq!(state.drain_events(), vec![GameEvent::SessionStarted]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_game_over_once() {
        let mut state = GameState::new(1, Tuning::default());
        state.start_session();
        state.ledger.add_score(250.0);
        state.drain_events();

        state.game_over();
        state.game_over();
        assert_eq!(state.status, GameStatus::GameOver);
        let over: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(over.len(), 1);
        assert_eq!(state.ledger.high_score, 250.0);
        assert!(state.session.as_ref().unwrap().player.is_halted());
    }

    #[test]
    fn test_restart_reuses_pools() {
        let mut state = GameState::new(1, Tuning::default());
        state.start_session();
        let first_id = {
            let GameState { session, rng, .. } = &mut state;
            let session = session.as_mut().unwrap();
            for _ in 0..60 {
                session.obstacles.spawn(rng, EntityKind::Obstacle, 100.0, 800.0);
            }
            session.timers.arm(PowerUpKind::Shield, 0.0, 2000.0);
            session.obstacles.active().next().unwrap().id
        };
        state.game_over();
        assert!(state.restart_session());

        let GameState { session, rng, .. } = &mut state;
        let session = session.as_mut().unwrap();
        assert_eq!(session.obstacles.capacity(), 60);
        assert_eq!(session.obstacles.active_count(), 0);
        assert!(session.near_misses.is_empty());
        assert_eq!(session.timers.pending(PowerUpKind::Shield), None);
        assert!(!session.player.is_halted());

        // Ids keep counting across runs
        let id = session.obstacles.spawn(rng, EntityKind::Obstacle, 100.0, 800.0).id;
        assert!(id > first_id + 59);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut state = GameState::new(1, Tuning::default());
        assert!(!state.restart_session());
        assert_eq!(state.status, GameStatus::Menu);

        state.start_session();
        state.ledger.add_score(900.0);
        assert!(!state.restart_session());

        state.game_over();
        assert!(state.restart_session());
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.ledger.score, 0.0);
        assert_eq!(state.ledger.high_score, 900.0);
        assert_eq!(state.now_ms(), 0.0);
    }
}
