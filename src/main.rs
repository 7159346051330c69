//! Giwa Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent as DomPointerEvent};

    use giwa_dodge::audio::{AudioManager, SoundEffect};
    use giwa_dodge::consts::*;
    use giwa_dodge::renderer::{CanvasRenderer, SpriteAtlas};
    use giwa_dodge::sim::{GameEvent, GameState, GameStatus, PointerEvent, TickInput, tick};
    use giwa_dodge::ui::{
        CalloutAnimation, ComboCallout, HudSnapshot, Strings, high_score_line, score_line,
    };
    use giwa_dodge::{Locale, Settings, Tuning, Wallet};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        last_time: f64,
        settings: Settings,
        audio: AudioManager,
        renderer: Option<CanvasRenderer>,
        wallet: Wallet,
        callout: Option<CalloutAnimation>,
        /// Last snapshot written to the DOM
        last_hud: Option<HudSnapshot>,
        new_high_score: bool,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                state: GameState::new(seed, Tuning::default()),
                input: TickInput::default(),
                last_time: 0.0,
                settings,
                audio,
                renderer: None,
                wallet: Wallet::new(),
                callout: None,
                last_hud: None,
                new_high_score: false,
            }
        }

        /// Start from the menu, or play again after a game over
        fn start(&mut self) {
            self.audio.resume();
            match self.state.status {
                GameStatus::Menu => self.state.start_session(),
                GameStatus::GameOver => {
                    self.state.restart_session();
                }
                GameStatus::Playing => {}
            }
            self.new_high_score = false;
            self.callout = None;
        }

        /// Run one simulation step
        fn update(&mut self, delta_ms: f64, time: f64) {
            tick(&mut self.state, &self.input, delta_ms);
            // Pointer events are consumed once
            self.input.pointer.clear();
            self.handle_events(time);
        }

        /// Route drained game events to audio and HUD effects
        fn handle_events(&mut self, time: f64) {
            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect, time);
                }
                match event {
                    GameEvent::NearMiss { combo, points } if self.settings.combo_callouts => {
                        self.callout = Some(CalloutAnimation::new(
                            ComboCallout::for_combo(combo, points),
                            time,
                        ));
                    }
                    GameEvent::GameOver { new_high_score, .. } => {
                        self.new_high_score = new_high_score;
                    }
                    _ => {}
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if self
                .callout
                .as_ref()
                .is_some_and(|c| c.sample(time, SCREEN_HEIGHT).is_none())
            {
                self.callout = None;
            }
            if let Some(renderer) = &self.renderer {
                renderer.render(&self.state, self.callout.as_ref(), time);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let hud = HudSnapshot::from_state(&self.state);
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let locale = self.settings.locale;

            set_text(&document, "hud-score", &score_line(locale, hud.score));
            set_text(&document, "hud-high-score", &high_score_line(locale, hud.high_score));

            // Combo only shows while a chain is running
            set_visible(&document, "hud-combo", hud.combo > 1);
            set_text(&document, "hud-combo", &format!("x{}", hud.combo));

            set_visible(&document, "hud-shield", hud.power_ups.shield);
            set_visible(&document, "hud-boost", hud.power_ups.speed_boost);
            set_visible(&document, "hud-slow", hud.power_ups.slow_motion);

            set_visible(&document, "start-screen", hud.status == GameStatus::Menu);
            set_visible(&document, "game-over", hud.status == GameStatus::GameOver);
            if hud.status == GameStatus::GameOver {
                set_text(&document, "final-score", &hud.score.to_string());
                set_visible(&document, "new-high-score", self.new_high_score);
            }

            set_text(&document, "claimable-points", &hud.claimable_points.to_string());
            self.update_wallet_ui(&document, &hud);

            self.last_hud = Some(hud);
        }

        fn update_wallet_ui(&self, document: &Document, hud: &HudSnapshot) {
            let connected = self.wallet.is_connected();
            set_visible(document, "connect-wallet-btn", !connected);
            set_visible(document, "wallet-prompt", !connected);
            set_visible(document, "claim-btn", connected && hud.claimable_points > 0);
            set_text(document, "wallet-address", self.wallet.address().unwrap_or(""));
        }

        /// Write the fixed copy for the current locale
        fn apply_locale(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let strings = Strings::for_locale(self.settings.locale);
            set_text(&document, "title", strings.title);
            set_text(&document, "controls-hint", strings.controls_hint);
            set_text(&document, "wallet-prompt", strings.wallet_prompt);
            set_text(&document, "connect-wallet-btn", strings.connect_wallet);
            set_text(&document, "claim-btn", strings.claim_points);
            set_text(&document, "game-over-title", strings.game_over);
            set_text(&document, "new-high-score", strings.new_high_score);
            set_text(&document, "retry-hint", strings.retry);
            let _ = document
                .document_element()
                .map(|el| el.set_attribute("lang", self.settings.locale.as_str()));
            // Force the HUD to redraw with the new labels
            self.last_hud = None;
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Giwa Dodge starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        match CanvasRenderer::new(canvas.clone(), SpriteAtlas::load("assets")) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::warn!("Canvas unavailable, running without rendering: {:?}", e),
        }
        game.borrow_mut().apply_locale();

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_mute(game.clone());
        setup_resize(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Giwa Dodge running!");
        Ok(())
    }

    /// Convert a DOM pointer event into playfield coordinates
    fn pointer_x(game: &Game, event: &DomPointerEvent) -> Option<f32> {
        game.renderer
            .as_ref()
            .map(|r| r.client_to_playfield_x(event.client_x() as f64))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => {
                        event.prevent_default();
                        g.input.left = true;
                    }
                    "ArrowRight" => {
                        event.prevent_default();
                        g.input.right = true;
                    }
                    " " | "Enter" => {
                        if g.state.status == GameStatus::Menu {
                            g.start();
                        }
                    }
                    "r" | "R" => {
                        if g.state.status == GameStatus::GameOver {
                            g.start();
                        }
                    }
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down (mouse and touch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DomPointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.state.status != GameStatus::Playing {
                    g.start();
                }
                if let Some(x) = pointer_x(&g, &event) {
                    g.input.pointer.push(PointerEvent::Down { x });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DomPointerEvent| {
                let mut g = game.borrow_mut();
                let is_down = event.buttons() & 1 == 1;
                if let Some(x) = pointer_x(&g, &event) {
                    g.input.pointer.push(PointerEvent::Move { x, is_down });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up / cancel
        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: DomPointerEvent| {
                game.borrow_mut().input.pointer.push(PointerEvent::Up);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let delta_ms = if g.last_time > 0.0 {
                (time - g.last_time).min(MAX_FRAME_MS)
            } else {
                FRAME_MS
            };
            g.last_time = time;

            g.update(delta_ms, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }

    /// Attach a click handler to a button if it exists
    fn on_click(document: &Document, id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "start-btn", move |_| game.borrow_mut().start());
        }

        {
            let game = game.clone();
            on_click(document, "restart-btn", move |_| game.borrow_mut().start());
        }

        {
            let game = game.clone();
            on_click(document, "connect-wallet-btn", move |_| {
                let mut g = game.borrow_mut();
                // Keep the simulation RNG stream untouched
                g.wallet.connect(&mut rand::rng());
                g.last_hud = None;
            });
        }

        {
            let game = game.clone();
            on_click(document, "claim-btn", move |_| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                match g.wallet.claim_points(&mut g.state) {
                    Ok(points) => log::info!("Claim complete: {} points", points),
                    Err(e) => log::warn!("Claim refused: {}", e),
                }
                let time = g.last_time;
                g.handle_events(time);
                g.last_hud = None;
            });
        }

        {
            let game = game.clone();
            on_click(document, "locale-btn", move |_| {
                let mut g = game.borrow_mut();
                g.settings.locale = match g.settings.locale {
                    Locale::En => Locale::Ko,
                    Locale::Ko => Locale::En,
                };
                g.settings.save();
                g.apply_locale();
            });
        }

        on_click(document, "sound-btn", move |_| {
            let mut g = game.borrow_mut();
            g.settings.sound_enabled = !g.settings.sound_enabled;
            g.settings.save();
            let settings = g.settings.clone();
            g.audio.apply_settings(&settings);
            log::info!("Sound {}", if settings.sound_enabled { "on" } else { "off" });
        });
    }

    /// Mute while the page is hidden or unfocused
    fn setup_auto_mute(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(hidden);
                }
                // Resync the frame clock so the return frame is not a huge delta
                g.last_time = 0.0;
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                // Key-up never arrives once focus is gone
                g.input.left = false;
                g.input.right = false;
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(renderer) = game.borrow_mut().renderer.as_mut() {
                renderer.resize();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: the autopilot plays one session and the result is logged
///
/// Usage: `giwa-dodge [seed] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use giwa_dodge::consts::FRAME_MS;
    use giwa_dodge::sim::{GameEvent, GameState, TickInput, tick};
    use giwa_dodge::ui::HudSnapshot;
    use giwa_dodge::{Tuning, Wallet};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Giwa Dodge (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the playable game");

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 42,
    };
    let tuning = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let tuning = Tuning::from_json(&json)?;
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        None => Tuning::default(),
    };
    log::debug!("Tuning in effect:\n{}", tuning.to_json()?);

    let mut state = GameState::new(seed, tuning);
    state.start_session();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    // Two simulated minutes at most
    let max_frames = (120_000.0 / FRAME_MS) as u32;
    let mut near_misses = 0u32;
    let mut items = 0u32;
    let mut blocks = 0u32;
    let mut frames = 0u32;
    while state.is_playing() && frames < max_frames {
        tick(&mut state, &input, FRAME_MS);
        frames += 1;
        for event in state.drain_events() {
            match event {
                GameEvent::NearMiss { .. } => near_misses += 1,
                GameEvent::ItemCollected { .. } => items += 1,
                GameEvent::ShieldBlocked => blocks += 1,
                _ => {}
            }
        }
    }

    let hud = HudSnapshot::from_state(&state);
    log::info!(
        "Demo finished after {:.1}s: score {}, {} near misses, {} items, {} shield-blocked ticks",
        state.now_ms() / 1000.0,
        hud.score,
        near_misses,
        items,
        blocks
    );

    if state.is_playing() {
        state.game_over();
    }
    let mut wallet = Wallet::new();
    wallet.connect(&mut state.rng);
    match wallet.claim_points(&mut state) {
        Ok(claimed) => {
            let signature = wallet.sign_score(claimed)?;
            log::info!("Claimed {} points ({})", claimed, signature);
        }
        Err(e) => log::warn!("Nothing claimed: {}", e),
    }

    println!("{}", HudSnapshot::from_state(&state).to_json());
    Ok(())
}
