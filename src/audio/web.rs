//! Web Audio playback
//!
//! Procedurally generated sound effects - no external files needed!

use std::collections::HashMap;

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::SoundEffect;
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
    /// Last play time per cooldown-limited cue (ms, page clock)
    last_played: HashMap<&'static str, f64>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
            muted: false,
            last_played: HashMap::new(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volume changes from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect, now_ms: f64) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let cooldown = effect.cooldown_ms();
        if cooldown > 0.0 {
            let key = cooldown_key(effect);
            if let Some(last) = self.last_played.get(key) {
                if now_ms - last < cooldown {
                    return;
                }
            }
            self.last_played.insert(key, now_ms);
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => play_start(ctx, vol),
            SoundEffect::Coin => play_coin(ctx, vol),
            SoundEffect::PowerUp => play_power_up(ctx, vol),
            SoundEffect::ShieldBlock => play_shield_block(ctx, vol),
            SoundEffect::NearMiss { combo } => play_near_miss(ctx, vol, combo),
            SoundEffect::PowerUpEnd => play_power_up_end(ctx, vol),
            SoundEffect::GameOver => play_game_over(ctx, vol),
            SoundEffect::HighScore => {
                play_game_over(ctx, vol * 0.6);
                play_high_score(ctx, vol);
            }
            SoundEffect::Claim => play_coin(ctx, vol),
        }
    }
}

fn cooldown_key(effect: SoundEffect) -> &'static str {
    match effect {
        SoundEffect::ShieldBlock => "shield",
        SoundEffect::PowerUpEnd => "power_up_end",
        _ => "other",
    }
}

// === Sound generators ===

/// Create an oscillator with gain envelope
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Rising arpeggio of short notes
fn play_notes(ctx: &AudioContext, vol: f32, notes: &[f32], step: f64, len: f64, osc_type: OscillatorType) {
    for (i, freq) in notes.iter().enumerate() {
        let delay = i as f64 * step;
        if let Some((osc, gain)) = create_osc(ctx, *freq, osc_type) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + len + 0.05).ok();
        }
    }
}

/// Start - whoosh up
fn play_start(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 200.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.3, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
        .ok();
    osc.frequency().set_value_at_time(200.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(600.0, t + 0.15)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.25).ok();
}

/// Chest - bright two-note coin
fn play_coin(ctx: &AudioContext, vol: f32) {
    play_notes(ctx, vol * 0.25, &[988.0, 1319.0], 0.07, 0.2, OscillatorType::Square);
}

/// Power-up item - happy ding
fn play_power_up(ctx: &AudioContext, vol: f32) {
    play_notes(ctx, vol * 0.25, &[600.0, 800.0, 1000.0], 0.08, 0.15, OscillatorType::Sine);
}

/// Shield block - metallic clang
fn play_shield_block(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    if let Some((osc, gain)) = create_osc(ctx, 400.0, OscillatorType::Square) {
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency().set_value_at_time(300.0, t + 0.05).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    // Low body
    if let Some((osc, gain)) = create_osc(ctx, 80.0, OscillatorType::Sine) {
        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }
}

/// Near miss - quick swish, higher with every combo step
fn play_near_miss(ctx: &AudioContext, vol: f32, combo: u32) {
    let base = 500.0 * (1.0 + 0.12 * combo.saturating_sub(1).min(8) as f32);
    let Some((osc, gain)) = create_osc(ctx, base, OscillatorType::Sine) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(0.01, t).ok();
    gain.gain()
        .linear_ramp_to_value_at_time(vol * 0.3, t + 0.03)
        .ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.18)
        .ok();
    osc.frequency().set_value_at_time(base, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(base * 2.0, t + 0.15)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.2).ok();
}

/// Power-up ends - soft falling blip
fn play_power_up_end(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 700.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.2, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
        .ok();
    osc.frequency().set_value_at_time(700.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(350.0, t + 0.2)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.25).ok();
}

/// Game over - impact thump, then sad descending notes
fn play_game_over(ctx: &AudioContext, vol: f32) {
    if let Some((osc, gain)) = create_osc(ctx, 150.0, OscillatorType::Sine) {
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.1)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
        let delay = 0.15 + i as f64 * 0.2;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }
}

/// High score - celebratory
fn play_high_score(ctx: &AudioContext, vol: f32) {
    play_notes(
        ctx,
        vol * 0.25,
        &[500.0, 600.0, 700.0, 800.0, 1000.0],
        0.08,
        0.25,
        OscillatorType::Triangle,
    );
}
