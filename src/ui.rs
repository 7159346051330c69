//! HUD read model and localized strings
//!
//! Nothing here mutates the game. The browser shell turns these values into
//! DOM text; tests and the native demo read them directly.

use serde::{Deserialize, Serialize};

use crate::settings::Locale;
use crate::sim::{GameState, GameStatus, PowerUps};

/// Everything the HUD shows, taken in one read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Whole points (score accrues fractionally between frames)
    pub score: u64,
    pub high_score: u64,
    pub combo: u32,
    pub power_ups: PowerUps,
    pub status: GameStatus,
    pub claimable_points: u64,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let ledger = &state.ledger;
        Self {
            score: ledger.score.floor() as u64,
            high_score: ledger.high_score.floor() as u64,
            combo: ledger.combo,
            power_ups: ledger.power_ups,
            status: state.status,
            claimable_points: ledger.claimable_points,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Floating text shown when a near miss lands
#[derive(Debug, Clone, PartialEq)]
pub struct ComboCallout {
    pub text: String,
    /// Earned points line, e.g. "+150"
    pub points: String,
    /// CSS colour
    pub color: &'static str,
    pub font_px: u32,
}

impl ComboCallout {
    pub fn for_combo(combo: u32, points: f64) -> Self {
        let (text, color, font_px) = match combo {
            0 | 1 => ("NICE!".to_string(), "#00ff00", 64),
            2 => ("GREAT!".to_string(), "#00ffff", 72),
            3 => ("EXCELLENT!".to_string(), "#ff00ff", 80),
            n => (format!("{n}X COMBO!"), "#ff0000", 96),
        };
        Self {
            text,
            points: format!("+{}", points.floor() as u64),
            color,
            font_px,
        }
    }
}

/// Call-out animation length (ms)
pub const CALLOUT_DURATION_MS: f64 = 800.0;

/// Where and how a call-out is drawn on one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalloutFrame {
    pub alpha: f32,
    pub scale: f32,
    /// Vertical centre in playfield coordinates
    pub y: f32,
}

/// A call-out in flight: grows from half size, rises 50px and fades out
#[derive(Debug, Clone, PartialEq)]
pub struct CalloutAnimation {
    pub callout: ComboCallout,
    /// Page time the call-out appeared (ms)
    pub started_ms: f64,
}

impl CalloutAnimation {
    pub fn new(callout: ComboCallout, started_ms: f64) -> Self {
        Self {
            callout,
            started_ms,
        }
    }

    /// Frame at `now_ms`, or `None` once the animation has finished
    pub fn sample(&self, now_ms: f64, screen_height: f32) -> Option<CalloutFrame> {
        let t = (now_ms - self.started_ms) / CALLOUT_DURATION_MS;
        if !(0.0..1.0).contains(&t) {
            return None;
        }
        // Quadratic ease-out
        let eased = (1.0 - (1.0 - t) * (1.0 - t)) as f32;
        let start_y = screen_height / 2.0 - 50.0;
        Some(CalloutFrame {
            alpha: 1.0 - eased,
            scale: 0.5 + 0.7 * eased,
            y: start_y - 50.0 * eased,
        })
    }
}

/// Fixed HUD copy for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strings {
    pub title: &'static str,
    pub controls_hint: &'static str,
    pub wallet_prompt: &'static str,
    pub connect_wallet: &'static str,
    pub claim_points: &'static str,
    pub score: &'static str,
    pub high_score: &'static str,
    pub game_over: &'static str,
    pub new_high_score: &'static str,
    pub retry: &'static str,
}

const EN: Strings = Strings {
    title: "GIWA DODGE",
    controls_hint: "Arrow Keys (← →) or Touch to Move",
    wallet_prompt: "Connect your wallet to record scores and earn points.",
    connect_wallet: "Connect Wallet",
    claim_points: "Claim Points",
    score: "Score",
    high_score: "High Score",
    game_over: "GAME OVER",
    new_high_score: "NEW HIGH SCORE!",
    retry: "Press R or tap to retry",
};

const KO: Strings = Strings {
    title: "기와 피하기",
    controls_hint: "방향키 (← →) 또는 터치로 이동",
    wallet_prompt: "지갑을 연결하여 점수를 기록하고 포인트를 획득하세요.",
    connect_wallet: "지갑 연결",
    claim_points: "포인트 받기",
    score: "점수",
    high_score: "최고 점수",
    game_over: "게임 오버",
    new_high_score: "최고 기록 달성!",
    retry: "R 키 또는 터치로 다시 시작",
};

impl Strings {
    pub fn for_locale(locale: Locale) -> &'static Strings {
        match locale {
            Locale::En => &EN,
            Locale::Ko => &KO,
        }
    }
}

/// "Score: 1234" in the given locale
pub fn score_line(locale: Locale, score: u64) -> String {
    format!("{}: {}", Strings::for_locale(locale).score, score)
}

/// "High Score: 1234" in the given locale
pub fn high_score_line(locale: Locale, high_score: u64) -> String {
    format!("{}: {}", Strings::for_locale(locale).high_score, high_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    #[test]
    fn test_callout_tiers() {
        let nice = ComboCallout::for_combo(1, 100.0);
        assert_eq!(nice.text, "NICE!");
        assert_eq!(nice.points, "+100");
        assert_eq!(nice.font_px, 64);

        assert_eq!(ComboCallout::for_combo(2, 150.0).color, "#00ffff");
        assert_eq!(ComboCallout::for_combo(3, 225.0).text, "EXCELLENT!");

        let big = ComboCallout::for_combo(7, 1139.06);
        assert_eq!(big.text, "7X COMBO!");
        assert_eq!(big.points, "+1139");
        assert_eq!(big.color, "#ff0000");
        assert_eq!(big.font_px, 96);
    }

    #[test]
    fn test_callout_animation_fades_and_rises() {
        let anim = CalloutAnimation::new(ComboCallout::for_combo(1, 100.0), 1000.0);

        let first = anim.sample(1000.0, 600.0).unwrap();
        assert_eq!(first.alpha, 1.0);
        assert_eq!(first.scale, 0.5);
        assert_eq!(first.y, 250.0);

        let mid = anim.sample(1400.0, 600.0).unwrap();
        assert!(mid.alpha < 1.0 && mid.alpha > 0.0);
        assert!(mid.y < 250.0 && mid.y > 200.0);

        assert!(anim.sample(1800.0, 600.0).is_none());
        assert!(anim.sample(999.0, 600.0).is_none());
    }

    #[test]
    fn test_snapshot_floors_score() {
        let mut state = GameState::new(3, Tuning::default());
        state.start_session();
        state.ledger.add_score(41.9);
        state.ledger.power_ups.shield = true;

        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.score, 41);
        assert_eq!(hud.status, GameStatus::Playing);
        assert!(hud.power_ups.shield);
        assert!(hud.to_json().contains("\"status\":\"playing\""));
    }

    #[test]
    fn test_locales_differ() {
        assert_eq!(score_line(Locale::En, 12), "Score: 12");
        assert_eq!(score_line(Locale::Ko, 12), "점수: 12");
        assert_eq!(high_score_line(Locale::En, 900), "High Score: 900");
        assert_eq!(high_score_line(Locale::Ko, 900), "최고 점수: 900");
        assert!(Strings::for_locale(Locale::Ko).wallet_prompt.contains("지갑"));
    }
}
