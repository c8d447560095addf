//! Data-driven game balance
//!
//! Every timing and scoring constant the game uses lives here so a JSON
//! override can rebalance a build without touching code.

use serde::{Deserialize, Serialize};

/// Game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Whole-session countdown (seconds)
    pub session_secs: u32,
    /// Per-city countdown (seconds)
    pub round_secs: u32,
    /// Cities sampled per session
    pub cities_per_session: usize,
    /// Accumulator value at the start of every round
    pub start_value: f64,

    // === Platform numbers ===
    /// Smallest generated platform number
    pub number_min: i32,
    /// Largest generated platform number
    pub number_max: i32,
    /// Values never generated
    pub excluded_numbers: Vec<i32>,
    /// Countdown tick interval (ms)
    pub countdown_tick_ms: u64,
    /// Time a number stays on the platform (ms)
    pub countdown_ms: u64,
    /// Input still accepted after the bar empties (ms)
    pub grace_ms: u64,
    /// Feedback delay between consuming a number and promoting the next (ms)
    pub consume_delay_ms: u64,

    // === Effects ===
    /// Cooldown after BREAK or MAGNIFY (ms, 0 disables it)
    pub effect_cooldown_ms: u64,
    /// Numbers an effect stays blocked after two uses in a row
    pub block_numbers: u8,
    /// Exponent range for BREAK
    pub break_power: (f64, f64),
    /// Exponent range for MAGNIFY
    pub magnify_power: (f64, f64),

    // === Scoring ===
    /// Live score that opens the bonus quiz
    pub bonus_threshold: u32,
    /// Points for a correct bonus answer
    pub bonus_points: u32,
    /// Wrong options shown next to the right country
    pub bonus_distractors: usize,

    // === Globe centering ===
    /// Tilt used when centering on the south pole (degrees)
    pub center_tilt_south: f32,
    /// Tilt used when centering on the north pole (degrees)
    pub center_tilt_north: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            session_secs: 300,
            round_secs: 30,
            cities_per_session: 10,
            start_value: 20.0,

            number_min: -5,
            number_max: 15,
            excluded_numbers: vec![0, 1],
            countdown_tick_ms: 100,
            countdown_ms: 5500,
            grace_ms: 500,
            consume_delay_ms: 300,

            effect_cooldown_ms: 10_000,
            block_numbers: 3,
            break_power: (0.4, 0.8),
            magnify_power: (1.3, 1.8),

            bonus_threshold: 3500,
            bonus_points: 1000,
            bonus_distractors: 2,

            center_tilt_south: 0.0,
            center_tilt_north: 13.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True if `value` is a legal generated platform number
    pub fn is_valid_number(&self, value: i32) -> bool {
        (self.number_min..=self.number_max).contains(&value)
            && !self.excluded_numbers.contains(&value)
    }

    /// Linear map from latitude [-90, 90] to the centering tilt band
    pub fn center_tilt_for_latitude(&self, lat: f64) -> f32 {
        let t = ((lat.clamp(-90.0, 90.0) + 90.0) / 180.0) as f32;
        self.center_tilt_south + t * (self.center_tilt_north - self.center_tilt_south)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_rules() {
        let t = Tuning::default();
        assert_eq!(t.session_secs, 300);
        assert_eq!(t.round_secs, 30);
        assert_eq!(t.cities_per_session, 10);
        assert!(!t.is_valid_number(0));
        assert!(!t.is_valid_number(1));
        assert!(!t.is_valid_number(16));
        assert!(t.is_valid_number(-5));
        assert!(t.is_valid_number(15));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "round_secs": 45, "effect_cooldown_ms": 0 }"#).unwrap();
        assert_eq!(t.round_secs, 45);
        assert_eq!(t.effect_cooldown_ms, 0);
        assert_eq!(t.session_secs, 300);
        assert_eq!(t.break_power, (0.4, 0.8));
    }

    #[test]
    fn center_tilt_is_linear_over_latitude() {
        let t = Tuning::default();
        assert_eq!(t.center_tilt_for_latitude(-90.0), 0.0);
        assert!((t.center_tilt_for_latitude(0.0) - 6.5).abs() < 1e-6);
        assert_eq!(t.center_tilt_for_latitude(90.0), 13.0);
        // Accumulators can leave the valid range; tilt stays inside the band
        assert_eq!(t.center_tilt_for_latitude(400.0), 13.0);
    }
}
