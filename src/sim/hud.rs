//! Display helpers for the timer bars and score list

use serde::Serialize;

use crate::tuning::Tuning;

/// Fill colour band of a draining bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarBand {
    Green,
    Amber,
    Red,
    /// Empty bar pulsing while input is still accepted
    Grace,
}

impl BarBand {
    /// Gradient stops (start, end) as CSS hex
    pub fn css_colors(&self) -> (&'static str, &'static str) {
        match self {
            BarBand::Green => ("#4ade80", "#22c55e"),
            BarBand::Amber => ("#f59e0b", "#d97706"),
            BarBand::Red | BarBand::Grace => ("#ef4444", "#dc2626"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountdownBar {
    /// 0..=100
    pub percent: f32,
    pub band: BarBand,
    pub opacity: f32,
}

impl CountdownBar {
    /// Band a bar by its fill: red below 25 %, amber below 50 %
    pub fn from_fraction(fraction: f32) -> Self {
        let percent = (fraction * 100.0).clamp(0.0, 100.0);
        let band = if percent < 25.0 {
            BarBand::Red
        } else if percent < 50.0 {
            BarBand::Amber
        } else {
            BarBand::Green
        };
        Self {
            percent,
            band,
            opacity: 1.0,
        }
    }

    /// Platform number bar, pulsing through the grace window
    pub fn for_platform(
        remaining_ms: u64,
        grace_elapsed_ms: u64,
        tuning: &Tuning,
        reduced_motion: bool,
    ) -> Self {
        if remaining_ms > 0 {
            return Self::from_fraction(remaining_ms as f32 / tuning.countdown_ms.max(1) as f32);
        }
        let grace_s = grace_elapsed_ms as f32 / 1000.0;
        Self {
            percent: 0.0,
            band: BarBand::Grace,
            opacity: if reduced_motion {
                1.0
            } else {
                0.3 + (grace_s * 20.0).sin() * 0.3
            },
        }
    }

    /// Per-city timer fuse
    pub fn for_round(remaining_secs: u32, round_secs: u32) -> Self {
        Self::from_fraction(remaining_secs as f32 / round_secs.max(1) as f32)
    }
}

/// `m:ss`
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Score list colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    High,
    Mid,
    Low,
}

impl ScoreBand {
    pub fn for_points(points: u32) -> Self {
        if points >= 3000 {
            ScoreBand::High
        } else if points >= 1000 {
            ScoreBand::Mid
        } else {
            ScoreBand::Low
        }
    }
}
