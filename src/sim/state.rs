//! Session state and the events the engine reports
//!
//! Everything a session needs to resume a frame lives in `GameSession`;
//! the engine owns one and resets it explicitly.

use serde::{Deserialize, Serialize};

use super::platform::{EffectKind, PlatformNumber};
use super::quiz::{BonusQuizState, QuizOption};
use super::scoring::Operator;
use crate::catalog::City;
use crate::tuning::Tuning;

/// Which accumulator operators write to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordMode {
    #[default]
    Lat,
    Lon,
}

impl CoordMode {
    pub fn toggled(self) -> Self {
        match self {
            CoordMode::Lat => CoordMode::Lon,
            CoordMode::Lon => CoordMode::Lat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordMode::Lat => "LAT",
            CoordMode::Lon => "LON",
        }
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing played yet
    #[default]
    Idle,
    /// Rounds running
    Active,
    /// Timers stopped, scores still visible
    Ended,
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every city was played
    Completed,
    /// The session clock ran out mid-round
    TimeUp,
    /// The player ended it
    Stopped,
}

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub city: String,
    pub points: u32,
}

/// Notifications for the UI layer, drained after each call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    SessionStarted {
        seed: u64,
        cities: usize,
    },
    RoundStarted {
        index: usize,
        city: City,
    },
    NumberAdvanced {
        current: PlatformNumber,
        next: Option<PlatformNumber>,
        /// Promoted after an operator rather than by the countdown
        consumed: bool,
    },
    OperatorApplied {
        op: Operator,
        mode: CoordMode,
        value: f64,
        distance: f64,
        score: u32,
    },
    EffectApplied {
        kind: EffectKind,
        current: PlatformNumber,
        next: PlatformNumber,
        blocked: bool,
    },
    EffectRejected {
        kind: EffectKind,
        reason: String,
    },
    CooldownFinished {
        kind: EffectKind,
    },
    BonusQuizStarted {
        options: Vec<QuizOption>,
    },
    BonusQuizAnswered {
        correct: bool,
        bonus: u32,
    },
    RoundScored {
        city: String,
        points: u32,
    },
    SessionEnded {
        total: u32,
        reason: EndReason,
    },
}

/// State of one game
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    pub phase: SessionPhase,
    /// Cities for this session, sampled without replacement
    pub city_queue: Vec<City>,
    /// Rounds entered so far; the current city is `city_queue[city_index - 1]`
    pub city_index: usize,
    pub session_secs_remaining: u32,
    pub round_secs_remaining: u32,
    pub lat: f64,
    pub lon: f64,
    pub mode: CoordMode,
    pub score_log: Vec<ScoreEntry>,
    pub total_score: u32,
    /// Score of the last operator this round
    pub live_score: u32,
    pub quiz: BonusQuizState,
}

impl GameSession {
    pub fn idle(tuning: &Tuning) -> Self {
        Self {
            phase: SessionPhase::Idle,
            city_queue: Vec::new(),
            city_index: 0,
            session_secs_remaining: tuning.session_secs,
            round_secs_remaining: tuning.round_secs,
            lat: tuning.start_value,
            lon: tuning.start_value,
            mode: CoordMode::Lat,
            score_log: Vec::new(),
            total_score: 0,
            live_score: 0,
            quiz: BonusQuizState::default(),
        }
    }

    pub fn started(tuning: &Tuning, city_queue: Vec<City>) -> Self {
        Self {
            phase: SessionPhase::Active,
            city_queue,
            ..Self::idle(tuning)
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn current_city(&self) -> Option<&City> {
        if !self.is_active() {
            return None;
        }
        self.city_index
            .checked_sub(1)
            .and_then(|i| self.city_queue.get(i))
    }

    pub fn has_next_city(&self) -> bool {
        self.city_index < self.city_queue.len()
    }

    /// Accumulator the active mode writes to
    pub fn active_value(&self) -> f64 {
        match self.mode {
            CoordMode::Lat => self.lat,
            CoordMode::Lon => self.lon,
        }
    }

    pub fn set_active_value(&mut self, value: f64) {
        match self.mode {
            CoordMode::Lat => self.lat = value,
            CoordMode::Lon => self.lon = value,
        }
    }

    /// Degree-space distance from the accumulators to the current target
    pub fn distance_to_target(&self) -> Option<f64> {
        self.current_city()
            .map(|c| super::scoring::distance(self.lat, self.lon, c.lat, c.lon))
    }

    /// Record a finished round
    pub fn record(&mut self, city: &City, points: u32) {
        self.score_log.push(ScoreEntry {
            city: city.name.to_owned(),
            points,
        });
        self.total_score += points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CITIES;

    #[test]
    fn mode_toggles() {
        assert_eq!(CoordMode::Lat.toggled(), CoordMode::Lon);
        assert_eq!(CoordMode::Lon.toggled().as_str(), "LAT");
    }

    #[test]
    fn accumulators_follow_mode() {
        let tuning = Tuning::default();
        let mut s = GameSession::started(&tuning, CITIES[..2].to_vec());
        s.set_active_value(42.0);
        s.mode = CoordMode::Lon;
        s.set_active_value(-7.0);
        assert_eq!((s.lat, s.lon), (42.0, -7.0));
        assert_eq!(s.active_value(), -7.0);
    }

    #[test]
    fn current_city_tracks_index() {
        let tuning = Tuning::default();
        let mut s = GameSession::started(&tuning, CITIES[..2].to_vec());
        assert!(s.current_city().is_none());
        s.city_index = 1;
        assert_eq!(s.current_city().map(|c| c.name), Some(CITIES[0].name));
        assert!(s.has_next_city());
        s.city_index = 2;
        assert!(!s.has_next_city());
        s.phase = SessionPhase::Ended;
        assert!(s.current_city().is_none());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&GameEvent::RoundScored {
            city: "Oslo, Norway".into(),
            points: 120,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"RoundScored","city":"Oslo, Norway","points":120}"#);
    }
}
