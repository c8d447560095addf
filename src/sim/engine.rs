//! The game engine
//!
//! Owns the session, the platform supply, the scheduler and the globe view.
//! Every call runs to completion: player actions and fired timers mutate
//! state, push `GameEvent`s and redraw the globe before returning.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::hud::{CountdownBar, format_clock};
use super::platform::{
    CountdownStep, Effect, EffectKind, EffectOutcome, PlatformNumber, PlatformSupply,
};
use super::scheduler::{Scheduler, TimerKind};
use super::scoring::{Operator, score_from_distance};
use super::state::{CoordMode, EndReason, GameEvent, GameSession, SessionPhase};
use crate::catalog::{self, City};
use crate::error::{EffectRejection, OperatorRejection, QuizRejection};
use crate::globe::{GlobeView, PlaceLookup, Viewport};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Round and session clocks tick once a second
const CLOCK_TICK_MS: u64 = 1000;

/// What an accepted operator did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorOutcome {
    pub op: Operator,
    pub operand: PlatformNumber,
    pub mode: CoordMode,
    pub value: f64,
    pub distance: f64,
    pub score: u32,
    pub quiz_opened: bool,
}

pub struct GameEngine {
    seed: u64,
    tuning: Tuning,
    rng: Pcg32,
    scheduler: Scheduler,
    supply: PlatformSupply,
    session: GameSession,
    globe: GlobeView,
    events: Vec<GameEvent>,
    last_message: String,
    sessions_played: u32,
}

impl GameEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Settings::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        let session = GameSession::idle(&tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            supply: PlatformSupply::new(),
            session,
            globe: GlobeView::new(Viewport::default(), settings),
            events: Vec::new(),
            last_message: String::new(),
            sessions_played: 0,
            tuning,
        }
    }

    // === Session lifecycle ===

    /// Start a session. No-op while one is already running.
    pub fn start(&mut self) -> bool {
        if self.session.is_active() {
            return false;
        }

        let cities = catalog::sample_cities(&mut self.rng, self.tuning.cities_per_session);
        self.session = GameSession::started(&self.tuning, cities);
        self.sessions_played += 1;

        self.scheduler.cancel_all();
        self.supply.reset_effects();
        self.supply.initialize(&mut self.rng, &self.tuning);
        self.scheduler
            .schedule_repeating(TimerKind::NumberCountdown, self.tuning.countdown_tick_ms);
        self.scheduler
            .schedule_repeating(TimerKind::SessionClock, CLOCK_TICK_MS);

        log::info!(
            "Session {} started (seed {}, {} cities)",
            self.sessions_played,
            self.seed,
            self.session.city_queue.len()
        );
        self.events.push(GameEvent::SessionStarted {
            seed: self.seed,
            cities: self.session.city_queue.len(),
        });

        self.enter_round();
        true
    }

    /// Stop a running session. Scores stay visible.
    pub fn end(&mut self) -> bool {
        if !self.session.is_active() {
            return false;
        }
        self.finish_session(EndReason::Stopped);
        true
    }

    fn finish_session(&mut self, reason: EndReason) {
        self.scheduler.cancel_all();
        self.supply.clear();
        self.session.quiz.close();
        self.session.phase = SessionPhase::Ended;
        self.globe.clear_target_city();

        log::info!(
            "Session ended ({:?}): {} points over {} rounds",
            reason,
            self.session.total_score,
            self.session.score_log.len()
        );
        self.last_message = format!("Game over! Total: {} points", self.session.total_score);
        self.events.push(GameEvent::SessionEnded {
            total: self.session.total_score,
            reason,
        });
    }

    fn enter_round(&mut self) {
        let Some(city) = self.session.city_queue.get(self.session.city_index).copied() else {
            self.finish_session(EndReason::Completed);
            return;
        };
        self.session.city_index += 1;

        let start = self.tuning.start_value;
        self.session.round_secs_remaining = self.tuning.round_secs;
        self.session.quiz.reset();
        self.session.live_score = 0;
        self.session.lat = start;
        self.session.lon = start;
        self.session.mode = CoordMode::Lat;

        self.globe.set_mode(CoordMode::Lat);
        self.globe.set_target_city(city);
        self.globe.set_latitude_line(Some(start));
        self.globe.set_longitude_line(Some(start));
        self.recenter();

        self.scheduler
            .schedule_repeating(TimerKind::RoundClock, CLOCK_TICK_MS);

        log::info!(
            "Round {}/{}: {}",
            self.session.city_index,
            self.session.city_queue.len(),
            city.name
        );
        self.last_message = format!("Find: {}", city.name);
        self.events.push(GameEvent::RoundStarted {
            index: self.session.city_index,
            city,
        });
    }

    /// Score the final position and move on
    fn exit_round(&mut self) {
        self.scheduler.cancel(TimerKind::RoundClock);
        self.session.quiz.close();

        if let Some(city) = self.session.current_city().copied() {
            let distance = self.session.distance_to_target().unwrap_or(f64::INFINITY);
            let points = score_from_distance(distance);
            self.session.record(&city, points);
            log::info!(
                "Round scored: {} at {:.1}° -> {} points",
                city.name,
                distance,
                points
            );
            self.events.push(GameEvent::RoundScored {
                city: city.name.to_owned(),
                points,
            });
        }

        if self.session.has_next_city() {
            self.enter_round();
        } else {
            self.finish_session(EndReason::Completed);
        }
    }

    /// Point the globe at the accumulators
    fn recenter(&mut self) {
        let tilt = self.tuning.center_tilt_for_latitude(self.session.lat);
        self.globe.set_rotation(-self.session.lon as f32, tilt);
    }

    // === Player actions ===

    pub fn apply_operator(&mut self, op: Operator) -> Result<OperatorOutcome, OperatorRejection> {
        if !self.session.is_active() {
            return Err(self.reject_operator(OperatorRejection::SessionInactive));
        }
        let Some(operand) = self.supply.take_current() else {
            return Err(self.reject_operator(OperatorRejection::NoCurrentNumber));
        };

        // The next number is promoted after a short feedback delay
        self.scheduler.cancel(TimerKind::NumberCountdown);
        self.scheduler
            .schedule_once(TimerKind::NumberConsumed, self.tuning.consume_delay_ms);

        let mode = self.session.mode;
        let value = op.apply(self.session.active_value(), operand.value);
        self.session.set_active_value(value);

        self.globe.update_coordinate(value);
        self.recenter();

        let distance = self.session.distance_to_target().unwrap_or(f64::INFINITY);
        let score = score_from_distance(distance);
        self.session.live_score = score;

        log::debug!(
            "{} {} {} -> {:.4} ({}, {:.2}° off, {} pts)",
            mode.as_str(),
            op,
            operand.value,
            value,
            operand.effect,
            distance,
            score
        );
        self.last_message = format!("{} = {:.4}", mode.as_str(), value);
        self.events.push(GameEvent::OperatorApplied {
            op,
            mode,
            value,
            distance,
            score,
        });

        let quiz_opened = score >= self.tuning.bonus_threshold && self.open_bonus_quiz();

        Ok(OperatorOutcome {
            op,
            operand,
            mode,
            value,
            distance,
            score,
            quiz_opened,
        })
    }

    pub fn apply_operator_char(&mut self, c: char) -> Result<OperatorOutcome, OperatorRejection> {
        let op = Operator::from_char(c).map_err(|e| self.reject_operator(e))?;
        self.apply_operator(op)
    }

    fn reject_operator(&mut self, rejection: OperatorRejection) -> OperatorRejection {
        log::debug!("Operator rejected: {}", rejection);
        self.last_message = rejection.to_string();
        rejection
    }

    pub fn apply_effect(&mut self, kind: EffectKind) -> Result<EffectOutcome, EffectRejection> {
        let result = if self.session.is_active() {
            self.supply.apply_effect(kind, &mut self.rng, &self.tuning)
        } else {
            Err(EffectRejection::SessionInactive)
        };

        match result {
            Ok(outcome) => {
                if self.tuning.effect_cooldown_ms > 0 {
                    self.scheduler.schedule_once(
                        TimerKind::EffectCooldown(kind),
                        self.tuning.effect_cooldown_ms,
                    );
                }
                self.last_message = match (kind, outcome.current.effect) {
                    (EffectKind::Break, Effect::Break2) => "DOUBLE BREAK! Numbers broken again!",
                    (EffectKind::Break, _) => "BREAK! Current & next numbers broken!",
                    (EffectKind::Magnify, _) => "MAGNIFY! Current & next numbers magnified!",
                }
                .to_owned();
                log::info!(
                    "{} applied (power {:.2}): current {}, next {}",
                    kind,
                    outcome.power,
                    outcome.current.value,
                    outcome.next.value
                );
                if outcome.blocked {
                    log::info!("{} used twice, blocked for {} numbers", kind, self.tuning.block_numbers);
                }
                self.events.push(GameEvent::EffectApplied {
                    kind,
                    current: outcome.current,
                    next: outcome.next,
                    blocked: outcome.blocked,
                });
                Ok(outcome)
            }
            Err(rejection) => {
                log::info!("{} rejected: {}", kind, rejection);
                self.last_message = rejection.to_string();
                self.events.push(GameEvent::EffectRejected {
                    kind,
                    reason: rejection.to_string(),
                });
                Err(rejection)
            }
        }
    }

    /// Switch accumulators. Neither value is reset.
    pub fn set_mode(&mut self, mode: CoordMode) {
        self.session.mode = mode;
        self.globe.set_mode(mode);
    }

    pub fn toggle_mode(&mut self) -> CoordMode {
        let mode = self.session.mode.toggled();
        self.set_mode(mode);
        mode
    }

    fn open_bonus_quiz(&mut self) -> bool {
        if !self.session.quiz.can_open() {
            return false;
        }
        let Some(city) = self.session.current_city().copied() else {
            return false;
        };
        self.session
            .quiz
            .open(&city, self.tuning.bonus_distractors, &mut self.rng);
        log::info!("Bonus quiz opened for {}", city.name);
        self.last_message = "BONUS! Which country is this city in?".to_owned();
        self.events.push(GameEvent::BonusQuizStarted {
            options: self.session.quiz.options.clone(),
        });
        true
    }

    pub fn answer_bonus_quiz(&mut self, index: usize) -> Result<bool, QuizRejection> {
        if !self.session.is_active() {
            return Err(QuizRejection::NoActiveQuiz);
        }
        let correct = self.session.quiz.answer(index)?;
        let bonus = if correct { self.tuning.bonus_points } else { 0 };
        self.session.total_score += bonus;

        log::info!("Bonus quiz answered: {}", if correct { "correct" } else { "wrong" });
        self.last_message = if correct {
            format!("Correct! +{bonus} bonus points!")
        } else {
            "Wrong answer, no bonus".to_owned()
        };
        self.events.push(GameEvent::BonusQuizAnswered { correct, bonus });
        Ok(correct)
    }

    /// Ask a place lookup about the globe's current lines
    pub fn lookup_nearest(&mut self, lookup: &dyn PlaceLookup) {
        let (lat, lon) = self.globe.lookup_point();
        let result = lookup.nearest(lat, lon);
        self.globe.apply_lookup(result);
    }

    // === Time ===

    /// Advance the simulated clock, dispatching every timer that comes due
    pub fn advance_time(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some(kind) = self.scheduler.pop_due(until) {
            self.dispatch(kind);
        }
        self.scheduler.finish_advance(until);
    }

    fn dispatch(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::RoundClock => {
                self.session.round_secs_remaining =
                    self.session.round_secs_remaining.saturating_sub(1);
                if self.session.round_secs_remaining == 0 {
                    self.exit_round();
                }
            }
            TimerKind::SessionClock => {
                self.session.session_secs_remaining =
                    self.session.session_secs_remaining.saturating_sub(1);
                if self.session.session_secs_remaining == 0 {
                    // The running round is not scored
                    self.finish_session(EndReason::TimeUp);
                }
            }
            TimerKind::NumberCountdown => {
                if self.supply.countdown_tick(&self.tuning) == CountdownStep::Expired {
                    self.advance_number(false);
                }
            }
            TimerKind::NumberConsumed => self.advance_number(true),
            TimerKind::EffectCooldown(effect) => {
                self.supply.finish_cooldown(effect);
                log::debug!("{} cooldown finished", effect);
                self.events.push(GameEvent::CooldownFinished { kind: effect });
            }
        }
    }

    fn advance_number(&mut self, consumed: bool) {
        let current = self.supply.advance(&mut self.rng, &self.tuning);
        self.scheduler
            .schedule_repeating(TimerKind::NumberCountdown, self.tuning.countdown_tick_ms);
        self.events.push(GameEvent::NumberAdvanced {
            current,
            next: self.supply.next(),
            consumed,
        });
    }

    // === Queries ===

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn mode(&self) -> CoordMode {
        self.session.mode
    }

    pub fn active_accumulator_value(&self) -> f64 {
        self.session.active_value()
    }

    pub fn current_city(&self) -> Option<&City> {
        self.session.current_city()
    }

    pub fn platform(&self) -> &PlatformSupply {
        &self.supply
    }

    pub fn globe(&self) -> &GlobeView {
        &self.globe
    }

    /// Manual rotation, marker and outline access for the UI layer
    pub fn globe_mut(&mut self) -> &mut GlobeView {
        &mut self.globe
    }

    pub fn rotate_by(&mut self, d_spin: f32, d_tilt: f32) {
        self.globe.rotate_by(d_spin, d_tilt);
    }

    pub fn set_rotation(&mut self, spin_deg: f32, tilt_deg: f32) {
        self.globe.set_rotation(spin_deg, tilt_deg);
    }

    /// Milliseconds until `kind` leaves cooldown, `None` when it is not cooling down
    pub fn cooldown_remaining_ms(&self, kind: EffectKind) -> Option<u64> {
        self.scheduler.time_until(TimerKind::EffectCooldown(kind))
    }

    pub fn countdown_bar(&self) -> CountdownBar {
        CountdownBar::for_platform(
            self.supply.countdown_remaining_ms(),
            self.supply.grace_elapsed_ms(),
            &self.tuning,
            self.globe.settings().reduced_motion,
        )
    }

    pub fn round_bar(&self) -> CountdownBar {
        CountdownBar::for_round(self.session.round_secs_remaining, self.tuning.round_secs)
    }

    /// `m:ss` left in the session
    pub fn session_clock_text(&self) -> String {
        format_clock(self.session.session_secs_remaining)
    }

    /// `City i/n`
    pub fn round_label(&self) -> String {
        let total = if self.session.city_queue.is_empty() {
            self.tuning.cities_per_session
        } else {
            self.session.city_queue.len()
        };
        format!("City {}/{}", self.session.city_index, total)
    }

    pub fn accumulator_text(&self) -> String {
        format!("{:.4}", self.session.active_value())
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
