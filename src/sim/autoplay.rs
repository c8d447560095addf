//! Scripted greedy player for headless runs

use super::engine::GameEngine;
use super::scoring::{Operator, distance};
use super::state::{CoordMode, ScoreEntry};

/// Simulated time between two decisions
pub const DEFAULT_THINK_MS: u64 = 100;

/// Smallest distance gain worth spending a number on
const MIN_GAIN_DEG: f64 = 1e-3;

/// Best operator for the current number, if any improves on `current_distance`
fn best_move(engine: &GameEngine) -> Option<(CoordMode, Operator)> {
    let session = engine.session();
    let target = session.current_city()?;
    let operand = engine.platform().current()?.value;

    let here = distance(session.lat, session.lon, target.lat, target.lon);
    let mut best: Option<(f64, CoordMode, Operator)> = None;

    for mode in [CoordMode::Lat, CoordMode::Lon] {
        for op in Operator::ALL {
            let (lat, lon) = match mode {
                CoordMode::Lat => (op.apply(session.lat, operand), session.lon),
                CoordMode::Lon => (session.lat, op.apply(session.lon, operand)),
            };
            let d = distance(lat, lon, target.lat, target.lon);
            if d + MIN_GAIN_DEG < here && best.is_none_or(|(b, _, _)| d < b) {
                best = Some((d, mode, op));
            }
        }
    }
    best.map(|(_, mode, op)| (mode, op))
}

/// One decision: answer an open quiz, else spend the current number if it helps
pub fn step(engine: &mut GameEngine) {
    let quiz = &engine.session().quiz;
    if quiz.active {
        if let Some(index) = quiz.correct_index() {
            if let Err(e) = engine.answer_bonus_quiz(index) {
                log::debug!("Autoplay quiz answer rejected: {}", e);
            }
        }
        return;
    }

    if let Some((mode, op)) = best_move(engine) {
        if engine.mode() != mode {
            engine.set_mode(mode);
        }
        if let Err(e) = engine.apply_operator(op) {
            log::debug!("Autoplay move rejected: {}", e);
        }
    }
}

/// Start a session and play it to the end on the simulated clock
pub fn play_session(engine: &mut GameEngine, think_ms: u64) -> Vec<ScoreEntry> {
    if !engine.start() {
        log::warn!("Autoplay asked to start while a session is running");
    }
    let think_ms = think_ms.max(1);
    while engine.is_session_active() {
        step(engine);
        engine.advance_time(think_ms);
    }
    engine.session().score_log.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SessionPhase;

    #[test]
    fn greedy_player_finishes_a_session() {
        let mut engine = GameEngine::new(2024);
        let log = play_session(&mut engine, DEFAULT_THINK_MS);
        assert_eq!(engine.phase(), SessionPhase::Ended);
        assert_eq!(log.len(), 10);
        assert!(engine.session().total_score > 0);
        assert_eq!(engine.now_ms(), 300_000);
    }

    #[test]
    fn greedy_player_is_deterministic() {
        let run = || {
            let mut engine = GameEngine::new(77);
            play_session(&mut engine, 250)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn no_move_without_a_number() {
        let engine = GameEngine::new(3);
        assert!(best_move(&engine).is_none());
    }
}
