//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Manual millisecond clock only (`Scheduler`)
//! - Seeded RNG only
//! - Timers dispatched in a stable order
//! - No rendering or platform dependencies beyond the globe view model

pub mod autoplay;
pub mod engine;
pub mod hud;
pub mod platform;
pub mod quiz;
pub mod scheduler;
pub mod scoring;
pub mod state;

pub use engine::{GameEngine, OperatorOutcome};
pub use hud::{BarBand, CountdownBar, ScoreBand, format_clock};
pub use platform::{
    CountdownStep, Effect, EffectKind, EffectOutcome, EffectUsage, PlatformNumber,
    PlatformSupply,
};
pub use quiz::{BonusQuizState, QuizOption};
pub use scheduler::{Scheduler, TimerKind};
pub use scoring::{MAX_SCORE, Operator, distance, score_from_distance};
pub use state::{CoordMode, EndReason, GameEvent, GameSession, ScoreEntry, SessionPhase};
