//! Rejection types for player-triggered operations
//!
//! None of these are fatal. A rejection leaves every piece of game state
//! untouched and carries the message shown to the player.

use crate::sim::platform::{Effect, EffectKind};

/// Why an arithmetic operator could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OperatorRejection {
    #[error("Start the game first!")]
    SessionInactive,
    #[error("No platform number to use yet")]
    NoCurrentNumber,
    #[error("Unknown operator '{0}'")]
    UnknownOperator(char),
}

/// Why a BREAK/MAGNIFY request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EffectRejection {
    #[error("Start the game first!")]
    SessionInactive,
    #[error("No platform number to change yet")]
    NoCurrentNumber,
    #[error("{0} is on cooldown!")]
    CoolingDown(EffectKind),
    #[error("{kind} is blocked for {remaining} more numbers!")]
    Blocked { kind: EffectKind, remaining: u8 },
    #[error("Cannot {applied} a number tagged {existing}!")]
    Incompatible { applied: EffectKind, existing: Effect },
}

/// Why a bonus quiz answer was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuizRejection {
    #[error("No bonus quiz is open")]
    NoActiveQuiz,
    #[error("Quiz option {0} does not exist")]
    InvalidChoice(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_player_facing() {
        assert_eq!(
            EffectRejection::CoolingDown(EffectKind::Break).to_string(),
            "Break is on cooldown!"
        );
        assert_eq!(
            EffectRejection::Blocked {
                kind: EffectKind::Magnify,
                remaining: 2
            }
            .to_string(),
            "Magnify is blocked for 2 more numbers!"
        );
        assert_eq!(
            EffectRejection::Incompatible {
                applied: EffectKind::Break,
                existing: Effect::Magnify
            }
            .to_string(),
            "Cannot Break a number tagged MAGNIFY!"
        );
        assert_eq!(
            OperatorRejection::UnknownOperator('%').to_string(),
            "Unknown operator '%'"
        );
    }
}
