//! Operators and distance scoring

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OperatorRejection;

/// Arithmetic applied between an accumulator and the current number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn from_char(c: char) -> Result<Self, OperatorRejection> {
        match c {
            '+' => Ok(Operator::Add),
            '-' | '−' => Ok(Operator::Sub),
            '*' | 'x' | '×' => Ok(Operator::Mul),
            '/' | '÷' => Ok(Operator::Div),
            other => Err(OperatorRejection::UnknownOperator(other)),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Division by zero leaves the accumulator unchanged
    pub fn apply(&self, accumulator: f64, operand: i32) -> f64 {
        let operand = operand as f64;
        match self {
            Operator::Add => accumulator + operand,
            Operator::Sub => accumulator - operand,
            Operator::Mul => accumulator * operand,
            Operator::Div if operand == 0.0 => accumulator,
            Operator::Div => accumulator / operand,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Euclidean distance in degree space
#[inline]
pub fn distance(lat: f64, lon: f64, target_lat: f64, target_lon: f64) -> f64 {
    (lat - target_lat).hypot(lon - target_lon)
}

/// Perfect score, awarded within one degree
pub const MAX_SCORE: u32 = 5000;

/// Piecewise-linear score bands: (upper distance, score at lower edge, score at upper edge)
const BANDS: [(f64, f64, f64); 4] = [
    (5.0, 5000.0, 2000.0),
    (15.0, 2000.0, 500.0),
    (30.0, 500.0, 100.0),
    (60.0, 100.0, 0.0),
];

/// Points for ending a round `distance` degrees from the target
pub fn score_from_distance(distance: f64) -> u32 {
    if distance.is_nan() {
        return 0;
    }
    if distance <= 1.0 {
        return MAX_SCORE;
    }

    let mut lower = 1.0;
    for (upper, from, to) in BANDS {
        if distance <= upper {
            let t = (distance - lower) / (upper - lower);
            return (from - t * (from - to)).round().max(0.0) as u32;
        }
        lower = upper;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn band_edges() {
        assert_eq!(score_from_distance(0.0), 5000);
        assert_eq!(score_from_distance(1.0), 5000);
        assert_eq!(score_from_distance(3.0), 3500);
        assert_eq!(score_from_distance(5.0), 2000);
        assert_eq!(score_from_distance(15.0), 500);
        assert_eq!(score_from_distance(30.0), 100);
        assert_eq!(score_from_distance(60.0), 0);
        assert_eq!(score_from_distance(100.0), 0);
        assert_eq!(score_from_distance(f64::INFINITY), 0);
        assert_eq!(score_from_distance(f64::NAN), 0);
    }

    #[test]
    fn plus_and_division_guard() {
        assert_eq!(Operator::Add.apply(20.0, 5), 25.0);
        assert_eq!(Operator::Sub.apply(20.0, -5), 25.0);
        assert_eq!(Operator::Mul.apply(20.0, 3), 60.0);
        assert_eq!(Operator::Div.apply(20.0, 8), 2.5);
        assert_eq!(Operator::Div.apply(20.0, 0), 20.0);
    }

    #[test]
    fn operator_chars() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_char(op.symbol()), Ok(op));
        }
        assert_eq!(Operator::from_char('×'), Ok(Operator::Mul));
        assert_eq!(
            Operator::from_char('%'),
            Err(OperatorRejection::UnknownOperator('%'))
        );
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(23.0, 24.0, 20.0, 20.0), 5.0);
    }

    proptest! {
        #[test]
        fn score_is_monotonic(a in 0.0f64..200.0, b in 0.0f64..200.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(score_from_distance(near) >= score_from_distance(far));
        }

        #[test]
        fn score_stays_in_range(d in 0.0f64..1000.0) {
            prop_assert!(score_from_distance(d) <= MAX_SCORE);
        }
    }
}
