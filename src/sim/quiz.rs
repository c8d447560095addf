//! One-shot bonus quiz: name the target city's country

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::catalog::{City, Country, distinct_countries};
use crate::error::QuizRejection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOption {
    pub country: Country,
    pub correct: bool,
}

/// Per-round quiz state. At most one quiz opens per round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BonusQuizState {
    pub active: bool,
    pub answered: bool,
    pub options: Vec<QuizOption>,
}

impl BonusQuizState {
    /// Round entry
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn can_open(&self) -> bool {
        !self.active && !self.answered
    }

    /// Build the options: the right country plus `distractors` other
    /// countries, shuffled
    pub fn open<R: Rng + ?Sized>(&mut self, city: &City, distractors: usize, rng: &mut R) {
        let mut others: Vec<Country> = distinct_countries()
            .into_iter()
            .filter(|c| c.code != city.code)
            .collect();
        others.shuffle(rng);

        let mut options: Vec<QuizOption> = others
            .into_iter()
            .take(distractors)
            .map(|country| QuizOption {
                country,
                correct: false,
            })
            .collect();
        options.push(QuizOption {
            country: Country {
                name: city.country,
                code: city.code,
            },
            correct: true,
        });
        options.shuffle(rng);

        self.options = options;
        self.active = true;
    }

    /// Returns whether the pick was right; the quiz closes either way
    pub fn answer(&mut self, index: usize) -> Result<bool, QuizRejection> {
        if !self.active {
            return Err(QuizRejection::NoActiveQuiz);
        }
        let option = self
            .options
            .get(index)
            .ok_or(QuizRejection::InvalidChoice(index))?;
        let correct = option.correct;
        self.active = false;
        self.answered = true;
        Ok(correct)
    }

    /// Round exit hides an open quiz without awarding anything
    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.correct)
    }
}
