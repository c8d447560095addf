//! Platform number supply
//!
//! Keeps the two-slot `current`/`next` queue, the per-number countdown and
//! the BREAK/MAGNIFY usage rules. Timing is driven from outside: the engine
//! calls `countdown_tick` from its scheduler.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EffectRejection;
use crate::tuning::Tuning;

/// A player-triggered distortion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Break,
    Magnify,
}

impl EffectKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "break" => Some(EffectKind::Break),
            "magnify" => Some(EffectKind::Magnify),
            _ => None,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EffectKind::Break => "Break",
            EffectKind::Magnify => "Magnify",
        })
    }
}

/// Tag carried by a platform number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Effect {
    #[default]
    None,
    Break,
    /// Broken twice in a row
    Break2,
    Magnify,
}

impl Effect {
    #[inline]
    pub fn is_break(&self) -> bool {
        matches!(self, Effect::Break | Effect::Break2)
    }

    /// True if `kind` may not be applied on top of this tag
    pub fn conflicts_with(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Break => *self == Effect::Magnify,
            EffectKind::Magnify => self.is_break(),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Effect::None => "NONE",
            Effect::Break => "BREAK",
            Effect::Break2 => "BREAK2",
            Effect::Magnify => "MAGNIFY",
        })
    }
}

/// A consumable operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformNumber {
    pub value: i32,
    pub effect: Effect,
}

impl PlatformNumber {
    pub const fn plain(value: i32) -> Self {
        Self {
            value,
            effect: Effect::None,
        }
    }
}

/// Usage bookkeeping for one effect kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectUsage {
    /// Uses since the last reset (0 or 1 between calls)
    pub uses_since_reset: u8,
    /// Numbers left before the kind unblocks
    pub block_countdown: u8,
    pub cooling_down: bool,
}

impl EffectUsage {
    #[inline]
    pub fn is_available(&self) -> bool {
        self.block_countdown == 0 && !self.cooling_down
    }
}

/// What a successful effect did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectOutcome {
    pub kind: EffectKind,
    pub power: f64,
    pub current: PlatformNumber,
    pub next: PlatformNumber,
    /// `next` was transformed too
    pub next_changed: bool,
    /// This use triggered the block
    pub blocked: bool,
}

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    Running { remaining_ms: u64 },
    Grace { elapsed_ms: u64 },
    /// Grace is over; the supply must advance
    Expired,
}

/// `sign(v) * round(|v|^power)`
pub fn distort(value: i32, power: f64) -> i32 {
    let magnitude = (value.unsigned_abs() as f64).powf(power).round();
    value.signum() * magnitude.min(i32::MAX as f64) as i32
}

/// Uniform pick from the legal number domain
pub fn generate_number<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> i32 {
    let candidates: Vec<i32> = (tuning.number_min..=tuning.number_max)
        .filter(|v| !tuning.excluded_numbers.contains(v))
        .collect();
    if candidates.is_empty() {
        log::warn!("Number range has no legal values, using {}", tuning.number_min);
        return tuning.number_min;
    }
    candidates[rng.random_range(0..candidates.len())]
}

fn sample_power<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

#[derive(Debug, Clone, Default)]
pub struct PlatformSupply {
    current: Option<PlatformNumber>,
    next: Option<PlatformNumber>,
    break_usage: EffectUsage,
    magnify_usage: EffectUsage,
    countdown_remaining_ms: u64,
    grace_elapsed_ms: u64,
}

impl PlatformSupply {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed both slots with untagged numbers and restart the countdown
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning) {
        self.current = Some(PlatformNumber::plain(generate_number(rng, tuning)));
        self.next = Some(PlatformNumber::plain(generate_number(rng, tuning)));
        self.reset_countdown(tuning);
        log::debug!("Platform initialized: {:?} / {:?}", self.current, self.next);
    }

    #[inline]
    pub fn current(&self) -> Option<PlatformNumber> {
        self.current
    }

    #[inline]
    pub fn next(&self) -> Option<PlatformNumber> {
        self.next
    }

    pub fn usage(&self, kind: EffectKind) -> &EffectUsage {
        match kind {
            EffectKind::Break => &self.break_usage,
            EffectKind::Magnify => &self.magnify_usage,
        }
    }

    fn usage_mut(&mut self, kind: EffectKind) -> &mut EffectUsage {
        match kind {
            EffectKind::Break => &mut self.break_usage,
            EffectKind::Magnify => &mut self.magnify_usage,
        }
    }

    /// Consume `current` for an operator.
    ///
    /// A kind's usage counter survives only if the consumed number carries
    /// that kind's tag.
    pub fn take_current(&mut self) -> Option<PlatformNumber> {
        let taken = self.current.take()?;
        if !taken.effect.is_break() {
            self.break_usage.uses_since_reset = 0;
        }
        if taken.effect != Effect::Magnify {
            self.magnify_usage.uses_since_reset = 0;
        }
        Some(taken)
    }

    /// Promote `next`, draw a fresh untagged `next`, tick blocks down and
    /// restart the countdown
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning) -> PlatformNumber {
        let promoted = self
            .next
            .take()
            .unwrap_or_else(|| PlatformNumber::plain(generate_number(rng, tuning)));
        self.current = Some(promoted);
        self.next = Some(PlatformNumber::plain(generate_number(rng, tuning)));

        for usage in [&mut self.break_usage, &mut self.magnify_usage] {
            usage.block_countdown = usage.block_countdown.saturating_sub(1);
        }
        self.reset_countdown(tuning);

        log::debug!("Platform advanced: {:?} / {:?}", self.current, self.next);
        promoted
    }

    fn reset_countdown(&mut self, tuning: &Tuning) {
        self.countdown_remaining_ms = tuning.countdown_ms;
        self.grace_elapsed_ms = 0;
    }

    /// One countdown step of `tuning.countdown_tick_ms`
    pub fn countdown_tick(&mut self, tuning: &Tuning) -> CountdownStep {
        let tick = tuning.countdown_tick_ms;
        if self.countdown_remaining_ms > 0 {
            self.countdown_remaining_ms = self.countdown_remaining_ms.saturating_sub(tick);
            CountdownStep::Running {
                remaining_ms: self.countdown_remaining_ms,
            }
        } else if self.grace_elapsed_ms < tuning.grace_ms {
            self.grace_elapsed_ms += tick;
            CountdownStep::Grace {
                elapsed_ms: self.grace_elapsed_ms,
            }
        } else {
            CountdownStep::Expired
        }
    }

    pub fn countdown_remaining_ms(&self) -> u64 {
        self.countdown_remaining_ms
    }

    pub fn grace_elapsed_ms(&self) -> u64 {
        self.grace_elapsed_ms
    }

    /// Distort `current` (and `next` unless it carries the opposing tag)
    pub fn apply_effect<R: Rng + ?Sized>(
        &mut self,
        kind: EffectKind,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Result<EffectOutcome, EffectRejection> {
        let usage = *self.usage(kind);
        if usage.cooling_down {
            return Err(EffectRejection::CoolingDown(kind));
        }
        if usage.block_countdown > 0 {
            return Err(EffectRejection::Blocked {
                kind,
                remaining: usage.block_countdown,
            });
        }
        let Some(mut current) = self.current else {
            return Err(EffectRejection::NoCurrentNumber);
        };
        if current.effect.conflicts_with(kind) {
            return Err(EffectRejection::Incompatible {
                applied: kind,
                existing: current.effect,
            });
        }

        let range = match kind {
            EffectKind::Break => tuning.break_power,
            EffectKind::Magnify => tuning.magnify_power,
        };
        let power = sample_power(rng, range);

        current.value = distort(current.value, power);
        current.effect = match kind {
            EffectKind::Break if current.effect == Effect::Break => Effect::Break2,
            EffectKind::Break => Effect::Break,
            EffectKind::Magnify => Effect::Magnify,
        };
        self.current = Some(current);

        let mut next_changed = false;
        if let Some(next) = self.next.as_mut() {
            if !next.effect.conflicts_with(kind) {
                // `next` gets its own exponent
                next.value = distort(next.value, sample_power(rng, range));
                next.effect = match kind {
                    EffectKind::Break => Effect::Break,
                    EffectKind::Magnify => Effect::Magnify,
                };
                next_changed = true;
            }
        }

        let usage = self.usage_mut(kind);
        usage.cooling_down = tuning.effect_cooldown_ms > 0;
        usage.uses_since_reset += 1;
        let blocked = usage.uses_since_reset >= 2;
        if blocked {
            usage.block_countdown = tuning.block_numbers;
            usage.uses_since_reset = 0;
        }

        Ok(EffectOutcome {
            kind,
            power,
            current,
            next: self.next.unwrap_or(current),
            next_changed,
            blocked,
        })
    }

    pub fn finish_cooldown(&mut self, kind: EffectKind) {
        self.usage_mut(kind).cooling_down = false;
    }

    pub fn reset_effects(&mut self) {
        self.break_usage = EffectUsage::default();
        self.magnify_usage = EffectUsage::default();
    }

    /// Empty both slots and forget all usage
    pub fn clear(&mut self) {
        self.current = None;
        self.next = None;
        self.reset_effects();
        self.countdown_remaining_ms = 0;
        self.grace_elapsed_ms = 0;
    }

    #[cfg(test)]
    pub(crate) fn replace_queue(&mut self, current: Option<PlatformNumber>, next: Option<PlatformNumber>) {
        self.current = current;
        self.next = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(current: i32, next: i32) -> (PlatformSupply, Pcg32, Tuning) {
        let mut supply = PlatformSupply::new();
        supply.replace_queue(
            Some(PlatformNumber::plain(current)),
            Some(PlatformNumber::plain(next)),
        );
        (supply, Pcg32::seed_from_u64(3), Tuning::default())
    }

    #[test]
    fn distort_keeps_sign_and_rounds() {
        assert_eq!(distort(9, 0.5), 3);
        assert_eq!(distort(-9, 0.5), -3);
        assert_eq!(distort(4, 1.5), 8);
        assert_eq!(distort(0, 1.5), 0);
    }

    #[test]
    fn advance_promotes_next() {
        let (mut supply, mut rng, tuning) = setup(5, 7);
        let promoted = supply.advance(&mut rng, &tuning);
        assert_eq!(promoted, PlatformNumber::plain(7));
        assert_eq!(supply.current(), Some(PlatformNumber::plain(7)));
        let fresh = supply.next().unwrap();
        assert_eq!(fresh.effect, Effect::None);
        assert!(tuning.is_valid_number(fresh.value));
    }

    #[test]
    fn countdown_runs_then_grace_then_expires() {
        let (mut supply, mut rng, tuning) = setup(5, 7);
        supply.advance(&mut rng, &tuning);
        let mut steps = Vec::new();
        loop {
            let step = supply.countdown_tick(&tuning);
            steps.push(step);
            if step == CountdownStep::Expired {
                break;
            }
        }
        // 55 running ticks, 5 grace ticks, then expiry
        assert_eq!(steps.len(), 61);
        assert_eq!(steps[54], CountdownStep::Running { remaining_ms: 0 });
        assert_eq!(steps[55], CountdownStep::Grace { elapsed_ms: 100 });
        assert_eq!(steps[59], CountdownStep::Grace { elapsed_ms: 500 });
    }

    #[test]
    fn break_tags_current_and_next() {
        let (mut supply, mut rng, tuning) = setup(9, -12);
        let out = supply.apply_effect(EffectKind::Break, &mut rng, &tuning).unwrap();
        assert_eq!(out.current.effect, Effect::Break);
        assert!(out.current.value > 0 && out.current.value < 9);
        assert!(out.next_changed);
        assert_eq!(out.next.effect, Effect::Break);
        assert!(out.next.value < 0 && out.next.value > -12);
        assert!((0.4..0.8).contains(&out.power));
        assert!(supply.usage(EffectKind::Break).cooling_down);
    }

    #[test]
    fn second_break_gives_break2_and_blocks() {
        let (mut supply, mut rng, mut tuning) = setup(15, 15);
        tuning.effect_cooldown_ms = 0;
        supply.apply_effect(EffectKind::Break, &mut rng, &tuning).unwrap();
        let out = supply.apply_effect(EffectKind::Break, &mut rng, &tuning).unwrap();
        assert_eq!(out.current.effect, Effect::Break2);
        assert!(out.blocked);
        let usage = supply.usage(EffectKind::Break);
        assert_eq!(usage.block_countdown, 3);
        assert_eq!(usage.uses_since_reset, 0);

        // Blocked for three advances
        for remaining in [3, 2, 1] {
            assert_eq!(
                supply.apply_effect(EffectKind::Break, &mut rng, &tuning),
                Err(EffectRejection::Blocked {
                    kind: EffectKind::Break,
                    remaining
                })
            );
            supply.advance(&mut rng, &tuning);
        }
        assert!(supply.apply_effect(EffectKind::Break, &mut rng, &tuning).is_ok());
    }

    #[test]
    fn propagated_break_counts_for_break2() {
        let (mut supply, mut rng, mut tuning) = setup(8, 8);
        tuning.effect_cooldown_ms = 0;
        supply.apply_effect(EffectKind::Break, &mut rng, &tuning).unwrap();
        supply.advance(&mut rng, &tuning);
        assert_eq!(supply.current().unwrap().effect, Effect::Break);
        let out = supply.apply_effect(EffectKind::Break, &mut rng, &tuning).unwrap();
        assert_eq!(out.current.effect, Effect::Break2);
    }

    #[test]
    fn opposing_tags_are_rejected() {
        let (mut supply, mut rng, mut tuning) = setup(6, 6);
        tuning.effect_cooldown_ms = 0;
        supply.apply_effect(EffectKind::Magnify, &mut rng, &tuning).unwrap();
        let before = supply.current();
        assert_eq!(
            supply.apply_effect(EffectKind::Break, &mut rng, &tuning),
            Err(EffectRejection::Incompatible {
                applied: EffectKind::Break,
                existing: Effect::Magnify
            })
        );
        assert_eq!(supply.current(), before);
        assert_eq!(supply.usage(EffectKind::Break).uses_since_reset, 0);
    }

    #[test]
    fn next_with_opposing_tag_is_left_alone() {
        let (mut supply, mut rng, tuning) = setup(6, 6);
        supply.replace_queue(
            Some(PlatformNumber::plain(6)),
            Some(PlatformNumber {
                value: 20,
                effect: Effect::Magnify,
            }),
        );
        let out = supply.apply_effect(EffectKind::Break, &mut rng, &tuning).unwrap();
        assert!(!out.next_changed);
        assert_eq!(out.next.value, 20);
        assert_eq!(out.next.effect, Effect::Magnify);
    }

    #[test]
    fn cooldown_rejects_until_finished() {
        let (mut supply, mut rng, tuning) = setup(6, 6);
        supply.apply_effect(EffectKind::Magnify, &mut rng, &tuning).unwrap();
        assert_eq!(
            supply.apply_effect(EffectKind::Magnify, &mut rng, &tuning),
            Err(EffectRejection::CoolingDown(EffectKind::Magnify))
        );
        supply.finish_cooldown(EffectKind::Magnify);
        assert!(supply.apply_effect(EffectKind::Magnify, &mut rng, &tuning).is_ok());
    }

    #[test]
    fn consuming_resets_usage_unless_tagged() {
        let (mut supply, mut rng, tuning) = setup(6, 6);
        supply.apply_effect(EffectKind::Break, &mut rng, &tuning).unwrap();
        assert_eq!(supply.usage(EffectKind::Break).uses_since_reset, 1);
        // Consumed number carries BREAK, counter survives
        supply.take_current();
        assert_eq!(supply.usage(EffectKind::Break).uses_since_reset, 1);
        assert!(supply.current().is_none());

        supply.replace_queue(Some(PlatformNumber::plain(3)), Some(PlatformNumber::plain(4)));
        supply.take_current();
        assert_eq!(supply.usage(EffectKind::Break).uses_since_reset, 0);
    }

    #[test]
    fn auto_advance_keeps_usage() {
        let (mut supply, mut rng, tuning) = setup(6, 6);
        supply.apply_effect(EffectKind::Magnify, &mut rng, &tuning).unwrap();
        supply.advance(&mut rng, &tuning);
        supply.advance(&mut rng, &tuning);
        assert_eq!(supply.usage(EffectKind::Magnify).uses_since_reset, 1);
    }

    #[test]
    fn effects_need_a_current_number() {
        let mut supply = PlatformSupply::new();
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(
            supply.apply_effect(EffectKind::Break, &mut rng, &Tuning::default()),
            Err(EffectRejection::NoCurrentNumber)
        );
    }

    #[test]
    fn clear_forgets_everything() {
        let (mut supply, mut rng, tuning) = setup(6, 6);
        supply.apply_effect(EffectKind::Break, &mut rng, &tuning).unwrap();
        supply.clear();
        assert!(supply.current().is_none() && supply.next().is_none());
        assert_eq!(*supply.usage(EffectKind::Break), EffectUsage::default());
    }

    #[test]
    fn effect_names_parse() {
        assert_eq!(EffectKind::from_name(" BREAK "), Some(EffectKind::Break));
        assert_eq!(EffectKind::from_name("magnify"), Some(EffectKind::Magnify));
        assert_eq!(EffectKind::from_name("shrink"), None);
    }

    proptest! {
        #[test]
        fn generated_numbers_stay_in_domain(seed in any::<u64>()) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..64 {
                let v = generate_number(&mut rng, &tuning);
                prop_assert!((-5..=15).contains(&v));
                prop_assert!(v != 0 && v != 1);
            }
        }

        #[test]
        fn distortion_direction_matches_kind(v in -5i32..=15, p_break in 0.4f64..0.8, p_mag in 1.3f64..1.8) {
            prop_assume!(v != 0 && v != 1);
            prop_assert!(distort(v, p_break).abs() <= v.abs());
            prop_assert!(distort(v, p_mag).abs() >= v.abs());
            prop_assert_eq!(distort(v, p_break).signum(), v.signum());
        }
    }
}
