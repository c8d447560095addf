//! Manual-clock timer scheduler
//!
//! Replaces interval callbacks with named timers on a simulated millisecond
//! clock. Timers due at the same instant fire by kind priority, then by
//! registration order, so a run is fully reproducible.

use super::platform::EffectKind;

/// Every timer the game uses. At most one of each kind is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Per-city countdown, 1 s period
    RoundClock,
    /// Whole-session countdown, 1 s period
    SessionClock,
    /// Platform number countdown, 100 ms period
    NumberCountdown,
    /// One-shot delay between consuming a number and promoting the next
    NumberConsumed,
    /// One-shot end of an effect cooldown
    EffectCooldown(EffectKind),
}

impl TimerKind {
    /// Lower fires first among timers due at the same instant
    pub fn priority(&self) -> u8 {
        match self {
            TimerKind::RoundClock => 0,
            TimerKind::SessionClock => 1,
            TimerKind::NumberCountdown => 2,
            TimerKind::NumberConsumed => 3,
            TimerKind::EffectCooldown(EffectKind::Break) => 4,
            TimerKind::EffectCooldown(EffectKind::Magnify) => 5,
        }
    }
}

#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    due_ms: u64,
    interval_ms: Option<u64>,
    order: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_order: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire `kind` once after `delay_ms`, replacing any pending one
    pub fn schedule_once(&mut self, kind: TimerKind, delay_ms: u64) {
        self.insert(kind, self.now_ms + delay_ms, None);
    }

    /// Fire `kind` every `interval_ms` (at least 1), first after one interval
    pub fn schedule_repeating(&mut self, kind: TimerKind, interval_ms: u64) {
        let interval = interval_ms.max(1);
        self.insert(kind, self.now_ms + interval, Some(interval));
    }

    fn insert(&mut self, kind: TimerKind, due_ms: u64, interval_ms: Option<u64>) {
        self.cancel(kind);
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.timers.push(Timer {
            kind,
            due_ms,
            interval_ms,
            order,
        });
    }

    /// Returns true if a timer was removed
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.kind != kind);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    pub fn scheduled_count(&self) -> usize {
        self.timers.len()
    }

    /// Milliseconds until `kind` next fires
    pub fn time_until(&self, kind: TimerKind) -> Option<u64> {
        self.timers
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.due_ms.saturating_sub(self.now_ms))
    }

    /// Pop the next timer due at or before `until_ms`.
    ///
    /// The clock moves to the timer's due time and repeating timers are
    /// rearmed. Callers dispatch one timer at a time and call again, so a
    /// timer cancelled by an earlier dispatch never fires.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerKind> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .cmp(&b.due_ms)
                    .then_with(|| a.kind.priority().cmp(&b.kind.priority()))
                    .then_with(|| a.order.cmp(&b.order))
            })
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        let kind = timer.kind;
        self.now_ms = self.now_ms.max(timer.due_ms);
        match timer.interval_ms {
            Some(interval) => timer.due_ms += interval,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(kind)
    }

    /// Move the clock to `until_ms` once nothing else is due
    pub fn finish_advance(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    /// Advance by `ms` without dispatching, returning what fired in order
    pub fn advance(&mut self, ms: u64) -> Vec<TimerKind> {
        let until = self.now_ms + ms;
        let mut fired = Vec::new();
        while let Some(kind) = self.pop_due(until) {
            fired.push(kind);
        }
        self.finish_advance(until);
        fired
    }
}
