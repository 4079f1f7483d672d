//! Interval-gated spawn triggers.

use rand::Rng;

/// Fires at most once per `interval_ms`, driven purely by the timestamps it
/// is handed.  With a non-zero jitter the timer may fire early, with a
/// chance that rises as the nominal interval approaches.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTimer {
    /// `None` right after construction or `reset`, so the next call fires.
    last_fired_at: Option<f64>,
    interval_ms: f64,
    jitter_ms: f64,
}

impl SpawnTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self::with_jitter(interval_ms, 0.0)
    }

    pub fn with_jitter(interval_ms: f64, jitter_ms: f64) -> Self {
        Self {
            last_fired_at: None,
            interval_ms,
            jitter_ms: jitter_ms.max(0.0),
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn last_fired_at(&self) -> Option<f64> {
        self.last_fired_at
    }

    /// Deterministic check: fires iff `now - last_fired_at >= interval_ms`.
    pub fn fire_at(&mut self, now: f64) -> bool {
        let due = match self.last_fired_at {
            None => true,
            Some(last) => now - last >= self.interval_ms,
        };
        if due {
            self.last_fired_at = Some(now);
        }
        due
    }

    /// Jittered check.  Fires when the remaining gap to the nominal interval
    /// drops below a uniform draw from `[0, jitter_ms)`.  A zero jitter
    /// falls back to `fire_at` and never fires early.
    pub fn fire(&mut self, now: f64, rng: &mut impl Rng) -> bool {
        let last = match self.last_fired_at {
            Some(last) if self.jitter_ms > 0.0 => last,
            _ => return self.fire_at(now),
        };

        let gap = self.interval_ms - (now - last);
        if gap < rng.gen_range(0.0..self.jitter_ms) {
            self.last_fired_at = Some(now);
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.last_fired_at = None;
    }
}
