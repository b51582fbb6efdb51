//! Simulation time model.
//!
//! # Design
//!
//! Time is an integer count of microseconds since the start of the run.
//! Integer time keeps event ordering exact: two events scheduled for the
//! same instant compare equal, and the scheduler breaks the tie by insertion
//! order.  Mobility feeds and configuration speak in (fractional) seconds;
//! conversions happen only at those boundaries.

use std::fmt;

use crate::{PrError, PrResult};

const MICROS_PER_SEC: u64 = 1_000_000;
const MICROS_PER_MILLI: u64 = 1_000;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation instant, in microseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    #[inline]
    pub fn from_secs(secs: u64) -> SimTime {
        SimTime(secs * MICROS_PER_SEC)
    }

    #[inline]
    pub fn from_millis(millis: u64) -> SimTime {
        SimTime(millis * MICROS_PER_MILLI)
    }

    /// Round fractional seconds to the nearest microsecond.  Negative and
    /// non-finite inputs clamp to zero.
    pub fn from_secs_f64(secs: f64) -> SimTime {
        if !secs.is_finite() || secs <= 0.0 {
            return SimTime::ZERO;
        }
        SimTime((secs * MICROS_PER_SEC as f64).round() as u64)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / MICROS_PER_SEC as f64
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / MICROS_PER_MILLI
    }

    /// Saturating offset, so adding a very long delay to a late instant never
    /// wraps around to the past.
    #[inline]
    pub fn offset(self, delay: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(delay.0))
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        self.offset(rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = SimTime;
    #[inline]
    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.as_secs_f64())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation clock and its stop horizon.
///
/// `now` starts before any event (`None`) and only ever moves forward.
#[derive(Clone, Debug)]
pub struct SimClock {
    now: Option<SimTime>,
    stop_time: SimTime,
}

impl SimClock {
    pub fn new(stop_time: SimTime) -> Self {
        Self { now: None, stop_time }
    }

    /// Current instant; `SimTime::ZERO` before the first event executed.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now.unwrap_or(SimTime::ZERO)
    }

    #[inline]
    pub fn stop_time(&self) -> SimTime {
        self.stop_time
    }

    #[inline]
    pub fn has_started(&self) -> bool {
        self.now.is_some()
    }

    /// `true` once the clock reached the stop horizon.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.now.is_some_and(|t| t >= self.stop_time)
    }

    /// Move the clock to `t`.  Earlier instants are ignored: the clock never
    /// goes backwards.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        if self.now.is_none_or(|now| t > now) {
            self.now = Some(t);
        }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}s (stop {}s)", self.now(), self.stop_time)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level configuration.
///
/// Typically loaded from TOML by the application crate as part of a larger
/// scenario file.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// No event at or after this instant is executed.
    pub stop_time_secs: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// First statistics collection instant.
    pub collection_start_secs: f64,

    /// Interval between statistics collections.  Zero disables periodic
    /// collection; final statistics are still written.
    pub collection_interval_secs: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            stop_time_secs: 3_600.0,
            seed: 1,
            collection_start_secs: 0.0,
            collection_interval_secs: 60.0,
        }
    }
}

impl SimConfig {
    #[inline]
    pub fn stop_time(&self) -> SimTime {
        SimTime::from_secs_f64(self.stop_time_secs)
    }

    /// Every time field must be finite and representable in microseconds.
    pub fn validate(&self) -> PrResult<()> {
        let bad = |what: &str, value: f64| Err(PrError::Config(format!("{what} = {value} is not allowed")));
        if !self.stop_time_secs.is_finite() || self.stop_time() == SimTime::ZERO {
            return bad("stop_time_secs", self.stop_time_secs);
        }
        if !self.collection_start_secs.is_finite() || self.collection_start_secs < 0.0 {
            return bad("collection_start_secs", self.collection_start_secs);
        }
        let interval = self.collection_interval_secs;
        if !interval.is_finite() || interval < 0.0 {
            return bad("collection_interval_secs", interval);
        }
        if interval > 0.0 && SimTime::from_secs_f64(interval) == SimTime::ZERO {
            return bad("collection_interval_secs (below one microsecond)", interval);
        }
        Ok(())
    }

    /// Instants at which periodic statistics are collected, in order.
    pub fn collection_times(&self) -> Vec<SimTime> {
        let interval = SimTime::from_secs_f64(self.collection_interval_secs);
        if interval == SimTime::ZERO {
            return Vec::new();
        }
        let stop = self.stop_time();
        let mut out = Vec::new();
        let mut t = SimTime::from_secs_f64(self.collection_start_secs);
        while t < stop {
            out.push(t);
            t = t + interval;
        }
        out
    }
}
