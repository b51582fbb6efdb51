//! Decision parameters.

use std::fmt;
use std::str::FromStr;

use pr_core::SimTime;

use crate::{DecisionError, DecisionResult};

/// How far a map request travels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum RequestReach {
    #[default]
    OneHop,
    TwoHop,
    /// Geocast to a circle of the network's radio range.
    GeocastRadius,
}

impl FromStr for RequestReach {
    type Err = DecisionError;

    fn from_str(s: &str) -> DecisionResult<Self> {
        match s {
            "oneHop" => Ok(RequestReach::OneHop),
            "twoHop" => Ok(RequestReach::TwoHop),
            "geocastRadius" => Ok(RequestReach::GeocastRadius),
            other => Err(DecisionError::InvalidReach(other.to_string())),
        }
    }
}

impl fmt::Display for RequestReach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestReach::OneHop => "oneHop",
            RequestReach::TwoHop => "twoHop",
            RequestReach::GeocastRadius => "geocastRadius",
        })
    }
}

/// Constants shared by every vehicle's decision cycle.
///
/// `dScore = kappa·dNew + lambda·dBoost − mu·dSat`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecisionParams {
    pub kappa: f64,
    pub lambda: f64,
    pub mu: f64,
    /// Neighbour count at which a cell starts to count as saturated.
    pub saturation_threshold: u32,
    /// Delay between parking and the decision trigger, so the self-coverage
    /// map has time to fill.
    pub trigger_delay_secs: f64,
    pub map_request_waiting_time_ms: u64,
    pub request_reach: RequestReach,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            kappa: 1.0,
            lambda: 1.0,
            mu: 1.0,
            saturation_threshold: 3,
            trigger_delay_secs: 500.0,
            map_request_waiting_time_ms: 1_000,
            request_reach: RequestReach::OneHop,
        }
    }
}

impl DecisionParams {
    pub fn validate(&self) -> DecisionResult<()> {
        for (name, v) in [("kappa", self.kappa), ("lambda", self.lambda), ("mu", self.mu)] {
            if !v.is_finite() {
                return Err(DecisionError::Config(format!("{name} must be finite, got {v}")));
            }
        }
        if !(self.trigger_delay_secs >= 0.0) {
            return Err(DecisionError::Config(format!(
                "trigger_delay_secs must be non-negative, got {}",
                self.trigger_delay_secs
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn trigger_delay(&self) -> SimTime {
        SimTime::from_secs_f64(self.trigger_delay_secs)
    }

    #[inline]
    pub fn map_request_waiting_time(&self) -> SimTime {
        SimTime::from_millis(self.map_request_waiting_time_ms)
    }
}
