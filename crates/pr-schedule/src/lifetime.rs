//! Parked-duration models.
//!
//! A model turns the instant a vehicle parks into how long it stays parked.
//! Draws use the vehicle's own RNG stream so they do not depend on event
//! interleaving.

use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};

use pr_core::{SimTime, VehicleRng};

use crate::{ScheduleError, ScheduleResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum ParkingLifetime {
    /// Every vehicle stays parked for the same time.
    Fixed { secs: f64 },
    /// Gamma-distributed duration in seconds.
    Gamma { shape: f64, scale_secs: f64 },
}

impl Default for ParkingLifetime {
    fn default() -> Self {
        ParkingLifetime::Fixed { secs: 3_600.0 }
    }
}

impl ParkingLifetime {
    pub fn validate(&self) -> ScheduleResult<()> {
        match *self {
            ParkingLifetime::Fixed { secs } if secs.is_finite() && secs > 0.0 => Ok(()),
            ParkingLifetime::Fixed { secs } => {
                Err(ScheduleError::Lifetime(format!("fixed lifetime must be positive, got {secs}")))
            }
            ParkingLifetime::Gamma { shape, scale_secs } => Gamma::new(shape, scale_secs)
                .map(|_| ())
                .map_err(|e| ScheduleError::Lifetime(format!("gamma({shape}, {scale_secs}): {e}"))),
        }
    }

    /// Draw one parked duration.
    pub fn sample(&self, rng: &mut VehicleRng) -> ScheduleResult<SimTime> {
        match *self {
            ParkingLifetime::Fixed { secs } => Ok(SimTime::from_secs_f64(secs)),
            ParkingLifetime::Gamma { shape, scale_secs } => {
                let gamma = Gamma::new(shape, scale_secs).map_err(|e| {
                    ScheduleError::Lifetime(format!("gamma({shape}, {scale_secs}): {e}"))
                })?;
                Ok(SimTime::from_secs_f64(gamma.sample(rng.inner())))
            }
        }
    }
}
