//! Deterministic RNG wrappers.
//!
//! Parking lifetimes are drawn from a per-vehicle stream seeded by
//!
//!   seed = global_seed XOR (vehicle_id * MIXING_CONSTANT)
//!
//! so a vehicle's draws do not depend on how many other vehicles parked
//! before it.  Runs stay reproducible when the mobility feed grows.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::VehicleId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── VehicleRng ────────────────────────────────────────────────────────────────

/// Per-vehicle deterministic RNG.
pub struct VehicleRng(SmallRng);

impl VehicleRng {
    pub fn new(global_seed: u64, vehicle: VehicleId) -> Self {
        let seed = global_seed ^ (vehicle.0 as u64).wrapping_mul(MIXING_CONSTANT);
        VehicleRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand_distr` distributions.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// The run's master seed; hands out per-vehicle streams.
#[derive(Copy, Clone, Debug)]
pub struct SimRng {
    seed: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng { seed }
    }

    /// The deterministic stream owned by `vehicle`.
    #[inline]
    pub fn for_vehicle(&self, vehicle: VehicleId) -> VehicleRng {
        VehicleRng::new(self.seed, vehicle)
    }
}
