//! Scenario configuration.
//!
//! A scenario file is TOML with one table per concern; every table and
//! every key is optional.
//!
//! ```toml
//! [sim]
//! stop_time_secs = 1800
//! seed = 7
//!
//! [network]
//! max_range_m = 155
//!
//! [decision]
//! kappa = 1.0
//! request_reach = "twoHop"
//!
//! [parking.lifetime]
//! model = "gamma"
//! shape = 2.0
//! scale_secs = 900
//!
//! [stats]
//! folder = "stats"
//! hooks = ["activeRoadsideUnitCount", "decisionCellCoverageEffects"]
//!
//! [[roadside_units]]
//! id = 90001
//! lon = -8.6105
//! lat = 41.1496
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pr_core::{GeoPoint, HookSet, SimConfig, VehicleId};
use pr_decision::DecisionParams;
use pr_network::NetworkConfig;
use pr_schedule::ParkingLifetime;

use crate::{SimError, SimResult};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub sim: SimConfig,
    pub network: NetworkConfig,
    pub decision: DecisionParams,
    pub parking: ParkingConfig,
    pub stats: StatsConfig,
    /// Relays present from the start of the run.
    pub roadside_units: Vec<FixedRoadsideUnit>,
}

/// A roadside unit placed by the scenario rather than by a decision.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedRoadsideUnit {
    pub id: u32,
    pub lon: f64,
    pub lat: f64,
}

impl FixedRoadsideUnit {
    pub fn vehicle_id(&self) -> VehicleId {
        VehicleId(self.id)
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingConfig {
    /// Vehicles leaving the feed park; otherwise they simply leave.
    pub enabled: bool,
    pub lifetime: ParkingLifetime,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self { enabled: true, lifetime: ParkingLifetime::default() }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Where hook files are written.
    pub folder: PathBuf,
    /// Enabled hook names.
    pub hooks: Vec<String>,
    /// Derive the obstruction mask from the mobility feed.
    pub build_obstruction_mask: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { folder: PathBuf::from("stats"), hooks: Vec::new(), build_obstruction_mask: true }
    }
}

impl StatsConfig {
    /// Resolve hook names; unknown names are an error.
    pub fn hook_set(&self) -> SimResult<HookSet> {
        Ok(HookSet::from_names(&self.hooks)?)
    }
}

impl ScenarioConfig {
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let config: ScenarioConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.sim.validate()?;
        self.network.validate()?;
        self.decision.validate()?;
        self.parking.lifetime.validate()?;
        self.stats.hook_set()?;

        let mut ids = BTreeSet::new();
        for rsu in &self.roadside_units {
            if !ids.insert(rsu.id) {
                return Err(SimError::Config(format!("roadside unit {} listed twice", rsu.id)));
            }
            if !(rsu.lon.is_finite() && rsu.lat.is_finite()) {
                return Err(SimError::Config(format!(
                    "roadside unit {} has invalid position ({}, {})",
                    rsu.id, rsu.lon, rsu.lat
                )));
            }
        }
        Ok(())
    }
}
