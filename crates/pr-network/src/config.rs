//! Network parameters.

use pr_core::{DistanceMetric, SimTime};

use crate::{NetworkError, NetworkResult};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Radio range in metres.
    pub max_range_m: f64,
    /// Delay between a transmission and its reception.
    pub message_delay_ms: u64,
    /// Interval between beacons of a moving vehicle.
    pub beacon_interval_ms: u64,
    /// Side length, in cells, of every self-coverage map.  Must be odd.
    pub self_coverage_map_size: usize,
    /// Relay hops a unicast may cross between fixed nodes.
    pub unicast_max_hops: u32,
    /// How long a relay answering a depth-2 request waits for its own
    /// neighbours' maps before replying.
    pub map_poll_wait_ms: u64,
    pub distance_metric: DistanceMetric,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_range_m: 155.0,
            message_delay_ms: 10,
            beacon_interval_ms: 1_000,
            self_coverage_map_size: 13,
            unicast_max_hops: 2,
            map_poll_wait_ms: 500,
            distance_metric: DistanceMetric::Haversine,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> NetworkResult<()> {
        if !(self.max_range_m > 0.0) {
            return Err(NetworkError::Config(format!("max_range_m must be positive, got {}", self.max_range_m)));
        }
        if self.self_coverage_map_size % 2 == 0 {
            return Err(NetworkError::Config(format!(
                "self_coverage_map_size must be odd, got {}",
                self.self_coverage_map_size
            )));
        }
        if self.beacon_interval_ms == 0 {
            return Err(NetworkError::Config("beacon_interval_ms must be positive".into()));
        }
        if self.unicast_max_hops == 0 {
            return Err(NetworkError::Config("unicast_max_hops must be at least 1".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn message_delay(&self) -> SimTime {
        SimTime::from_millis(self.message_delay_ms)
    }

    #[inline]
    pub fn beacon_interval(&self) -> SimTime {
        SimTime::from_millis(self.beacon_interval_ms)
    }

    #[inline]
    pub fn map_poll_wait(&self) -> SimTime {
        SimTime::from_millis(self.map_poll_wait_ms)
    }

    /// Neighbour maps older than this are not forwarded in a depth-2 reply.
    #[inline]
    pub fn neighbor_map_max_age(&self) -> SimTime {
        self.map_poll_wait() + self.map_poll_wait()
    }
}
