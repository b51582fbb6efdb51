//! Counters, city-wide maps and the statistics hooks.

use pr_core::{Hook, HookSink, SimTime};
use pr_fleet::{Role, VehicleRegistry};
use pr_grid::{
    CellMap, CellRect, CoverageMap, GridResult, MaskCodec, Obstruction, SaturationMap, SignalCodec,
};
use pr_schedule::{MobilityBatch, city_bounds};

use crate::SimResult;

/// Run-wide event tallies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub packets_sent: u64,
    pub deliveries: u64,
    pub beacons_sent: u64,
    pub beacons_received: u64,
    pub map_replies: u64,
    /// Depth-2 requests that made a relay poll its neighbours.
    pub map_polls: u64,
    pub unreachable_unicasts: u64,
    pub decisions: u64,
    pub conversions: u64,
    pub failed_decisions: u64,
    pub stale_events: u64,
}

// ── City geometry ─────────────────────────────────────────────────────────────

/// The cell rectangle covering every position in the feed.
pub fn city_rect(batches: &[MobilityBatch]) -> GridResult<Option<CellRect>> {
    city_bounds(batches).map(|(top_left, w, h)| CellRect::new(top_left, w, h)).transpose()
}

/// Cells where at least one vehicle was ever seen are open.
pub fn obstruction_mask(rect: CellRect, batches: &[MobilityBatch]) -> CellMap<Obstruction> {
    let mut sightings: CellMap<u32> = CellMap::filled(rect, 0);
    for v in batches.iter().flat_map(|b| &b.vehicles) {
        if let Some(count) = sightings.get_cell_mut(v.position.cell()) {
            *count += 1;
        }
    }
    sightings.to_obstruction_mask()
}

/// Coverage and saturation over the city, from every relay's map.
#[derive(Clone, Debug)]
pub struct CityMaps {
    pub coverage: CoverageMap,
    pub saturation: SaturationMap,
}

impl CityMaps {
    pub fn from_relays<'a>(rect: CellRect, relays: impl IntoIterator<Item = &'a CoverageMap>) -> Self {
        let mut coverage: CoverageMap = CellMap::filled(rect, 0);
        let mut saturation: SaturationMap = CellMap::filled(rect, 0);
        for map in relays {
            coverage.keep_best_signal(map);
            saturation.increment_saturation(map);
        }
        Self { coverage, saturation }
    }
}

fn city_maps(registry: &VehicleRegistry, rect: CellRect) -> CityMaps {
    CityMaps::from_relays(rect, registry.relay_maps().map(|(_, m)| m))
}

// ── Periodic collection ───────────────────────────────────────────────────────

pub(crate) fn write_periodic<K: HookSink>(
    sink: &mut K,
    now: SimTime,
    registry: &VehicleRegistry,
    counters: &Counters,
    city: Option<CellRect>,
    mask: Option<&CellMap<Obstruction>>,
) -> SimResult<()> {
    if sink.is_enabled(Hook::ActiveVehicleCount) {
        let row = format!("{now}\t{}", registry.active_moving_count());
        sink.write_to_hook(Hook::ActiveVehicleCount, &row);
    }
    if sink.is_enabled(Hook::ActiveRoadsideUnitCount) {
        let row = format!("{now}\t{}", registry.count_role(Role::RoadsideUnit));
        sink.write_to_hook(Hook::ActiveRoadsideUnitCount, &row);
    }
    if sink.is_enabled(Hook::BeaconCounts) {
        let row = format!("{now}\t{}\t{}", counters.beacons_sent, counters.beacons_received);
        sink.write_to_hook(Hook::BeaconCounts, &row);
    }
    if sink.is_enabled(Hook::CityCoverageEvolution) {
        let row = match city {
            Some(rect) => coverage_evolution_row(now, &city_maps(registry, rect).coverage, mask)?,
            None => format!("{now}\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0"),
        };
        sink.write_to_hook(Hook::CityCoverageEvolution, &row);
    }
    Ok(())
}

/// `time covered pct mean stdev cells_0..cells_5`, restricted to open cells
/// when a mask is present.
fn coverage_evolution_row(
    now: SimTime,
    coverage: &CoverageMap,
    mask: Option<&CellMap<Obstruction>>,
) -> SimResult<String> {
    let covered = coverage.measurement(mask, false)?;
    let mut histogram = [0u64; 6];
    let mut open_cells = 0u64;
    for (i, &signal) in coverage.values().iter().enumerate() {
        let open = mask.is_none_or(|m| m.values().get(i).is_some_and(|o| o.is_open()));
        if open {
            open_cells += 1;
            histogram[usize::from(signal).min(5)] += 1;
        }
    }
    let pct = if open_cells == 0 { 0.0 } else { covered.count() as f64 / open_cells as f64 };
    let mut row = format!("{now}\t{}\t{pct}\t{}\t{}", covered.count(), covered.mean(), covered.stdev());
    for n in histogram {
        row.push('\t');
        row.push_str(&n.to_string());
    }
    Ok(row)
}

// ── Final collection ──────────────────────────────────────────────────────────

pub(crate) fn write_final<K: HookSink>(
    sink: &mut K,
    registry: &VehicleRegistry,
    city: Option<CellRect>,
    mask: Option<&CellMap<Obstruction>>,
) -> SimResult<()> {
    if sink.is_enabled(Hook::FinalRoadsideUnitCoverageMaps) {
        for rec in registry.iter_role(Role::RoadsideUnit) {
            let Some(map) = &rec.self_coverage else { continue };
            let created = rec.converted_at.unwrap_or_default();
            let text = format!("RSU {} created {created}\n{}", rec.id, map.to_text(&SignalCodec)?);
            sink.write_to_hook(Hook::FinalRoadsideUnitCoverageMaps, text.trim_end());
        }
    }

    if sink.is_enabled(Hook::ObstructionMask) {
        match mask {
            Some(m) => sink.write_to_hook(Hook::ObstructionMask, m.to_text(&MaskCodec)?.trim_end()),
            None => sink.write_to_hook(Hook::ObstructionMask, "no obstruction mask"),
        }
    }

    let Some(rect) = city else { return Ok(()) };
    let maps = city_maps(registry, rect);

    if sink.is_enabled(Hook::FinalCityCoverageMap) {
        sink.write_to_hook(Hook::FinalCityCoverageMap, maps.coverage.to_text(&SignalCodec)?.trim_end());
    }
    if sink.is_enabled(Hook::FinalCitySaturationMap) {
        sink.write_to_hook(Hook::FinalCitySaturationMap, maps.saturation.to_table().trim_end());
    }
    if sink.is_enabled(Hook::FinalCityCoverageStats) {
        let row = maps.coverage.measurement(mask, true)?.summary_row();
        sink.write_to_hook(Hook::FinalCityCoverageStats, &row);
    }
    if sink.is_enabled(Hook::FinalCitySaturationStats) {
        let row = maps.saturation.measurement(mask, true)?.summary_row();
        sink.write_to_hook(Hook::FinalCitySaturationStats, &row);
    }
    Ok(())
}
