//! parked-relays: run one parked-car relay scenario end to end.
//!
//! ```text
//! parked-relays [scenario.toml] [mobility.tsv]
//! ```
//!
//! Without a scenario file the bundled `scenario.toml` is used; without a
//! mobility file a synthetic feed around downtown Porto is generated.  Hook
//! files, `decisions.csv` and `collections.csv` are written to the
//! scenario's stats folder.  Set `RUST_LOG=debug` for per-vehicle detail.

mod synthetic;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{info, warn};

use pr_fleet::Role;
use pr_output::{CsvWriter, FileHookSink, SimOutputObserver};
use pr_schedule::load_mobility_tsv;
use pr_sim::{ScenarioConfig, SimBuilder};

const DEFAULT_SCENARIO: &str = include_str!("../scenario.toml");

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let scenario = args.next();
    let mobility = args.next();

    // 1. Scenario.
    let config = match &scenario {
        Some(path) => ScenarioConfig::load(path).with_context(|| format!("loading scenario {path}"))?,
        None => ScenarioConfig::from_toml_str(DEFAULT_SCENARIO).context("bundled scenario")?,
    };
    let stop = config.sim.stop_time();
    info!(
        "scenario: stop at t={stop}, seed {}, {} fixed roadside units",
        config.sim.seed,
        config.roadside_units.len()
    );

    // 2. Mobility feed.
    let batches = match &mobility {
        Some(path) => load_mobility_tsv(Path::new(path), stop)
            .with_context(|| format!("loading mobility feed {path}"))?,
        None => synthetic::feed(stop).context("synthetic feed")?,
    };
    if batches.is_empty() {
        warn!("mobility feed is empty before t={stop}");
    }

    // 3. Output.
    let folder = config.stats.folder.clone();
    let sink = FileHookSink::create(&folder, config.stats.hook_set()?)?;
    let writer = CsvWriter::new(&folder)?;
    let mut obs = SimOutputObserver::new(writer);

    // 4. Build and run.
    let mut sim = SimBuilder::new(config, batches).sink(sink).build()?;
    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        return Err(e).context("writing decision output");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  simulated time   : {} s", summary.end_time);
    println!("  events executed  : {}", summary.events_executed);
    println!("  vehicles seen    : {}", summary.vehicles_seen);
    println!("  packets sent     : {}", summary.counters.packets_sent);
    println!("  map replies      : {} ({} neighbour polls)", summary.counters.map_replies, summary.counters.map_polls);
    println!("  decisions        : {}", summary.counters.decisions);
    println!("  failed decisions : {}", summary.counters.failed_decisions);
    println!("  decisions.csv    : {} rows", obs.decisions_written());
    println!();

    println!("{:<10} {:<10} {:<12}", "Vehicle", "Role", "Converted");
    println!("{}", "-".repeat(34));
    for rec in sim.registry().iter().filter(|r| r.role == Role::RoadsideUnit) {
        let converted = rec.converted_at.map_or_else(|| "-".to_string(), |t| format!("{t} s"));
        println!("{:<10} {:<10} {:<12}", rec.id.to_string(), rec.role.to_string(), converted);
    }
    println!();
    println!("{} parked, {} relays", summary.parked, summary.relays);

    sim.into_sink().finish().context("flushing hook files")?;
    info!("output written to {}", folder.display());
    Ok(())
}
