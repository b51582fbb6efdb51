//! Named statistics and debug hooks.
//!
//! The set of hook names is closed: configuration strings are parsed into
//! [`Hook`] values once, when a [`HookSet`] is built, and call sites only ever
//! test membership of an enum value.  Sinks receive tab-separated text.
//! Whether a hook is enabled never changes simulation outcomes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{PrError, PrResult};

/// Field separator used by every tabular hook.
pub const SEPARATOR: &str = "\t";

// ── Hook ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hook {
    ActiveVehicleCount,
    ActiveRoadsideUnitCount,
    BeaconCounts,
    CityCoverageEvolution,
    DecisionCellCoverageEffects,
    FinalCityCoverageMap,
    FinalCitySaturationMap,
    FinalRoadsideUnitCoverageMaps,
    FinalCityCoverageStats,
    FinalCitySaturationStats,
    ObstructionMask,
    PacketTrace,
    /// Debug: per-map dumps from every decision cycle.
    DecisionMaps,
}

impl Hook {
    pub const ALL: [Hook; 13] = [
        Hook::ActiveVehicleCount,
        Hook::ActiveRoadsideUnitCount,
        Hook::BeaconCounts,
        Hook::CityCoverageEvolution,
        Hook::DecisionCellCoverageEffects,
        Hook::FinalCityCoverageMap,
        Hook::FinalCitySaturationMap,
        Hook::FinalRoadsideUnitCoverageMaps,
        Hook::FinalCityCoverageStats,
        Hook::FinalCitySaturationStats,
        Hook::ObstructionMask,
        Hook::PacketTrace,
        Hook::DecisionMaps,
    ];

    /// The configuration / file name of the hook.
    pub fn name(self) -> &'static str {
        match self {
            Hook::ActiveVehicleCount => "activeVehicleCount",
            Hook::ActiveRoadsideUnitCount => "activeRoadsideUnitCount",
            Hook::BeaconCounts => "beaconCounts",
            Hook::CityCoverageEvolution => "cityCoverageEvolution",
            Hook::DecisionCellCoverageEffects => "decisionCellCoverageEffects",
            Hook::FinalCityCoverageMap => "finalCityCoverageMap",
            Hook::FinalCitySaturationMap => "finalCitySaturationMap",
            Hook::FinalRoadsideUnitCoverageMaps => "finalRoadsideUnitCoverageMaps",
            Hook::FinalCityCoverageStats => "finalCityCoverageStats",
            Hook::FinalCitySaturationStats => "finalCitySaturationStats",
            Hook::ObstructionMask => "obstructionMask",
            Hook::PacketTrace => "packetTrace",
            Hook::DecisionMaps => "decisionMaps",
        }
    }

    /// Column header written once when a sink opens the hook.  Map dumps
    /// have none.
    pub fn header(self) -> Option<&'static str> {
        match self {
            Hook::ActiveVehicleCount => Some("time\tactive_vehicles"),
            Hook::ActiveRoadsideUnitCount => Some("time\tactive_rsus"),
            Hook::BeaconCounts => Some("time\tsent\treceived"),
            Hook::CityCoverageEvolution => {
                Some(concat!(
                    "time\tcovered_cells\tcoverage_pct\tmean_signal\tstdev_signal",
                    "\tcells_0\tcells_1\tcells_2\tcells_3\tcells_4\tcells_5"
                ))
            }
            Hook::DecisionCellCoverageEffects => {
                Some("time\tid\tdNew\tdBoost\tdSat\tdScore\tkappa\tlambda\tmu")
            }
            Hook::FinalCityCoverageStats | Hook::FinalCitySaturationStats => {
                Some("count\tmean\tvariance\tstdev\tmin\tmax")
            }
            Hook::PacketTrace => Some("id\tcreated\tl2src\tl3src\tdst\tkind\tcontent"),
            Hook::FinalCityCoverageMap
            | Hook::FinalCitySaturationMap
            | Hook::FinalRoadsideUnitCoverageMaps
            | Hook::ObstructionMask
            | Hook::DecisionMaps => None,
        }
    }

    #[inline]
    pub fn is_debug(self) -> bool {
        matches!(self, Hook::DecisionMaps)
    }

    #[inline]
    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl FromStr for Hook {
    type Err = PrError;

    fn from_str(s: &str) -> PrResult<Hook> {
        Hook::ALL
            .into_iter()
            .find(|h| h.name() == s)
            .ok_or_else(|| PrError::UnknownHook(s.to_string()))
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── HookSet ───────────────────────────────────────────────────────────────────

/// A set of enabled hooks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HookSet(u32);

impl HookSet {
    pub const fn empty() -> Self {
        HookSet(0)
    }

    pub fn all() -> Self {
        Hook::ALL.into_iter().collect()
    }

    /// Parse configured hook names.  Any unknown name is rejected.
    pub fn from_names<I, S>(names: I) -> PrResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HookSet::empty();
        for name in names {
            set.insert(name.as_ref().trim().parse()?);
        }
        Ok(set)
    }

    #[inline]
    pub fn insert(&mut self, hook: Hook) {
        self.0 |= hook.bit();
    }

    #[inline]
    pub fn contains(&self, hook: Hook) -> bool {
        self.0 & hook.bit() != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Hook> + use<> {
        let set = *self;
        Hook::ALL.into_iter().filter(move |h| set.contains(*h))
    }
}

impl FromIterator<Hook> for HookSet {
    fn from_iter<I: IntoIterator<Item = Hook>>(iter: I) -> Self {
        let mut set = HookSet::empty();
        for h in iter {
            set.insert(h);
        }
        set
    }
}

// ── HookSink ──────────────────────────────────────────────────────────────────

/// Receiver of hook records.
///
/// Producers check [`is_enabled`](HookSink::is_enabled) before formatting a
/// record, so a disabled hook costs nothing.  `write_to_hook` on a disabled
/// hook must be a no-op.
pub trait HookSink {
    fn is_enabled(&self, hook: Hook) -> bool;

    /// Append one record (without trailing newline) to `hook`.
    fn write_to_hook(&mut self, hook: Hook, text: &str);
}

/// A sink with every hook disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl HookSink for NoopSink {
    #[inline]
    fn is_enabled(&self, _hook: Hook) -> bool {
        false
    }

    #[inline]
    fn write_to_hook(&mut self, _hook: Hook, _text: &str) {}
}

/// A sink that keeps every enabled hook's text in memory, headers first.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    hooks: HookSet,
    buffers: BTreeMap<Hook, String>,
}

impl MemorySink {
    pub fn new(hooks: HookSet) -> Self {
        let mut buffers = BTreeMap::new();
        for hook in hooks.iter() {
            let mut buf = String::new();
            if let Some(header) = hook.header() {
                buf.push_str(header);
                buf.push('\n');
            }
            buffers.insert(hook, buf);
        }
        Self { hooks, buffers }
    }

    /// Everything written to `hook` so far (empty if disabled).
    pub fn contents(&self, hook: Hook) -> &str {
        self.buffers.get(&hook).map(String::as_str).unwrap_or("")
    }

    /// Data rows of `hook`, header excluded.
    pub fn records(&self, hook: Hook) -> Vec<&str> {
        let skip = usize::from(hook.header().is_some());
        self.contents(hook).lines().skip(skip).collect()
    }

    pub fn into_buffers(self) -> BTreeMap<Hook, String> {
        self.buffers
    }
}

impl HookSink for MemorySink {
    #[inline]
    fn is_enabled(&self, hook: Hook) -> bool {
        self.hooks.contains(hook)
    }

    fn write_to_hook(&mut self, hook: Hook, text: &str) {
        if let Some(buf) = self.buffers.get_mut(&hook) {
            buf.push_str(text);
            buf.push('\n');
        }
    }
}

impl<S: HookSink + ?Sized> HookSink for &mut S {
    #[inline]
    fn is_enabled(&self, hook: Hook) -> bool {
        (**self).is_enabled(hook)
    }

    #[inline]
    fn write_to_hook(&mut self, hook: Hook, text: &str) {
        (**self).write_to_hook(hook, text)
    }
}

impl<S: HookSink + ?Sized> HookSink for Box<S> {
    #[inline]
    fn is_enabled(&self, hook: Hook) -> bool {
        (**self).is_enabled(hook)
    }

    #[inline]
    fn write_to_hook(&mut self, hook: Hook, text: &str) {
        (**self).write_to_hook(hook, text)
    }
}
