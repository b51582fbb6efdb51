//! Cell coverage effects.
//!
//! Neighbour maps are folded into two aggregates over a container that
//! bounds every map involved: best signal per cell and the number of maps
//! with signal per cell.  Only the cells of the vehicle's own map (its
//! action range) are scored:
//!
//! | own > 0 and …                     | contributes                       |
//! |-----------------------------------|-----------------------------------|
//! | best neighbour signal is 0        | `dNew += own`                     |
//! | own > best neighbour signal       | `dBoost += own − best`            |
//! | saturation ≥ threshold            | `dSat += saturation − threshold + 1` |
//!
//! The saturation term is independent of the first two.

use pr_grid::{CellMap, CoverageMap, GridResult, SaturationMap};

use crate::DecisionParams;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageScore {
    pub d_new: u64,
    pub d_boost: u64,
    pub d_sat: u64,
    pub d_score: f64,
}

impl CoverageScore {
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.d_score > 0.0
    }
}

/// A score plus the aggregates it was computed from.
#[derive(Clone, Debug)]
pub struct ScoredMaps {
    pub score: CoverageScore,
    pub coverage: CoverageMap,
    pub saturation: SaturationMap,
}

/// Score `own` against the neighbour `replies`.
///
/// Replies that do not overlap the container are skipped by the merges
/// (with a warning), which cannot happen for a container built from them
/// but keeps the fold total.
pub fn score_coverage(
    params: &DecisionParams,
    own: &CoverageMap,
    replies: &[CoverageMap],
) -> GridResult<ScoredMaps> {
    let mut coverage: CoverageMap = CellMap::bounding(std::iter::once(own).chain(replies), 0)?;
    let mut saturation: SaturationMap = CellMap::filled(coverage.rect(), 0);

    for reply in replies {
        coverage.keep_best_signal(reply);
        saturation.increment_saturation(reply);
    }

    let threshold = u64::from(params.saturation_threshold);
    let mut score = CoverageScore::default();
    for (cell, &mine) in own.iter() {
        if mine == 0 {
            continue;
        }
        let best = coverage.get_cell(cell).copied().unwrap_or(0);
        if best == 0 {
            score.d_new += u64::from(mine);
        } else if mine > best {
            score.d_boost += u64::from(mine - best);
        }
        let sat = saturation.get_cell(cell).copied().map_or(0, u64::from);
        if sat >= threshold {
            score.d_sat += sat - threshold + 1;
        }
    }
    score.d_score = params.kappa * score.d_new as f64 + params.lambda * score.d_boost as f64
        - params.mu * score.d_sat as f64;

    Ok(ScoredMaps { score, coverage, saturation })
}
