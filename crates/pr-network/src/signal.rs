//! Distance-based signal strength.

use pr_grid::Signal;

/// Maps a link to a signal strength on the 0..=5 scale.
pub trait SignalModel {
    fn strength(&self, distance_m: f64, line_of_sight: bool) -> Signal;
}

/// Piecewise-constant strength by distance, one table per line-of-sight
/// condition.  Each table entry `(limit, s)` applies to distances below
/// `limit`; beyond the last entry the strength is 0.
#[derive(Clone, Debug)]
pub struct SteppedSignalModel {
    line_of_sight: Vec<(f64, Signal)>,
    obstructed: Vec<(f64, Signal)>,
}

impl SteppedSignalModel {
    pub fn new(line_of_sight: Vec<(f64, Signal)>, obstructed: Vec<(f64, Signal)>) -> Self {
        Self { line_of_sight, obstructed }
    }

    /// Empirical 5.9 GHz measurements from an urban deployment (Porto).
    pub fn porto() -> Self {
        Self::new(
            vec![(70.0, 5), (115.0, 4), (135.0, 3), (155.0, 2)],
            vec![(58.0, 5), (65.0, 4), (105.0, 3), (130.0, 2)],
        )
    }
}

impl Default for SteppedSignalModel {
    fn default() -> Self {
        Self::porto()
    }
}

impl SignalModel for SteppedSignalModel {
    fn strength(&self, distance_m: f64, line_of_sight: bool) -> Signal {
        let table = if line_of_sight { &self.line_of_sight } else { &self.obstructed };
        table
            .iter()
            .find(|(limit, _)| distance_m < *limit)
            .map_or(0, |(_, s)| *s)
    }
}
