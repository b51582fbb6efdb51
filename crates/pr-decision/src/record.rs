//! Per-decision statistics record.

use pr_core::hooks::SEPARATOR;
use pr_core::{SimTime, VehicleId};
use pr_network::{NetworkError, NetworkResult, PayloadContent, PayloadKind};

use crate::{CoverageScore, DecisionParams};

/// One finished, scored decision: the `decisionCellCoverageEffects` row.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionRecord {
    pub time: SimTime,
    pub vehicle: VehicleId,
    pub score: CoverageScore,
    pub kappa: f64,
    pub lambda: f64,
    pub mu: f64,
}

impl DecisionRecord {
    pub fn new(time: SimTime, vehicle: VehicleId, score: CoverageScore, params: &DecisionParams) -> Self {
        Self { time, vehicle, score, kappa: params.kappa, lambda: params.lambda, mu: params.mu }
    }

    /// `time id dNew dBoost dSat dScore kappa lambda mu`, tab separated.
    pub fn to_row(&self) -> String {
        [
            self.time.to_string(),
            self.vehicle.to_string(),
            self.score.d_new.to_string(),
            self.score.d_boost.to_string(),
            self.score.d_sat.to_string(),
            self.score.d_score.to_string(),
            self.kappa.to_string(),
            self.lambda.to_string(),
            self.mu.to_string(),
        ]
        .join(SEPARATOR)
    }

    pub fn from_row(row: &str) -> NetworkResult<Self> {
        let bad = |reason: String| NetworkError::Decode { kind: PayloadKind::DecisionRecord, reason };
        let fields: Vec<&str> = row.trim_end().split(SEPARATOR).collect();
        let &[time, id, d_new, d_boost, d_sat, d_score, kappa, lambda, mu] = fields.as_slice() else {
            return Err(bad(format!("expected 9 fields, got {}", fields.len())));
        };
        let int = |s: &str| s.parse::<u64>().map_err(|e| bad(format!("{s:?}: {e}")));
        let float = |s: &str| s.parse::<f64>().map_err(|e| bad(format!("{s:?}: {e}")));
        Ok(Self {
            time: SimTime::from_secs_f64(float(time)?),
            vehicle: VehicleId(id.parse().map_err(|e| bad(format!("{id:?}: {e}")))?),
            score: CoverageScore {
                d_new: int(d_new)?,
                d_boost: int(d_boost)?,
                d_sat: int(d_sat)?,
                d_score: float(d_score)?,
            },
            kappa: float(kappa)?,
            lambda: float(lambda)?,
            mu: float(mu)?,
        })
    }
}

impl PayloadContent for DecisionRecord {
    const KIND: PayloadKind = PayloadKind::DecisionRecord;

    fn encode_content(&self) -> NetworkResult<String> {
        Ok(self.to_row())
    }

    fn decode_content(content: &str) -> NetworkResult<Self> {
        Self::from_row(content)
    }
}
