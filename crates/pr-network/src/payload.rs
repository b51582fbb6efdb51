//! Typed payloads.
//!
//! A [`Payload`] is a kind tag plus the exact text form of a domain value.
//! Types that travel in packets implement [`PayloadContent`]; decoding a
//! payload reconstructs a value equal to the one encoded.

use std::fmt;

use pr_core::{GeoPoint, VehicleId};
use pr_grid::{CoverageMap, SignalCodec};
use pr_spatial::FeatureType;

use crate::{NetworkError, NetworkResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Beacon,
    CoverageMapRequest,
    CoverageMaps,
    DecisionRecord,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayloadKind::Beacon => "beacon",
            PayloadKind::CoverageMapRequest => "coverageMapRequest",
            PayloadKind::CoverageMaps => "coverageMaps",
            PayloadKind::DecisionRecord => "decisionRecord",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    pub kind: PayloadKind,
    pub content: String,
}

impl Payload {
    pub fn new(kind: PayloadKind, content: impl Into<String>) -> Self {
        Self { kind, content: content.into() }
    }

    /// Decode into `T`, checking the kind tag first.
    pub fn decode<T: PayloadContent>(&self) -> NetworkResult<T> {
        if self.kind != T::KIND {
            return Err(NetworkError::WrongKind { expected: T::KIND, found: self.kind });
        }
        T::decode_content(&self.content)
    }
}

/// A value that can be carried in a [`Payload`].
pub trait PayloadContent: Sized {
    const KIND: PayloadKind;

    fn encode_content(&self) -> NetworkResult<String>;

    fn decode_content(content: &str) -> NetworkResult<Self>;

    fn to_payload(&self) -> NetworkResult<Payload> {
        Ok(Payload::new(Self::KIND, self.encode_content()?))
    }
}

pub(crate) fn decode_err(kind: PayloadKind, reason: impl Into<String>) -> NetworkError {
    NetworkError::Decode { kind, reason: reason.into() }
}

// ── Beacon ────────────────────────────────────────────────────────────────────

/// Periodic position announcement: `lon;lat;source;feature-code`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Beacon {
    pub position: GeoPoint,
    pub source: VehicleId,
    pub kind: FeatureType,
}

impl PayloadContent for Beacon {
    const KIND: PayloadKind = PayloadKind::Beacon;

    fn encode_content(&self) -> NetworkResult<String> {
        Ok(format!(
            "{};{};{};{}",
            self.position.lon,
            self.position.lat,
            self.source,
            self.kind.code()
        ))
    }

    fn decode_content(content: &str) -> NetworkResult<Self> {
        let err = |r: &str| decode_err(PayloadKind::Beacon, format!("{r} in {content:?}"));
        let fields: Vec<&str> = content.split(';').collect();
        let &[lon, lat, src, code] = fields.as_slice() else {
            return Err(err("expected 4 fields"));
        };
        let lon: f64 = lon.parse().map_err(|_| err("bad longitude"))?;
        let lat: f64 = lat.parse().map_err(|_| err("bad latitude"))?;
        let source: u32 = src.parse().map_err(|_| err("bad source id"))?;
        let code: u32 = code.parse().map_err(|_| err("bad feature code"))?;
        let kind = FeatureType::from_code(code).map_err(|_| err("unknown feature code"))?;
        Ok(Beacon { position: GeoPoint::new(lon, lat), source: VehicleId(source), kind })
    }
}

// ── CoverageMapRequest ────────────────────────────────────────────────────────

/// Request for neighbours' self-coverage maps.  `depth` is the hop budget
/// the requester asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoverageMapRequest {
    pub depth: u32,
}

impl PayloadContent for CoverageMapRequest {
    const KIND: PayloadKind = PayloadKind::CoverageMapRequest;

    fn encode_content(&self) -> NetworkResult<String> {
        Ok(self.depth.to_string())
    }

    fn decode_content(content: &str) -> NetworkResult<Self> {
        content
            .trim()
            .parse()
            .map(|depth| CoverageMapRequest { depth })
            .map_err(|_| decode_err(PayloadKind::CoverageMapRequest, format!("bad depth {content:?}")))
    }
}

// ── Coverage maps ─────────────────────────────────────────────────────────────

const OWNER_PREFIX: &str = "id";

/// A vehicle's observed signal grid tagged with its owner.
#[derive(Clone, Debug, PartialEq)]
pub struct SelfCoverageMap {
    pub owner: VehicleId,
    pub map: CoverageMap,
}

/// One or more self-coverage maps in a single reply.
///
/// Each entry is an `id<owner>` line followed by the grid text form:
///
/// ```text
/// id100
/// tlc-30996;148139
/// 012
/// ...
/// id101
/// tlc...
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoverageMaps {
    pub maps: Vec<SelfCoverageMap>,
}

impl CoverageMaps {
    pub fn single(owner: VehicleId, map: CoverageMap) -> Self {
        Self { maps: vec![SelfCoverageMap { owner, map }] }
    }
}

impl PayloadContent for CoverageMaps {
    const KIND: PayloadKind = PayloadKind::CoverageMaps;

    fn encode_content(&self) -> NetworkResult<String> {
        if self.maps.is_empty() {
            return Err(NetworkError::EmptyPayload(Self::KIND));
        }
        let mut out = String::new();
        for entry in &self.maps {
            out.push_str(&format!("{OWNER_PREFIX}{}\n", entry.owner));
            out.push_str(&entry.map.to_text(&SignalCodec)?);
        }
        Ok(out)
    }

    fn decode_content(content: &str) -> NetworkResult<Self> {
        let err = |r: String| decode_err(PayloadKind::CoverageMaps, r);
        let mut entries: Vec<(VehicleId, String)> = Vec::new();
        for line in content.lines() {
            if let Some(owner) = line.strip_prefix(OWNER_PREFIX) {
                let owner: u32 = owner.parse().map_err(|_| err(format!("bad owner line {line:?}")))?;
                entries.push((VehicleId(owner), String::new()));
                continue;
            }
            let Some((_, text)) = entries.last_mut() else {
                return Err(err(format!("grid text before the first owner line: {line:?}")));
            };
            text.push_str(line);
            text.push('\n');
        }
        if entries.is_empty() {
            return Err(err("no maps".to_string()));
        }
        let maps = entries
            .into_iter()
            .map(|(owner, text)| Ok(SelfCoverageMap { owner, map: CoverageMap::from_text(&text, &SignalCodec)? }))
            .collect::<NetworkResult<Vec<_>>>()?;
        Ok(CoverageMaps { maps })
    }
}
