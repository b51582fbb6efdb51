//! `pr-grid`: geospatial cell maps.
//!
//! A [`CellMap<T>`] is a rectangle of cells on the arcsecond grid defined in
//! `pr_core::geo`.  Row 0 is the northernmost row.  Every cell can be
//! addressed three ways: local `(row, col)`, geographic [`GeoPoint`], or
//! origin-independent [`CellCoord`]; the last is the frame used when two maps
//! are compared.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`rect`]        | `CellRect`: cell-coordinate rectangles and intersection |
//! | [`map`]         | `CellMap<T>`: construction, access, crop, merges        |
//! | [`codec`]       | `CellCodec`, `SignalCodec`, `MaskCodec`, text format     |
//! | [`mask`]        | `Obstruction` (open / blocked)                           |
//! | [`measurement`] | `Measurement`: sample count, mean, variance             |
//! | [`error`]       | `GridError`, `GridResult<T>`                             |
//!
//! [`GeoPoint`]: pr_core::GeoPoint
//! [`CellCoord`]: pr_core::CellCoord

pub mod codec;
pub mod error;
pub mod map;
pub mod mask;
pub mod measurement;
pub mod rect;

#[cfg(test)]
mod tests;

pub use codec::{CellCodec, MaskCodec, SignalCodec};
pub use error::{GridError, GridResult};
pub use map::CellMap;
pub use mask::Obstruction;
pub use measurement::Measurement;
pub use rect::CellRect;

/// Signal strength on the 0..=5 scale.  Zero means no coverage.
pub type Signal = u8;

/// A coverage map: signal strength per cell.
pub type CoverageMap = CellMap<Signal>;

/// A saturation map: number of neighbour maps covering each cell.
pub type SaturationMap = CellMap<u32>;
