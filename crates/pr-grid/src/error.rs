//! Grid error type.

use thiserror::Error;

use pr_core::CellCoord;

use crate::CellRect;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid size must be positive, got {width}x{height}")]
    EmptySize { width: usize, height: usize },

    #[error("center-based grid needs odd dimensions, got {width}x{height}")]
    EvenCenter { width: usize, height: usize },

    #[error("cannot build a bounding grid from an empty list")]
    EmptyBounding,

    #[error("crop region {requested} is not contained in {bounds}")]
    CropOutOfBounds { requested: CellRect, bounds: CellRect },

    #[error("cell {cell} lies outside {bounds}")]
    OutOfBounds { cell: CellCoord, bounds: CellRect },

    #[error("mask is {mask_width}x{mask_height} but grid is {width}x{height}")]
    MaskSizeMismatch {
        width: usize,
        height: usize,
        mask_width: usize,
        mask_height: usize,
    },

    #[error("cell value {0} has no single-character encoding")]
    Encode(String),

    #[error("cannot decode grid at line {line}: {reason}")]
    Decode { line: usize, reason: String },
}

pub type GridResult<T> = Result<T, GridError>;
