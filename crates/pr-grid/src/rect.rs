//! Rectangles in cell coordinates.

use std::fmt;

use pr_core::CellCoord;

use crate::{GridError, GridResult};

/// An axis-aligned rectangle of cells.  `top_left` is the northwest cell;
/// the rectangle extends `width` cells east and `height` cells south.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRect {
    pub top_left: CellCoord,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    pub fn new(top_left: CellCoord, width: usize, height: usize) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptySize { width, height });
        }
        Ok(Self { top_left, width, height })
    }

    #[inline]
    pub fn west(&self) -> i32 {
        self.top_left.x
    }

    /// Easternmost column (inclusive).
    #[inline]
    pub fn east(&self) -> i32 {
        self.top_left.x + self.width as i32 - 1
    }

    #[inline]
    pub fn north(&self) -> i32 {
        self.top_left.y
    }

    /// Southernmost row (inclusive).
    #[inline]
    pub fn south(&self) -> i32 {
        self.top_left.y - self.height as i32 + 1
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn contains(&self, c: CellCoord) -> bool {
        c.x >= self.west() && c.x <= self.east() && c.y <= self.north() && c.y >= self.south()
    }

    pub fn contains_rect(&self, other: &CellRect) -> bool {
        other.west() >= self.west()
            && other.east() <= self.east()
            && other.north() <= self.north()
            && other.south() >= self.south()
    }

    /// `(row, col)` of `c` relative to this rectangle, if inside.
    #[inline]
    pub fn local_index(&self, c: CellCoord) -> Option<(usize, usize)> {
        self.contains(c)
            .then(|| ((self.north() - c.y) as usize, (c.x - self.west()) as usize))
    }

    /// Cell coordinate of local `(row, col)`.  No bounds check.
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> CellCoord {
        CellCoord::new(self.west() + col as i32, self.north() - row as i32)
    }

    /// Intersection of two rectangles; `None` when empty on either axis.
    pub fn intersection(&self, other: &CellRect) -> Option<CellRect> {
        let west = self.west().max(other.west());
        let east = self.east().min(other.east());
        let north = self.north().min(other.north());
        let south = self.south().max(other.south());
        if west > east || south > north {
            return None;
        }
        Some(CellRect {
            top_left: CellCoord::new(west, north),
            width: (east - west + 1) as usize,
            height: (north - south + 1) as usize,
        })
    }

    /// Smallest rectangle containing `self` and `other`.
    pub fn union(&self, other: &CellRect) -> CellRect {
        let west = self.west().min(other.west());
        let east = self.east().max(other.east());
        let north = self.north().max(other.north());
        let south = self.south().min(other.south());
        CellRect {
            top_left: CellCoord::new(west, north),
            width: (east - west + 1) as usize,
            height: (north - south + 1) as usize,
        }
    }

    /// Smallest rectangle containing every input; `None` for no inputs.
    pub fn bounding<I: IntoIterator<Item = CellRect>>(rects: I) -> Option<CellRect> {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }

    /// Every cell of the rectangle, north to south, west to east.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let rect = *self;
        (0..rect.height).flat_map(move |row| (0..rect.width).map(move |col| rect.cell_at(row, col)))
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}x{}]", self.top_left, self.width, self.height)
    }
}
