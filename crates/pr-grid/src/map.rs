//! `CellMap<T>`: a rectangular grid of cells on the arcsecond lattice.
//!
//! # Storage
//!
//! Cells are stored row-major in one `Vec<T>`.  Row 0 is the north edge
//! (`y == top_left.y`) and column 0 the west edge (`x == top_left.x`), so
//!
//! ```text
//! row = top_left.y - cell.y
//! col = cell.x - top_left.x
//! ```
//!
//! # Merges
//!
//! [`keep_best_signal`](CellMap::keep_best_signal) and
//! [`increment_saturation`](CellMap::increment_saturation) only touch the
//! intersection of the two maps in cell coordinates.  Disjoint maps are a
//! legitimate outcome (a stale or far-away reply): the merge logs a warning
//! and leaves the target unchanged.

use std::ops::{Add, Index, IndexMut};

use log::warn;

use pr_core::{CellCoord, GeoPoint};

use crate::{CellRect, GridError, GridResult, Measurement, Obstruction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellMap<T> {
    rect: CellRect,
    cells: Vec<T>,
}

impl<T: Clone> CellMap<T> {
    // ── Construction ──────────────────────────────────────────────────────

    /// A `width x height` map whose northwest cell is `top_left`, every cell
    /// set to `fill`.
    pub fn new(width: usize, height: usize, fill: T, top_left: CellCoord) -> GridResult<Self> {
        let rect = CellRect::new(top_left, width, height)?;
        Ok(Self::filled(rect, fill))
    }

    /// A map whose northwest cell contains the geographic point `top_left`.
    pub fn with_geographic_top_left(
        width: usize,
        height: usize,
        fill: T,
        top_left: GeoPoint,
    ) -> GridResult<Self> {
        Self::new(width, height, fill, top_left.cell())
    }

    /// A map centred on the cell containing `center`.  Both dimensions must
    /// be odd, otherwise there is no unique centre cell.
    pub fn with_geographic_center(
        width: usize,
        height: usize,
        fill: T,
        center: GeoPoint,
    ) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptySize { width, height });
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(GridError::EvenCenter { width, height });
        }
        let c = center.cell();
        let top_left = CellCoord::new(c.x - (width as i32 - 1) / 2, c.y + (height as i32 - 1) / 2);
        Self::new(width, height, fill, top_left)
    }

    /// The smallest map enclosing the footprint of every map in `maps`.
    pub fn bounding<'a, U: 'a>(
        maps: impl IntoIterator<Item = &'a CellMap<U>>,
        fill: T,
    ) -> GridResult<Self> {
        let rect = CellRect::bounding(maps.into_iter().map(CellMap::rect))
            .ok_or(GridError::EmptyBounding)?;
        Ok(Self::filled(rect, fill))
    }

    /// A map covering exactly `rect`.
    pub fn filled(rect: CellRect, fill: T) -> Self {
        Self { cells: vec![fill; rect.cell_count()], rect }
    }

    // ── Cropping ──────────────────────────────────────────────────────────

    /// Copy of the sub-rectangle `top_left` / `width x height`.
    ///
    /// Requesting the current bounds returns an identical copy.  The
    /// requested rectangle must be non-empty and fully inside this map.
    pub fn crop(&self, top_left: CellCoord, width: usize, height: usize) -> GridResult<Self> {
        let requested = CellRect::new(top_left, width, height)?;
        if requested == self.rect {
            return Ok(self.clone());
        }
        if !self.rect.contains_rect(&requested) {
            return Err(GridError::CropOutOfBounds { requested, bounds: self.rect });
        }
        let (row0, col0) = self.local(top_left).ok_or(GridError::CropOutOfBounds {
            requested,
            bounds: self.rect,
        })?;
        let mut cells = Vec::with_capacity(requested.cell_count());
        for row in row0..row0 + height {
            let start = row * self.rect.width + col0;
            cells.extend_from_slice(&self.cells[start..start + width]);
        }
        Ok(Self { rect: requested, cells })
    }

    /// In-place variant of [`crop`](Self::crop).
    pub fn crop_in_place(&mut self, top_left: CellCoord, width: usize, height: usize) -> GridResult<()> {
        let requested = CellRect::new(top_left, width, height)?;
        if requested != self.rect {
            *self = self.crop(top_left, width, height)?;
        }
        Ok(())
    }

    /// A map of the same footprint with every cell transformed by `f`.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> CellMap<U> {
        CellMap { rect: self.rect, cells: self.cells.iter().map(f).collect() }
    }
}

impl<T> CellMap<T> {
    /// `cells` must hold exactly `rect.cell_count()` values, row-major.
    pub(crate) fn from_parts(rect: CellRect, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), rect.cell_count());
        Self { rect, cells }
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    #[inline]
    pub fn rect(&self) -> CellRect {
        self.rect
    }

    #[inline]
    pub fn top_left(&self) -> CellCoord {
        self.rect.top_left
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rect.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.rect.width, self.rect.height)
    }

    /// Centre cell, defined only when both dimensions are odd.
    pub fn center(&self) -> Option<CellCoord> {
        (self.rect.width % 2 == 1 && self.rect.height % 2 == 1).then(|| {
            self.rect.cell_at((self.rect.height - 1) / 2, (self.rect.width - 1) / 2)
        })
    }

    #[inline]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.rect.contains(cell)
    }

    /// Local `(row, col)` of a cell coordinate.
    #[inline]
    pub fn local(&self, cell: CellCoord) -> Option<(usize, usize)> {
        self.rect.local_index(cell)
    }

    /// Intersection with `other`'s footprint, in cell coordinates.
    #[inline]
    pub fn overlap_bounds<U>(&self, other: &CellMap<U>) -> Option<CellRect> {
        self.rect.intersection(&other.rect)
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    fn offset(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rect.height && col < self.rect.width).then(|| row * self.rect.width + col)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.offset(row, col).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.offset(row, col).map(|i| &mut self.cells[i])
    }

    #[inline]
    pub fn get_cell(&self, cell: CellCoord) -> Option<&T> {
        self.local(cell).and_then(|(r, c)| self.get(r, c))
    }

    #[inline]
    pub fn get_cell_mut(&mut self, cell: CellCoord) -> Option<&mut T> {
        self.local(cell).and_then(|(r, c)| self.get_mut(r, c))
    }

    #[inline]
    pub fn get_geo(&self, point: GeoPoint) -> Option<&T> {
        self.get_cell(point.cell())
    }

    #[inline]
    pub fn get_geo_mut(&mut self, point: GeoPoint) -> Option<&mut T> {
        self.get_cell_mut(point.cell())
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> GridResult<()> {
        let cell = self.rect.cell_at(row, col);
        let bounds = self.rect;
        let slot = self.get_mut(row, col).ok_or(GridError::OutOfBounds { cell, bounds })?;
        *slot = value;
        Ok(())
    }

    pub fn set_cell(&mut self, cell: CellCoord, value: T) -> GridResult<()> {
        let bounds = self.rect;
        let slot = self.get_cell_mut(cell).ok_or(GridError::OutOfBounds { cell, bounds })?;
        *slot = value;
        Ok(())
    }

    #[inline]
    pub fn set_geo(&mut self, point: GeoPoint, value: T) -> GridResult<()> {
        self.set_cell(point.cell(), value)
    }

    /// Cells of one row, west to east.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.rect.height)
            .then(|| &self.cells[row * self.rect.width..(row + 1) * self.rect.width])
    }

    /// Every cell with its coordinate, north to south, west to east.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &T)> + '_ {
        self.rect.cells().zip(self.cells.iter())
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.cells
    }
}

impl<T> Index<(usize, usize)> for CellMap<T> {
    type Output = T;

    /// # Panics
    /// Panics if `(row, col)` is out of bounds.
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rect.height && col < self.rect.width, "cell ({row}, {col}) out of bounds");
        &self.cells[row * self.rect.width + col]
    }
}

impl<T> IndexMut<(usize, usize)> for CellMap<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rect.height && col < self.rect.width, "cell ({row}, {col}) out of bounds");
        &mut self.cells[row * self.rect.width + col]
    }
}

// ── Merges ────────────────────────────────────────────────────────────────────

impl<T: Copy + Ord> CellMap<T> {
    /// `self[c] = max(self[c], other[c])` over the overlap.  Returns `false`
    /// (and warns) if the maps do not overlap.
    pub fn keep_best_signal(&mut self, other: &CellMap<T>) -> bool {
        let Some(overlap) = self.overlap_bounds(other) else {
            warn!("keep_best_signal: {} and {} do not overlap", self.rect, other.rect);
            return false;
        };
        for cell in overlap.cells() {
            if let (Some(theirs), Some(ours)) = (other.get_cell(cell).copied(), self.get_cell_mut(cell)) {
                *ours = (*ours).max(theirs);
            }
        }
        true
    }
}

impl<T> CellMap<T>
where
    T: Copy + Add<Output = T> + From<u8>,
{
    /// `self[c] += 1` wherever `other[c]` is positive, over the overlap.
    /// Returns `false` (and warns) if the maps do not overlap.
    pub fn increment_saturation<U>(&mut self, other: &CellMap<U>) -> bool
    where
        U: Copy + Default + PartialOrd,
    {
        let Some(overlap) = self.overlap_bounds(other) else {
            warn!("increment_saturation: {} and {} do not overlap", self.rect, other.rect);
            return false;
        };
        let zero = U::default();
        for cell in overlap.cells() {
            let positive = other.get_cell(cell).is_some_and(|v| *v > zero);
            if positive {
                if let Some(ours) = self.get_cell_mut(cell) {
                    *ours = *ours + T::from(1);
                }
            }
        }
        true
    }
}

// ── Derived maps and statistics ───────────────────────────────────────────────

impl<T: Copy + Into<f64>> CellMap<T> {
    /// Collect cell values into a [`Measurement`].
    ///
    /// With a `mask`, only cells that are open in the mask are sampled; the
    /// mask must have exactly this map's dimensions.  Unless `include_zero`
    /// is set, zero-valued cells are skipped regardless of the mask.
    pub fn measurement(
        &self,
        mask: Option<&CellMap<Obstruction>>,
        include_zero: bool,
    ) -> GridResult<Measurement> {
        if let Some(mask) = mask {
            if mask.size() != self.size() {
                return Err(GridError::MaskSizeMismatch {
                    width: self.rect.width,
                    height: self.rect.height,
                    mask_width: mask.rect.width,
                    mask_height: mask.rect.height,
                });
            }
        }
        let mut out = Measurement::new();
        for (i, value) in self.cells.iter().enumerate() {
            if mask.is_some_and(|m| !m.cells[i].is_open()) {
                continue;
            }
            let v: f64 = (*value).into();
            if !include_zero && v == 0.0 {
                continue;
            }
            out.add(v);
        }
        Ok(out)
    }
}

impl<T: Copy + Default + PartialOrd> CellMap<T> {
    /// Open where the value is positive, blocked elsewhere.
    pub fn to_obstruction_mask(&self) -> CellMap<Obstruction> {
        let zero = T::default();
        CellMap {
            rect: self.rect,
            cells: self
                .cells
                .iter()
                .map(|v| if *v > zero { Obstruction::Open } else { Obstruction::Blocked })
                .collect(),
        }
    }
}

impl<T: std::fmt::Display> CellMap<T> {
    /// Tab-separated numeric dump, one line per row, preceded by the
    /// `tlc` header.  Used for maps whose values exceed one digit.
    pub fn to_table(&self) -> String {
        let mut out = format!("tlc{};{}\n", self.rect.top_left.x, self.rect.top_left.y);
        for row in self.cells.chunks(self.rect.width) {
            let line: Vec<String> = row.iter().map(ToString::to_string).collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
        out
    }
}
