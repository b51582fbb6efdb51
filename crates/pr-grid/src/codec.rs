//! Single-character cell codecs and the grid text format.
//!
//! ```text
//! tlc<x>;<y>
//! <row 0: one character per cell>
//! <row 1>
//! ...
//! ```
//!
//! Every line, including the last row, ends with `\n`.  The cell alphabet is
//! chosen by the codec passed to [`CellMap::to_text`] / [`CellMap::from_text`].

use pr_core::CellCoord;

use crate::{CellMap, CellRect, GridError, GridResult, Obstruction, Signal};

const HEADER_PREFIX: &str = "tlc";

/// Maps one cell value to and from one character.
pub trait CellCodec<T> {
    /// `None` if `value` has no representation in this alphabet.
    fn encode(&self, value: &T) -> Option<char>;

    /// `None` if `ch` is not part of this alphabet.
    fn decode(&self, ch: char) -> Option<T>;
}

/// Decimal digits `0`..`9`.
#[derive(Copy, Clone, Debug, Default)]
pub struct SignalCodec;

impl CellCodec<Signal> for SignalCodec {
    #[inline]
    fn encode(&self, value: &Signal) -> Option<char> {
        char::from_digit(u32::from(*value), 10)
    }

    #[inline]
    fn decode(&self, ch: char) -> Option<Signal> {
        ch.to_digit(10).map(|d| d as Signal)
    }
}

/// `O` for open, `B` for blocked.
#[derive(Copy, Clone, Debug, Default)]
pub struct MaskCodec;

impl CellCodec<Obstruction> for MaskCodec {
    #[inline]
    fn encode(&self, value: &Obstruction) -> Option<char> {
        Some(match value {
            Obstruction::Open => 'O',
            Obstruction::Blocked => 'B',
        })
    }

    #[inline]
    fn decode(&self, ch: char) -> Option<Obstruction> {
        match ch {
            'O' => Some(Obstruction::Open),
            'B' => Some(Obstruction::Blocked),
            _ => None,
        }
    }
}

impl<T: Clone> CellMap<T> {
    /// Serialize with `codec`.
    pub fn to_text<C: CellCodec<T>>(&self, codec: &C) -> GridResult<String>
    where
        T: std::fmt::Debug,
    {
        let tl = self.top_left();
        let mut out = String::with_capacity(16 + (self.width() + 1) * self.height());
        out.push_str(&format!("{HEADER_PREFIX}{};{}\n", tl.x, tl.y));
        for row in self.values().chunks(self.width()) {
            for value in row {
                let ch = codec
                    .encode(value)
                    .ok_or_else(|| GridError::Encode(format!("{value:?}")))?;
                out.push(ch);
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse text produced by [`to_text`](Self::to_text).
    pub fn from_text<C: CellCodec<T>>(text: &str, codec: &C) -> GridResult<Self> {
        let mut lines = text.lines();
        let header = lines.next().ok_or_else(|| decode_err(1, "empty input"))?;
        let top_left = parse_header(header)?;

        let mut width = None;
        let mut cells = Vec::new();
        let mut height = 0;
        for (i, line) in lines.enumerate() {
            let line_no = i + 2;
            let start = cells.len();
            for ch in line.chars() {
                let value = codec
                    .decode(ch)
                    .ok_or_else(|| decode_err(line_no, format!("invalid cell character {ch:?}")))?;
                cells.push(value);
            }
            let row_width = cells.len() - start;
            match width {
                None if row_width == 0 => return Err(decode_err(line_no, "empty row")),
                None => width = Some(row_width),
                Some(w) if w != row_width => {
                    return Err(decode_err(
                        line_no,
                        format!("row has {row_width} cells, expected {w}"),
                    ));
                }
                Some(_) => {}
            }
            height += 1;
        }
        let width = width.ok_or_else(|| decode_err(2, "no rows"))?;
        let rect = CellRect::new(top_left, width, height)?;
        Ok(CellMap::from_parts(rect, cells))
    }
}

fn parse_header(line: &str) -> GridResult<CellCoord> {
    let coords = line
        .strip_prefix(HEADER_PREFIX)
        .ok_or_else(|| decode_err(1, format!("missing {HEADER_PREFIX:?} header")))?;
    let (x, y) = coords
        .split_once(';')
        .ok_or_else(|| decode_err(1, "header needs <x>;<y>"))?;
    let x = x.trim().parse().map_err(|e| decode_err(1, format!("bad x {x:?}: {e}")))?;
    let y = y.trim().parse().map_err(|e| decode_err(1, format!("bad y {y:?}: {e}")))?;
    Ok(CellCoord::new(x, y))
}

fn decode_err(line: usize, reason: impl Into<String>) -> GridError {
    GridError::Decode { line, reason: reason.into() }
}
