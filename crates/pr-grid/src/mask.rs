//! Two-valued obstruction marker.

/// Whether a cell can be covered at all (a street) or not (a building,
/// water, anywhere vehicles never go).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Obstruction {
    Open,
    #[default]
    Blocked,
}

impl Obstruction {
    #[inline]
    pub fn is_open(self) -> bool {
        self == Obstruction::Open
    }
}
