//! `pr-spatial`: spatial indexing of simulated entities.
//!
//! The simulator consumes only the [`SpatialIndex`] trait: add a point,
//! move it, change its type, count by type, and query a box or a radius.
//! [`RTreeIndex`] is the in-memory implementation backed by `rstar`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`feature`] | `FeatureType` and its numeric feature codes         |
//! | [`index`]   | `SpatialIndex` trait, `Neighbor`                    |
//! | [`rtree`]   | `RTreeIndex`                                        |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                  |

pub mod error;
pub mod feature;
pub mod index;
pub mod rtree;


pub use error::{SpatialError, SpatialResult};
pub use feature::FeatureType;
pub use index::{Neighbor, SpatialIndex};
pub use rtree::RTreeIndex;
