//! Clause generators, implemented as methods on [`CrystalModel`].
//!
//! [`CrystalModel`]: crate::model::CrystalModel

pub mod bounds;
pub mod neighbor;
pub mod occupancy;
pub mod packing;
