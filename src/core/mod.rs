pub mod geometry;
pub mod structure;
