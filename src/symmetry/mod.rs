pub mod equivalence;
pub mod orbits;
pub mod space_group;
