pub mod dimacs;
pub mod formula;
pub mod totalizer;
pub mod variables;
