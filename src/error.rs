use thiserror::Error;

/// Every failure the constraint-encoding engine can report.
///
/// Errors are raised synchronously by the call that detects them. A
/// constraint method that returns an error has appended nothing to the
/// formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrystalSatError {
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    #[error("no radius data for {0}")]
    NoRadiusData(String),

    #[error("coordinate ({x}, {y}, {z}) is outside the {system} domain")]
    OutOfBounds {
        x: f64,
        y: f64,
        z: f64,
        system: &'static str,
    },

    #[error("unsupported rounding: {0}")]
    UnsupportedRounding(String),

    #[error("infeasible bound for species {species}: {reason}")]
    InfeasibleBound { species: usize, reason: String },

    #[error("symmetry orbits have not been computed; call partition() first")]
    UndefinedSymmetry,

    #[error("orbit {orbit} does not exist ({count} orbits defined)")]
    UnknownOrbit { orbit: usize, count: usize },

    #[error("invalid lattice: {0}")]
    InvalidLattice(&'static str),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("invalid symmetry operation '{op}': {reason}")]
    InvalidSymmetryOperation { op: String, reason: String },

    #[error("unknown space group '{0}'")]
    UnknownSpaceGroup(String),

    #[error("SAT engine failed: {0}")]
    Solver(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, CrystalSatError>;
