use crate::error::{CrystalSatError, Result};
use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;
use std::fmt;

// ============================================================================
// ENUMS
// ============================================================================

/// Representation a coordinate is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    /// Grid node indices `(x, y, z)`.
    #[serde(alias = "int")]
    Integer,
    /// Fractions of the cell vectors, each in `[0, 1)`.
    #[serde(alias = "frac")]
    Fractional,
    /// Absolute position in Ångström.
    #[serde(alias = "cart")]
    Cartesian,
}

impl CoordinateSystem {
    pub fn name(&self) -> &'static str {
        match self {
            CoordinateSystem::Integer => "integer",
            CoordinateSystem::Fractional => "fractional",
            CoordinateSystem::Cartesian => "cartesian",
        }
    }
}

/// How an off-node coordinate is snapped onto the grid.
///
/// | system      | Exact                        | Floor / Ceil / Nearest        |
/// |-------------|------------------------------|-------------------------------|
/// | Integer     | used as-is                   | ignored, used as-is           |
/// | Fractional  | must already sit on a node   | scaled by n, rounded, wrapped |
/// | Cartesian   | must already sit on a node   | converted to fractional first |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    #[default]
    Exact,
    Floor,
    Ceil,
    #[serde(alias = "round")]
    Nearest,
}

impl Rounding {
    /// Node tolerance in grid-index units.
    pub const NODE_EPS: f64 = 1e-9;

    /// Snaps a scaled coordinate (fraction * n) to a node index.
    /// Returns `None` only for `Exact` when the value is not on a node.
    pub fn apply(&self, scaled: f64) -> Option<i64> {
        match self {
            Rounding::Exact => {
                let nearest = scaled.round();
                if (scaled - nearest).abs() <= Self::NODE_EPS {
                    Some(nearest as i64)
                } else {
                    None
                }
            }
            // A value a hair below a node counts as that node.
            Rounding::Floor => Some((scaled + Self::NODE_EPS).floor() as i64),
            Rounding::Ceil => Some((scaled - Self::NODE_EPS).ceil() as i64),
            Rounding::Nearest => Some(scaled.round() as i64),
        }
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Grid resolution along each cell axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct GridDims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridDims {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(CrystalSatError::InvalidGrid(format!(
                "dimensions must be positive, got {}x{}x{}",
                nx, ny, nz
            )));
        }
        Ok(Self { nx, ny, nz })
    }

    pub fn site_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }
}

/// Cell lengths (Å) and angles (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CellParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl CellParameters {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { a, b, c, alpha, beta, gamma }
    }

    pub fn cubic(a: f64) -> Self {
        Self::new(a, a, a, 90.0, 90.0, 90.0)
    }
}

/// A node of the periodic grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct Site {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Site {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

impl From<[usize; 3]> for Site {
    fn from(v: [usize; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A position in one of the three coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    /// Raw integer indices; may be out of range until validated.
    Integer([i64; 3]),
    Fractional(Vector3<f64>),
    Cartesian(Vector3<f64>),
}

impl Coordinate {
    pub fn system(&self) -> CoordinateSystem {
        match self {
            Coordinate::Integer(_) => CoordinateSystem::Integer,
            Coordinate::Fractional(_) => CoordinateSystem::Fractional,
            Coordinate::Cartesian(_) => CoordinateSystem::Cartesian,
        }
    }

    /// Builds a coordinate from three raw numbers tagged with a system.
    pub fn from_values(values: [f64; 3], system: CoordinateSystem) -> Result<Self> {
        match system {
            CoordinateSystem::Integer => {
                if values.iter().any(|v| v.fract() != 0.0) {
                    return Err(CrystalSatError::OutOfBounds {
                        x: values[0],
                        y: values[1],
                        z: values[2],
                        system: system.name(),
                    });
                }
                Ok(Coordinate::Integer([values[0] as i64, values[1] as i64, values[2] as i64]))
            }
            CoordinateSystem::Fractional => {
                Ok(Coordinate::Fractional(Vector3::new(values[0], values[1], values[2])))
            }
            CoordinateSystem::Cartesian => {
                Ok(Coordinate::Cartesian(Vector3::new(values[0], values[1], values[2])))
            }
        }
    }

    pub fn values(&self) -> [f64; 3] {
        match self {
            Coordinate::Integer(v) => [v[0] as f64, v[1] as f64, v[2] as f64],
            Coordinate::Fractional(v) | Coordinate::Cartesian(v) => [v.x, v.y, v.z],
        }
    }
}

impl From<Site> for Coordinate {
    fn from(site: Site) -> Self {
        Coordinate::Integer([site.x as i64, site.y as i64, site.z as i64])
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Integer(v) => write!(f, "({}, {}, {})", v[0], v[1], v[2]),
            Coordinate::Fractional(v) | Coordinate::Cartesian(v) => {
                write!(f, "({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lattice {
    pub matrix: Matrix3<f64>,
    pub reciprocal_matrix: Matrix3<f64>,
}

impl Lattice {
    pub fn new(matrix: Matrix3<f64>) -> Result<Self> {
        if !matrix.iter().all(|v| v.is_finite()) {
            return Err(CrystalSatError::InvalidLattice("lattice has non-finite entries"));
        }
        if matrix.determinant().abs() < 1e-6 {
            return Err(CrystalSatError::InvalidLattice("lattice has zero or near-zero volume"));
        }
        let reciprocal_matrix = matrix
            .try_inverse()
            .ok_or(CrystalSatError::InvalidLattice("lattice is not invertible"))?
            .transpose();
        Ok(Self {
            matrix,
            reciprocal_matrix,
        })
    }

    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        // written so that NaN fails every check
        if [a, b, c].iter().any(|&len| !(len > 0.0 && len.is_finite())) {
            return Err(CrystalSatError::InvalidLattice("cell lengths must be positive and finite"));
        }
        if [alpha, beta, gamma].iter().any(|&angle| !(angle > 0.0 && angle < 180.0)) {
            return Err(CrystalSatError::InvalidLattice("cell angles must lie in (0, 180) degrees"));
        }

        let alpha_r = alpha.to_radians();
        let beta_r = beta.to_radians();
        let gamma_r = gamma.to_radians();

        let term = 1.0 - alpha_r.cos().powi(2) - beta_r.cos().powi(2) - gamma_r.cos().powi(2)
            + 2.0 * alpha_r.cos() * beta_r.cos() * gamma_r.cos();

        if term <= 0.0 { return Err(CrystalSatError::InvalidLattice("invalid lattice angles")); }

        let v_factor = term.sqrt();
        let matrix = Matrix3::new(
            a, b * gamma_r.cos(), c * beta_r.cos(),
            0.0, b * gamma_r.sin(), c * (alpha_r.cos() - beta_r.cos() * gamma_r.cos()) / gamma_r.sin(),
            0.0, 0.0, c * v_factor / gamma_r.sin(),
        );
        Self::new(matrix)
    }

    pub fn from_cell(cell: &CellParameters) -> Result<Self> {
        Self::from_parameters(cell.a, cell.b, cell.c, cell.alpha, cell.beta, cell.gamma)
    }

    pub fn to_cartesian(&self, frac: &Vector3<f64>) -> Vector3<f64> { self.matrix * frac }
    pub fn to_fractional(&self, cart: &Vector3<f64>) -> Vector3<f64> { self.reciprocal_matrix.transpose() * cart }

    pub fn to_parameters(&self) -> CellParameters {
        let a = self.matrix.column(0).norm();
        let b = self.matrix.column(1).norm();
        let c = self.matrix.column(2).norm();
        let alpha = (self.matrix.column(1).dot(&self.matrix.column(2)) / (b * c)).acos().to_degrees();
        let beta = (self.matrix.column(0).dot(&self.matrix.column(2)) / (a * c)).acos().to_degrees();
        let gamma = (self.matrix.column(0).dot(&self.matrix.column(1)) / (a * b)).acos().to_degrees();
        CellParameters::new(a, b, c, alpha, beta, gamma)
    }

    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }
}

/// One decoded atom, ready for export.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: String,
    pub fractional_coords: Vector3<f64>,
    /// Formal charge when the occupant is an ion.
    pub oxidation_state: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct Crystal {
    pub lattice: Lattice,
    pub atoms: Vec<Atom>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_parameters_round_trip() {
        let lattice = Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, 90.0, 90.0).unwrap();
        let params = lattice.to_parameters();
        assert!((params.a - 4.0).abs() < 1e-9);
        assert!((params.gamma - 90.0).abs() < 1e-9);
        assert!((lattice.volume() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_angles_are_rejected() {
        assert!(Lattice::from_parameters(1.0, 1.0, 1.0, 120.0, 120.0, 120.0).is_err());
        assert!(Lattice::from_parameters(1.0, -1.0, 1.0, 90.0, 90.0, 90.0).is_err());
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        assert!(Lattice::from_parameters(f64::NAN, 4.0, 4.0, 90.0, 90.0, 90.0).is_err());
        assert!(Lattice::from_parameters(4.0, f64::INFINITY, 4.0, 90.0, 90.0, 90.0).is_err());
        assert!(Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, f64::NAN, 90.0).is_err());
        let mut m = Matrix3::identity();
        m[(1, 2)] = f64::NAN;
        assert!(Lattice::new(m).is_err());
    }

    #[test]
    fn hexagonal_cell_fractional_round_trip() {
        let lattice = Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0).unwrap();
        let frac = Vector3::new(0.25, 0.5, 0.75);
        let back = lattice.to_fractional(&lattice.to_cartesian(&frac));
        assert!((back - frac).norm() < 1e-12);
    }

    #[test]
    fn rounding_table() {
        assert_eq!(Rounding::Exact.apply(2.0), Some(2));
        assert_eq!(Rounding::Exact.apply(2.4), None);
        assert_eq!(Rounding::Floor.apply(2.7), Some(2));
        assert_eq!(Rounding::Ceil.apply(2.1), Some(3));
        assert_eq!(Rounding::Ceil.apply(2.0), Some(2));
        assert_eq!(Rounding::Nearest.apply(2.6), Some(3));
    }
}
