use crate::error::{CrystalSatError, Result};
use nalgebra::{Matrix3, Vector3};
use std::fmt;

/// Decimal places kept when canonicalising a fractional image.
pub const IMAGE_DECIMALS: i32 = 8;

/// Anything that can expand a fractional position into its symmetry orbit.
pub trait SymmetryService {
    /// Every distinct image of `frac`, wrapped into `[0, 1)`. Images closer
    /// than `tolerance` (fractional, per axis) are merged.
    fn orbit(&self, frac: &Vector3<f64>, tolerance: f64) -> Vec<Vector3<f64>>;
}

// ============================================================================
// SYMMETRY OPERATION
// ============================================================================

/// Affine map `x -> R x + t` in fractional coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SymOp {
    rotation: Matrix3<i32>,
    translation: Vector3<f64>,
}

impl SymOp {
    pub fn new(rotation: Matrix3<i32>, translation: Vector3<f64>) -> Self {
        Self { rotation, translation }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// Parses a Jones-faithful triplet such as `"-y,x-y,z+1/3"`.
    pub fn parse(op: &str) -> Result<Self> {
        let invalid = |reason: &str| CrystalSatError::InvalidSymmetryOperation {
            op: op.to_string(),
            reason: reason.to_string(),
        };
        let parts: Vec<&str> = op.split(',').collect();
        if parts.len() != 3 {
            return Err(invalid("expected three comma-separated components"));
        }
        let mut rotation = Matrix3::zeros();
        let mut translation = Vector3::zeros();
        for (row, part) in parts.iter().enumerate() {
            let (coeffs, shift) = parse_component(part).map_err(|reason| invalid(&reason))?;
            for col in 0..3 {
                rotation[(row, col)] = coeffs[col];
            }
            translation[row] = shift;
        }
        if rotation.map(|v| v as f64).determinant().abs() < 0.5 {
            return Err(invalid("rotation part is singular"));
        }
        Ok(Self::new(rotation, translation))
    }

    pub fn rotation(&self) -> &Matrix3<i32> { &self.rotation }
    pub fn translation(&self) -> &Vector3<f64> { &self.translation }

    pub fn apply(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.map(|v| v as f64) * frac + self.translation
    }

    fn with_translation(&self, shift: Vector3<f64>) -> Self {
        Self::new(self.rotation, self.translation + shift)
    }
}

impl fmt::Display for SymOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes = ['x', 'y', 'z'];
        let mut rows = Vec::with_capacity(3);
        for row in 0..3 {
            let mut s = String::new();
            for (col, axis) in axes.iter().enumerate() {
                match self.rotation[(row, col)] {
                    0 => {}
                    c => {
                        if c < 0 {
                            s.push('-');
                        } else if !s.is_empty() {
                            s.push('+');
                        }
                        if c.abs() != 1 {
                            s.push_str(&c.abs().to_string());
                        }
                        s.push(*axis);
                    }
                }
            }
            let t = self.translation[row];
            if t.abs() > 1e-12 {
                s.push_str(&format!("{:+}", t));
            }
            rows.push(s);
        }
        write!(f, "{}", rows.join(","))
    }
}

/// One row of a Jones triplet: signed sum of axis letters and constants.
fn parse_component(expr: &str) -> std::result::Result<([i32; 3], f64), String> {
    let expr: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    if expr.is_empty() {
        return Err("empty component".into());
    }

    let mut coeffs = [0i32; 3];
    let mut shift = 0.0;
    let mut sign = 1;
    let mut term = String::new();

    let mut flush = |term: &mut String, sign: i32| -> std::result::Result<(), String> {
        if term.is_empty() {
            return Ok(());
        }
        match term.to_ascii_lowercase().as_str() {
            "x" => coeffs[0] += sign,
            "y" => coeffs[1] += sign,
            "z" => coeffs[2] += sign,
            number => shift += sign as f64 * parse_number(number)?,
        }
        term.clear();
        Ok(())
    };

    for c in expr.chars() {
        match c {
            '+' | '-' => {
                if !term.is_empty() {
                    flush(&mut term, sign)?;
                    sign = 1;
                }
                if c == '-' {
                    sign = -sign;
                }
            }
            _ => term.push(c),
        }
    }
    if term.is_empty() {
        return Err(format!("dangling sign in '{}'", expr));
    }
    flush(&mut term, sign)?;
    Ok((coeffs, shift))
}

fn parse_number(s: &str) -> std::result::Result<f64, String> {
    let bad = || format!("cannot read '{}' as a translation", s);
    match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().map_err(|_| bad())?;
            let den: f64 = den.parse().map_err(|_| bad())?;
            if den == 0.0 {
                return Err(bad());
            }
            Ok(num / den)
        }
        None => s.parse().map_err(|_| bad()),
    }
}

// ============================================================================
// SPACE GROUP
// ============================================================================

/// A named set of symmetry operations.
#[derive(Debug, Clone)]
pub struct SpaceGroup {
    name: String,
    operations: Vec<SymOp>,
}

/// Bundled groups: (International Tables number, Hermann-Mauguin symbol).
const BUILTIN: [(u16, &str); 9] = [
    (1, "P1"),
    (2, "P-1"),
    (10, "P2/m"),
    (47, "Pmmm"),
    (99, "P4mm"),
    (123, "P4/mmm"),
    (221, "Pm-3m"),
    (229, "Im-3m"),
    (225, "Fm-3m"),
];

impl SpaceGroup {
    pub fn from_operations(name: &str, operations: &[&str]) -> Result<Self> {
        let mut ops = operations.iter().map(|op| SymOp::parse(op)).collect::<Result<Vec<_>>>()?;
        if !ops.iter().any(|op| *op == SymOp::identity()) {
            ops.insert(0, SymOp::identity());
        }
        Ok(Self { name: name.to_string(), operations: ops })
    }

    /// Looks up a bundled group by Hermann-Mauguin symbol or number.
    pub fn builtin(key: &str) -> Result<Self> {
        let key = key.trim();
        let (number, symbol) = BUILTIN
            .iter()
            .copied()
            .find(|(n, s)| s.eq_ignore_ascii_case(key) || n.to_string() == key)
            .ok_or_else(|| CrystalSatError::UnknownSpaceGroup(key.to_string()))?;

        let point_ops = match number {
            1 => vec![Matrix3::identity()],
            2 => vec![Matrix3::identity(), -Matrix3::<i32>::identity()],
            10 => vec![
                Matrix3::identity(),
                Matrix3::from_diagonal(&Vector3::new(-1, 1, -1)),
                -Matrix3::<i32>::identity(),
                Matrix3::from_diagonal(&Vector3::new(1, -1, 1)),
            ],
            47 => signed_permutations(|perm| perm == [0, 1, 2]),
            99 => signed_permutations(|perm| perm[2] == 2)
                .into_iter()
                .filter(|m| m[(2, 2)] == 1)
                .collect(),
            123 => signed_permutations(|perm| perm[2] == 2),
            _ => signed_permutations(|_| true),
        };
        let centring: Vec<Vector3<f64>> = match number {
            229 => vec![Vector3::zeros(), Vector3::new(0.5, 0.5, 0.5)],
            225 => vec![
                Vector3::zeros(),
                Vector3::new(0.0, 0.5, 0.5),
                Vector3::new(0.5, 0.0, 0.5),
                Vector3::new(0.5, 0.5, 0.0),
            ],
            _ => vec![Vector3::zeros()],
        };

        let mut operations = Vec::with_capacity(point_ops.len() * centring.len());
        for shift in &centring {
            for rotation in &point_ops {
                operations.push(SymOp::new(*rotation, Vector3::zeros()).with_translation(*shift));
            }
        }
        Ok(Self { name: symbol.to_string(), operations })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn operations(&self) -> &[SymOp] { &self.operations }
    pub fn len(&self) -> usize { self.operations.len() }
    pub fn is_empty(&self) -> bool { self.operations.is_empty() }
}

impl SymmetryService for SpaceGroup {
    fn orbit(&self, frac: &Vector3<f64>, tolerance: f64) -> Vec<Vector3<f64>> {
        let mut images: Vec<Vector3<f64>> = Vec::with_capacity(self.operations.len());
        for op in &self.operations {
            let image = canonical_image(&op.apply(frac));
            let seen = images
                .iter()
                .any(|other| (0..3).all(|i| periodic_gap(image[i], other[i]) <= tolerance));
            if !seen {
                images.push(image);
            }
        }
        images
    }
}

/// Wraps into `[0, 1)` and rounds to [`IMAGE_DECIMALS`] places.
pub fn canonical_image(frac: &Vector3<f64>) -> Vector3<f64> {
    let scale = 10f64.powi(IMAGE_DECIMALS);
    frac.map(|v| {
        let r = (v.rem_euclid(1.0) * scale).round() / scale;
        if r >= 1.0 { 0.0 } else { r }
    })
}

/// Distance between two fractional values on the unit circle.
fn periodic_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(1.0);
    d.min(1.0 - d)
}

/// Every signed permutation matrix whose permutation passes `keep`.
fn signed_permutations(keep: impl Fn([usize; 3]) -> bool) -> Vec<Matrix3<i32>> {
    const PERMS: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    let mut out = Vec::new();
    for perm in PERMS.into_iter().filter(|&p| keep(p)) {
        for signs in 0..8u8 {
            let mut m = Matrix3::zeros();
            for row in 0..3 {
                m[(row, perm[row])] = if signs >> row & 1 == 1 { -1 } else { 1 };
            }
            out.push(m);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jones_triplets() {
        let op = SymOp::parse("-y, x-y, z+1/3").unwrap();
        let image = op.apply(&Vector3::new(0.1, 0.2, 0.3));
        assert!((image - Vector3::new(-0.2, -0.1, 0.3 + 1.0 / 3.0)).norm() < 1e-12);
        assert_eq!(SymOp::parse("1/2+x,-y,-z").unwrap().translation()[0], 0.5);
        assert!(SymOp::parse("x,y").is_err());
        assert!(SymOp::parse("x,y,q").is_err());
        assert!(SymOp::parse("x,x,z").is_err());
        assert!(SymOp::parse("x,y,z+").is_err());
    }

    #[test]
    fn builtin_group_orders() {
        let orders = [("P1", 1), ("P-1", 2), ("10", 4), ("Pmmm", 8), ("P4mm", 8), ("P4/mmm", 16), ("221", 48), ("Im-3m", 96), ("fm-3m", 192)];
        for (key, order) in orders {
            assert_eq!(SpaceGroup::builtin(key).unwrap().len(), order, "{}", key);
        }
        assert!(matches!(SpaceGroup::builtin("P6_3/mmc"), Err(CrystalSatError::UnknownSpaceGroup(_))));
    }

    #[test]
    fn cubic_orbits_of_perovskite_positions() {
        let group = SpaceGroup::builtin("Pm-3m").unwrap();
        assert_eq!(group.orbit(&Vector3::new(0.0, 0.0, 0.0), 1e-6).len(), 1);
        assert_eq!(group.orbit(&Vector3::new(0.5, 0.5, 0.5), 1e-6).len(), 1);
        assert_eq!(group.orbit(&Vector3::new(0.5, 0.5, 0.0), 1e-6).len(), 3);
        assert_eq!(group.orbit(&Vector3::new(0.5, 0.0, 0.0), 1e-6).len(), 3);
    }

    #[test]
    fn images_are_wrapped_and_rounded() {
        let image = canonical_image(&Vector3::new(-0.25, 1.0 - 1e-12, 2.5));
        assert_eq!(image, Vector3::new(0.75, 0.0, 0.5));
    }

    #[test]
    fn display_round_trips() {
        let op = SymOp::parse("-y,x-y,z+1/2").unwrap();
        assert_eq!(SymOp::parse(&op.to_string()).unwrap(), op);
    }
}
