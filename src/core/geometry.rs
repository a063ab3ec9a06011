use crate::core::structure::{CellParameters, Coordinate, CoordinateSystem, GridDims, Lattice, Rounding, Site};
use crate::error::{CrystalSatError, Result};
use nalgebra::Vector3;
use serde::Deserialize;

/// Slack added to every distance window so that a cutoff computed by the
/// caller as `a / n` still matches the node spacing computed here.
pub const DISTANCE_EPS: f64 = 1e-9;

/// Fractional values this far below zero are treated as zero.
const FRACTIONAL_EPS: f64 = 1e-12;

/// Which distance window a neighbour query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborMode {
    /// Every site with `distance <= cutoff + tolerance`.
    #[default]
    Ball,
    /// Sites with `cutoff - tolerance <= distance <= cutoff + tolerance`.
    Shell,
}

impl NeighborMode {
    pub fn accepts(&self, distance: f64, cutoff: f64, tolerance: f64) -> bool {
        let upper = cutoff + tolerance + DISTANCE_EPS;
        match self {
            NeighborMode::Ball => distance <= upper,
            NeighborMode::Shell => distance >= cutoff - tolerance - DISTANCE_EPS && distance <= upper,
        }
    }
}

// ============================================================================
// PERIODIC GRID
// ============================================================================

/// The discretised unit cell: an `nx * ny * nz` grid of nodes over a
/// parallelepiped, periodic along all three axes.
///
/// Sites are flattened x-slowest (`x * ny * nz + y * nz + z`), the same
/// nesting the variable encoder uses.
#[derive(Debug, Clone)]
pub struct PeriodicGrid {
    dims: GridDims,
    cell: CellParameters,
    lattice: Lattice,
    /// Minimum-image distance for every wrapped integer offset, flattened
    /// like a site index.
    offset_distances: Vec<f64>,
}

impl PeriodicGrid {
    pub fn new(dims: GridDims, cell: CellParameters) -> Result<Self> {
        GridDims::new(dims.nx, dims.ny, dims.nz)?;
        let lattice = Lattice::from_cell(&cell)?;

        let mut offset_distances = Vec::with_capacity(dims.site_count());
        for dx in 0..dims.nx {
            for dy in 0..dims.ny {
                for dz in 0..dims.nz {
                    let frac = Vector3::new(
                        reduce_offset(dx, dims.nx) as f64 / dims.nx as f64,
                        reduce_offset(dy, dims.ny) as f64 / dims.ny as f64,
                        reduce_offset(dz, dims.nz) as f64 / dims.nz as f64,
                    );
                    offset_distances.push(minimum_image_norm(&lattice, &frac));
                }
            }
        }

        Ok(Self {
            dims,
            cell,
            lattice,
            offset_distances,
        })
    }

    pub fn dims(&self) -> GridDims { self.dims }
    pub fn cell(&self) -> &CellParameters { &self.cell }
    pub fn lattice(&self) -> &Lattice { &self.lattice }
    pub fn site_count(&self) -> usize { self.dims.site_count() }

    pub fn contains(&self, site: Site) -> bool {
        site.x < self.dims.nx && site.y < self.dims.ny && site.z < self.dims.nz
    }

    pub fn site_index(&self, site: Site) -> usize {
        site.x * self.dims.ny * self.dims.nz + site.y * self.dims.nz + site.z
    }

    pub fn site_at(&self, index: usize) -> Site {
        let plane = self.dims.ny * self.dims.nz;
        Site::new(index / plane, (index % plane) / self.dims.nz, index % self.dims.nz)
    }

    /// All sites in flattened order.
    pub fn sites(&self) -> impl Iterator<Item = Site> + '_ {
        (0..self.site_count()).map(move |i| self.site_at(i))
    }

    pub fn fractional(&self, site: Site) -> Vector3<f64> {
        Vector3::new(
            site.x as f64 / self.dims.nx as f64,
            site.y as f64 / self.dims.ny as f64,
            site.z as f64 / self.dims.nz as f64,
        )
    }

    pub fn cartesian(&self, site: Site) -> Vector3<f64> {
        self.lattice.to_cartesian(&self.fractional(site))
    }

    /// Expresses a site in the requested coordinate system.
    pub fn convert(&self, site: Site, system: CoordinateSystem) -> Coordinate {
        match system {
            CoordinateSystem::Integer => Coordinate::from(site),
            CoordinateSystem::Fractional => Coordinate::Fractional(self.fractional(site)),
            CoordinateSystem::Cartesian => Coordinate::Cartesian(self.cartesian(site)),
        }
    }

    /// Resolves a coordinate to a grid node.
    ///
    /// Fractional input must lie in `[0, 1)` on every axis and Cartesian
    /// input inside the cell; anything else is `OutOfBounds`. A value that
    /// rounds up onto the far cell face wraps to node 0.
    pub fn to_site(&self, coord: &Coordinate, rounding: Rounding) -> Result<Site> {
        let frac = match coord {
            Coordinate::Integer(v) => {
                let n = self.dims.as_array();
                if (0..3).any(|i| v[i] < 0 || v[i] as usize >= n[i]) {
                    return Err(self.out_of_bounds(coord));
                }
                return Ok(Site::new(v[0] as usize, v[1] as usize, v[2] as usize));
            }
            Coordinate::Fractional(f) => *f,
            Coordinate::Cartesian(c) => self.lattice.to_fractional(c).map(|v| {
                if v < 0.0 && v > -FRACTIONAL_EPS { 0.0 } else { v }
            }),
        };

        if frac.iter().any(|&v| !(0.0..1.0).contains(&v)) {
            return Err(self.out_of_bounds(coord));
        }

        let n = self.dims.as_array();
        let mut idx = [0usize; 3];
        for axis in 0..3 {
            let scaled = frac[axis] * n[axis] as f64;
            let node = rounding.apply(scaled).ok_or_else(|| {
                CrystalSatError::UnsupportedRounding(format!(
                    "{} does not sit on a grid node; choose floor, ceil or nearest",
                    coord
                ))
            })?;
            idx[axis] = node.rem_euclid(n[axis] as i64) as usize;
        }
        Ok(Site::from(idx))
    }

    fn out_of_bounds(&self, coord: &Coordinate) -> CrystalSatError {
        let [x, y, z] = coord.values();
        CrystalSatError::OutOfBounds { x, y, z, system: coord.system().name() }
    }

    /// Minimum-image Euclidean distance in Ångström.
    ///
    /// Symmetric bit for bit: `distance(p, q) == distance(q, p)`.
    pub fn distance(&self, p: Site, q: Site) -> f64 {
        let dx = (q.x + self.dims.nx - p.x) % self.dims.nx;
        let dy = (q.y + self.dims.ny - p.y) % self.dims.ny;
        let dz = (q.z + self.dims.nz - p.z) % self.dims.nz;
        self.offset_distances[dx * self.dims.ny * self.dims.nz + dy * self.dims.nz + dz]
    }

    /// Sites other than `p` inside the distance window. O(sites).
    pub fn neighbors(&self, p: Site, cutoff: f64, tolerance: f64, mode: NeighborMode) -> Vec<Site> {
        self.sites()
            .filter(|&q| q != p && mode.accepts(self.distance(p, q), cutoff, tolerance))
            .collect()
    }

    /// Unordered pairs of distinct sites closer than `max_distance`.
    pub fn pairs_within(&self, max_distance: f64) -> Vec<(Site, Site, f64)> {
        let n = self.site_count();
        let mut pairs = Vec::new();
        for i in 0..n {
            let p = self.site_at(i);
            for j in (i + 1)..n {
                let q = self.site_at(j);
                let d = self.distance(p, q);
                if d < max_distance {
                    pairs.push((p, q, d));
                }
            }
        }
        pairs
    }
}

/// Maps a wrapped offset in `[0, n)` onto `(-n/2, n/2]`.
fn reduce_offset(d: usize, n: usize) -> i64 {
    let d = (d % n) as i64;
    let n = n as i64;
    if 2 * d > n { d - n } else { d }
}

/// Shortest image of a reduced fractional offset among the 27 adjacent cells.
fn minimum_image_norm(lattice: &Lattice, frac: &Vector3<f64>) -> f64 {
    let mut best = f64::INFINITY;
    for sx in -1..=1 {
        for sy in -1..=1 {
            for sz in -1..=1 {
                let image = frac + Vector3::new(sx as f64, sy as f64, sz as f64);
                best = best.min(lattice.to_cartesian(&image).norm());
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(n: usize, a: f64) -> PeriodicGrid {
        PeriodicGrid::new(GridDims::new(n, n, n).unwrap(), CellParameters::cubic(a)).unwrap()
    }

    #[test]
    fn wrap_around_neighbour_matches_adjacent() {
        let grid = cubic(5, 10.0);
        let origin = Site::new(0, 0, 0);
        let forward = grid.distance(origin, Site::new(1, 0, 0));
        let backward = grid.distance(origin, Site::new(4, 0, 0));
        assert_eq!(forward, backward);
        assert!((forward - 2.0).abs() < 1e-12);
    }

    #[test]
    fn distance_is_symmetric_in_skewed_cell() {
        let grid = PeriodicGrid::new(
            GridDims::new(4, 3, 5).unwrap(),
            CellParameters::new(5.0, 6.0, 7.0, 80.0, 95.0, 110.0),
        )
        .unwrap();
        for p in grid.sites() {
            for q in grid.sites() {
                assert_eq!(grid.distance(p, q), grid.distance(q, p));
            }
        }
    }

    #[test]
    fn ball_and_shell_windows() {
        let grid = cubic(4, 4.0);
        let p = Site::new(0, 0, 0);
        // six face neighbours at 1.0, twelve edge neighbours at sqrt(2)
        assert_eq!(grid.neighbors(p, 1.0, 0.0, NeighborMode::Ball).len(), 6);
        assert_eq!(grid.neighbors(p, 1.5, 0.0, NeighborMode::Ball).len(), 18);
        assert_eq!(grid.neighbors(p, 2f64.sqrt(), 0.01, NeighborMode::Shell).len(), 12);
        assert!(!grid.neighbors(p, 10.0, 0.0, NeighborMode::Ball).contains(&p));
    }

    #[test]
    fn to_site_conversions() {
        let grid = cubic(4, 8.0);
        let site = grid
            .to_site(&Coordinate::Fractional(Vector3::new(0.25, 0.5, 0.0)), Rounding::Exact)
            .unwrap();
        assert_eq!(site, Site::new(1, 2, 0));

        let off_node = Coordinate::Fractional(Vector3::new(0.3, 0.0, 0.0));
        assert!(matches!(
            grid.to_site(&off_node, Rounding::Exact),
            Err(CrystalSatError::UnsupportedRounding(_))
        ));
        assert_eq!(grid.to_site(&off_node, Rounding::Floor).unwrap(), Site::new(1, 0, 0));
        assert_eq!(grid.to_site(&off_node, Rounding::Ceil).unwrap(), Site::new(2, 0, 0));

        let cart = Coordinate::Cartesian(Vector3::new(4.0, 6.0, 7.9));
        assert_eq!(grid.to_site(&cart, Rounding::Nearest).unwrap(), Site::new(2, 3, 0));

        assert!(matches!(
            grid.to_site(&Coordinate::Fractional(Vector3::new(1.0, 0.0, 0.0)), Rounding::Floor),
            Err(CrystalSatError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.to_site(&Coordinate::Integer([0, 4, 0]), Rounding::Exact),
            Err(CrystalSatError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn flattened_index_round_trip() {
        let grid = PeriodicGrid::new(GridDims::new(2, 3, 4).unwrap(), CellParameters::cubic(1.0)).unwrap();
        for (i, site) in grid.sites().enumerate() {
            assert_eq!(grid.site_index(site), i);
        }
        assert_eq!(grid.site_at(23), Site::new(1, 2, 3));
    }
}
