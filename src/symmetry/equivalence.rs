use crate::chemistry::species::SpeciesId;
use crate::core::geometry::PeriodicGrid;
use crate::core::structure::Site;
use crate::symmetry::space_group::SpaceGroup;
use tracing::debug;

/// Node-index tolerance when checking that an operation maps the grid onto itself.
const NODE_TOL: f64 = 1e-6;

/// The site permutations under which two occupancies describe the same crystal.
///
/// Holds one permutation per space-group operation that maps grid nodes onto
/// grid nodes; grid translations (origin shifts) are composed on the fly.
#[derive(Debug, Clone)]
pub struct SiteSymmetry {
    dims: [usize; 3],
    permutations: Vec<Vec<Site>>,
}

impl SiteSymmetry {
    pub fn new(grid: &PeriodicGrid, group: &SpaceGroup) -> Self {
        let dims = grid.dims().as_array();
        let mut permutations = Vec::new();
        'ops: for op in group.operations() {
            let mut image = Vec::with_capacity(grid.site_count());
            let mut hit = vec![false; grid.site_count()];
            for site in grid.sites() {
                let frac = op.apply(&grid.fractional(site));
                let mut idx = [0usize; 3];
                for axis in 0..3 {
                    let scaled = frac[axis] * dims[axis] as f64;
                    let node = scaled.round();
                    if (scaled - node).abs() > NODE_TOL {
                        continue 'ops;
                    }
                    idx[axis] = (node as i64).rem_euclid(dims[axis] as i64) as usize;
                }
                let target = Site::from(idx);
                let slot = grid.site_index(target);
                if hit[slot] {
                    continue 'ops;
                }
                hit[slot] = true;
                image.push(target);
            }
            if !permutations.contains(&image) {
                permutations.push(image);
            }
        }
        debug!(
            "{} of {} operations of {} act on the grid",
            permutations.len(),
            group.len(),
            group.name()
        );
        Self { dims, permutations }
    }

    pub fn len(&self) -> usize {
        self.permutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permutations.is_empty()
    }

    /// Lexicographically smallest sorted occupancy over every permutation
    /// and translation. Equal keys mean equivalent structures.
    ///
    /// `occupancy` holds `(flattened site index, species)` pairs.
    pub fn canonical_key(&self, occupancy: &[(usize, SpeciesId)]) -> Vec<(usize, SpeciesId)> {
        let [nx, ny, nz] = self.dims;
        let flat = |s: Site| s.x * ny * nz + s.y * nz + s.z;
        let mut best: Vec<(usize, SpeciesId)> = {
            let mut v = occupancy.to_vec();
            v.sort_unstable();
            v
        };
        let mut candidate = Vec::with_capacity(occupancy.len());
        for perm in &self.permutations {
            for tx in 0..nx {
                for ty in 0..ny {
                    for tz in 0..nz {
                        candidate.clear();
                        candidate.extend(occupancy.iter().map(|&(i, s)| {
                            let p = perm[i];
                            let moved = Site::new((p.x + tx) % nx, (p.y + ty) % ny, (p.z + tz) % nz);
                            (flat(moved), s)
                        }));
                        candidate.sort_unstable();
                        if candidate < best {
                            best.clone_from(&candidate);
                        }
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::structure::{CellParameters, GridDims};

    #[test]
    fn translations_identify_single_atoms() {
        let grid = PeriodicGrid::new(GridDims::new(3, 3, 3).unwrap(), CellParameters::cubic(3.0)).unwrap();
        let sym = SiteSymmetry::new(&grid, &SpaceGroup::builtin("P1").unwrap());
        let a = sym.canonical_key(&[(grid.site_index(Site::new(2, 1, 0)), 0)]);
        let b = sym.canonical_key(&[(0, 0)]);
        assert_eq!(a, b);
        assert_ne!(b, sym.canonical_key(&[(0, 1)]));
    }

    #[test]
    fn cubic_operations_identify_rotated_dimers() {
        let grid = PeriodicGrid::new(GridDims::new(4, 4, 4).unwrap(), CellParameters::cubic(4.0)).unwrap();
        let sym = SiteSymmetry::new(&grid, &SpaceGroup::builtin("Pm-3m").unwrap());
        assert_eq!(sym.len(), 48);
        let along_x = [(0, 0), (grid.site_index(Site::new(1, 0, 0)), 1)];
        let along_z = [(0, 0), (grid.site_index(Site::new(0, 0, 1)), 1)];
        let diagonal = [(0, 0), (grid.site_index(Site::new(1, 1, 0)), 1)];
        assert_eq!(sym.canonical_key(&along_x), sym.canonical_key(&along_z));
        assert_ne!(sym.canonical_key(&along_x), sym.canonical_key(&diagonal));
    }

    #[test]
    fn operations_that_miss_the_grid_are_dropped() {
        // a 4-fold axis cannot map a 2x3 grid onto itself
        let grid = PeriodicGrid::new(GridDims::new(2, 3, 1).unwrap(), CellParameters::cubic(4.0)).unwrap();
        let sym = SiteSymmetry::new(&grid, &SpaceGroup::builtin("P4mm").unwrap());
        assert!(sym.len() < 8);
        assert!(!sym.is_empty());
    }
}
