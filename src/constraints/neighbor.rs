//! Distance-driven occupancy rules: isolation, shells, coordination counts.
//!
//! Neighbour sets come from [`PeriodicGrid::neighbors`], whose distance is
//! exactly symmetric, so `q` is a neighbour of `p` iff `p` is one of `q`.
//! Iterating every site as the centre therefore emits both orientations of
//! each pairwise exclusion.
//!
//! [`PeriodicGrid::neighbors`]: crate::core::geometry::PeriodicGrid::neighbors

use crate::chemistry::species::SpeciesId;
use crate::core::geometry::NeighborMode;
use crate::encoding::totalizer::Totalizer;
use crate::encoding::variables::Lit;
use crate::error::{CrystalSatError, Result};
use crate::model::CrystalModel;

impl CrystalModel {
    /// No site within the window of a `target` site may hold any of `forbidden`.
    pub fn isolate(
        &mut self,
        target: SpeciesId,
        forbidden: &[SpeciesId],
        cutoff: f64,
        tolerance: f64,
        mode: NeighborMode,
    ) -> Result<usize> {
        self.check_species(target)?;
        for &f in forbidden {
            self.check_species(f)?;
        }
        self.check_length("cutoff", cutoff)?;
        self.check_length("tolerance", tolerance)?;

        let mut batch = self.formula.batch();
        for p in self.grid.sites() {
            let t_p = self.encoder.lit(p, target);
            for q in self.grid.neighbors(p, cutoff, tolerance, mode) {
                for &f in forbidden {
                    // the pair (q, p) emits the same clause for f == target
                    if f == target && self.grid.site_index(q) < self.grid.site_index(p) {
                        continue;
                    }
                    batch.add(vec![-t_p, -self.encoder.lit(q, f)]);
                }
            }
        }
        Ok(self.commit("isolate", batch))
    }

    pub fn isolate_from_itself(
        &mut self,
        species: SpeciesId,
        cutoff: f64,
        tolerance: f64,
        mode: NeighborMode,
    ) -> Result<usize> {
        self.isolate(species, &[species], cutoff, tolerance, mode)
    }

    /// Nothing at all may sit within the window of a `species` site.
    pub fn isolate_from_all(
        &mut self,
        species: SpeciesId,
        cutoff: f64,
        tolerance: f64,
        mode: NeighborMode,
    ) -> Result<usize> {
        let all: Vec<SpeciesId> = self.catalog.ids().collect();
        self.isolate(species, &all, cutoff, tolerance, mode)
    }

    /// Every shell neighbour of a `center` site must hold `ligand`.
    pub fn surround(
        &mut self,
        center: SpeciesId,
        ligand: SpeciesId,
        distance: f64,
        tolerance: f64,
    ) -> Result<usize> {
        self.check_species(center)?;
        self.check_species(ligand)?;
        self.check_length("distance", distance)?;
        self.check_length("tolerance", tolerance)?;

        let mut batch = self.formula.batch();
        for p in self.grid.sites() {
            let c_p = self.encoder.lit(p, center);
            for q in self.grid.neighbors(p, distance, tolerance, NeighborMode::Shell) {
                batch.add(vec![-c_p, self.encoder.lit(q, ligand)]);
            }
        }
        Ok(self.commit("surround", batch))
    }

    /// If `center` sits at `p`, between `min` and `max` of the neighbours of
    /// `p` hold `ligand`.
    ///
    /// One totalizer per site, with its bound outputs guarded by the centre
    /// literal. A site with fewer than `min` neighbours can never hold `center`.
    #[allow(clippy::too_many_arguments)]
    pub fn require_coordination(
        &mut self,
        center: SpeciesId,
        ligand: SpeciesId,
        cutoff: f64,
        tolerance: f64,
        mode: NeighborMode,
        min: usize,
        max: Option<usize>,
    ) -> Result<usize> {
        self.check_species(center)?;
        self.check_species(ligand)?;
        self.check_length("cutoff", cutoff)?;
        self.check_length("tolerance", tolerance)?;
        if let Some(max) = max {
            if max < min {
                return Err(CrystalSatError::InvalidArgument(format!(
                    "coordination window [{}, {}] is empty",
                    min, max
                )));
            }
        }

        let mut batch = self.formula.batch();
        for p in self.grid.sites() {
            let c_p = self.encoder.lit(p, center);
            let inputs: Vec<Lit> = self
                .grid
                .neighbors(p, cutoff, tolerance, mode)
                .into_iter()
                .map(|q| self.encoder.lit(q, ligand))
                .collect();
            let totalizer = Totalizer::for_bounds(&inputs, min, max, &mut batch);
            match totalizer.bound_literals(min, max) {
                Some(lits) => {
                    for lit in lits {
                        batch.add(vec![-c_p, lit]);
                    }
                }
                None => batch.unit(-c_p),
            }
        }
        Ok(self.commit("require_coordination", batch))
    }
}

#[cfg(test)]
mod tests {
    use crate::chemistry::species::Species;
    use crate::core::geometry::NeighborMode;
    use crate::core::structure::{CellParameters, CoordinateSystem, GridDims, Site};
    use crate::model::CrystalModel;
    use crate::solver::cdcl::CdclSolver;
    use crate::solver::decode::Placement;

    fn holds(placements: &[Placement], x: usize, species: usize) -> bool {
        placements.iter().any(|p| p.site == Site::new(x, 0, 0) && p.species_id == species)
    }

    fn chain(n: usize) -> CrystalModel {
        CrystalModel::new(
            GridDims::new(n, 1, 1).unwrap(),
            CellParameters::cubic(n as f64),
            vec![Species::element("Na"), Species::element("Cl")],
        )
        .unwrap()
    }

    #[test]
    fn self_isolation_emits_each_pair_once() {
        let mut m = chain(4);
        // ring of four: each site has two neighbours at 1.0
        assert_eq!(m.isolate_from_itself(0, 1.0, 0.0, NeighborMode::Ball).unwrap(), 4);
    }

    #[test]
    fn cross_isolation_covers_both_orientations() {
        let mut m = chain(3);
        m.isolate(0, &[1], 1.0, 0.0, NeighborMode::Ball).unwrap();
        let na0 = m.encoder().lit(Site::new(0, 0, 0), 0);
        let cl1 = m.encoder().lit(Site::new(1, 0, 0), 1);
        let na1 = m.encoder().lit(Site::new(1, 0, 0), 0);
        let cl0 = m.encoder().lit(Site::new(0, 0, 0), 1);
        let clauses = m.formula().clauses();
        assert!(clauses.contains(&vec![-na0, -cl1]));
        assert!(clauses.contains(&vec![-na1, -cl0]));
    }

    #[test]
    fn negative_cutoff_is_rejected() {
        let mut m = chain(3);
        assert!(m.isolate_from_all(0, -1.0, 0.0, NeighborMode::Ball).is_err());
        assert!(m.formula().is_empty());
    }

    #[test]
    fn unreachable_coordination_forbids_centre() {
        let mut m = chain(3);
        // only two neighbours exist within 1.0
        m.require_coordination(0, 1, 1.0, 0.0, NeighborMode::Ball, 3, None).unwrap();
        for site in m.grid().sites().collect::<Vec<_>>() {
            let v = m.encoder().encode(site, 0);
            assert!(m.formula().is_forbidden(v));
        }
    }

    #[test]
    fn surround_puts_ligand_on_every_shell_neighbour() {
        let mut m = chain(4);
        assert_eq!(m.surround(0, 1, 1.0, 0.0).unwrap(), 8);
        m.exclude_multi_occupancy().unwrap();
        m.force(Site::new(0, 0, 0), 0).unwrap();

        let found = m.solve_multiple(&mut CdclSolver::new(), 10, CoordinateSystem::Integer).unwrap();
        // site 2 is empty, Na or Cl
        assert_eq!(found.len(), 3);
        for placements in &found {
            assert!(holds(placements, 1, 1) && holds(placements, 3, 1));
        }
    }

    #[test]
    fn coordination_window_holds_around_present_centre() {
        let mut m = chain(4);
        m.exclude_multi_occupancy().unwrap();
        m.force(Site::new(0, 0, 0), 0).unwrap();
        m.require_coordination(0, 1, 1.0, 0.0, NeighborMode::Ball, 2, Some(2)).unwrap();

        let found = m.solve_multiple(&mut CdclSolver::new(), 10, CoordinateSystem::Integer).unwrap();
        assert_eq!(found.len(), 3);
        for placements in &found {
            assert!(holds(placements, 1, 1) && holds(placements, 3, 1));
        }

        let mut m = chain(4);
        m.exclude_multi_occupancy().unwrap();
        m.force(Site::new(0, 0, 0), 0).unwrap();
        m.require_coordination(0, 1, 1.0, 0.0, NeighborMode::Ball, 1, Some(1)).unwrap();
        let found = m.solve_multiple(&mut CdclSolver::new(), 100, CoordinateSystem::Integer).unwrap();
        assert!(!found.is_empty());
        for placements in &found {
            let ligands = [1, 3].iter().filter(|&&x| holds(placements, x, 1)).count();
            assert_eq!(ligands, 1);
        }
    }

    #[test]
    fn absent_centre_leaves_ligand_free() {
        let mut m = chain(4);
        for x in 0..4 {
            m.forbid(Site::new(x, 0, 0), 0).unwrap();
        }
        m.require_coordination(0, 1, 1.0, 0.0, NeighborMode::Ball, 2, Some(2)).unwrap();
        let found = m.solve_multiple(&mut CdclSolver::new(), 100, CoordinateSystem::Integer).unwrap();
        // every subset of the four sites for Cl
        assert_eq!(found.len(), 16);
    }
}
