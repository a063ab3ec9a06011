use crate::chemistry::species::SpeciesId;
use crate::core::geometry::PeriodicGrid;
use crate::core::structure::Site;
use crate::encoding::formula::ClauseBatch;
use crate::encoding::variables::{Lit, Var};
use crate::error::{CrystalSatError, Result};
use crate::model::CrystalModel;
use crate::symmetry::space_group::SymmetryService;
use nalgebra::Vector3;
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// Sites grouped into symmetry-equivalence classes.
///
/// Orbit IDs are dense and ordered by the smallest flattened site index
/// they contain. Every site belongs to exactly one orbit.
#[derive(Debug, Clone)]
pub struct OrbitPartition {
    site_orbit: Vec<usize>,
    members: Vec<Vec<Site>>,
}

impl OrbitPartition {
    /// Unions every site with each on-grid image of it. Images that miss a
    /// node by more than `tolerance` are skipped.
    pub fn build(grid: &PeriodicGrid, service: &dyn SymmetryService, tolerance: f64) -> Self {
        let n = grid.site_count();
        let dims = grid.dims().as_array();
        let mut sets = UnionFind::<usize>::new(n);
        let mut skipped = 0usize;

        for (i, site) in grid.sites().enumerate() {
            for image in service.orbit(&grid.fractional(site), tolerance) {
                match node_of(&image, dims, tolerance) {
                    Some(node) => {
                        sets.union(i, grid.site_index(node));
                    }
                    None => skipped += 1,
                }
            }
        }
        if skipped > 0 {
            warn!("{} symmetry images fell between grid nodes and were ignored", skipped);
        }

        let mut ids: HashMap<usize, usize> = HashMap::new();
        let mut site_orbit = Vec::with_capacity(n);
        let mut members: Vec<Vec<Site>> = Vec::new();
        for (i, site) in grid.sites().enumerate() {
            let root = sets.find(i);
            let orbit = *ids.entry(root).or_insert_with(|| {
                members.push(Vec::new());
                members.len() - 1
            });
            members[orbit].push(site);
            site_orbit.push(orbit);
        }
        Self { site_orbit, members }
    }

    pub fn len(&self) -> usize { self.members.len() }
    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    pub fn orbit_of_index(&self, index: usize) -> Option<usize> {
        self.site_orbit.get(index).copied()
    }

    pub fn members(&self, orbit: usize) -> Option<&[Site]> {
        self.members.get(orbit).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Site])> {
        self.members.iter().map(Vec::as_slice).enumerate()
    }
}

fn node_of(frac: &Vector3<f64>, dims: [usize; 3], tolerance: f64) -> Option<Site> {
    let mut idx = [0usize; 3];
    for axis in 0..3 {
        let n = dims[axis] as f64;
        let node = (frac[axis] * n).round();
        if (frac[axis] - node / n).abs() > tolerance.max(1e-8) {
            return None;
        }
        idx[axis] = (node as i64).rem_euclid(dims[axis] as i64) as usize;
    }
    Some(Site::from(idx))
}

// ============================================================================
// MODEL INTEGRATION
// ============================================================================

impl CrystalModel {
    /// Computes the orbit partition once. Returns the number of orbits.
    pub fn partition(&mut self, service: &dyn SymmetryService, tolerance: f64) -> Result<usize> {
        self.check_length("tolerance", tolerance)?;
        if self.orbits.is_some() {
            return Err(CrystalSatError::InvalidArgument(
                "orbit partition is already computed".into(),
            ));
        }
        let partition = OrbitPartition::build(&self.grid, service, tolerance);
        info!("{} sites fall into {} orbits", self.grid.site_count(), partition.len());
        let count = partition.len();
        self.orbits = Some(partition);
        Ok(count)
    }

    pub fn orbits(&self) -> Result<&OrbitPartition> {
        self.orbits.as_ref().ok_or(CrystalSatError::UndefinedSymmetry)
    }

    pub fn orbit_count(&self) -> Result<usize> {
        Ok(self.orbits()?.len())
    }

    pub fn orbit_of(&self, site: Site) -> Result<usize> {
        self.check_site(site)?;
        let orbits = self.orbits()?;
        orbits
            .orbit_of_index(self.grid.site_index(site))
            .ok_or(CrystalSatError::UnknownOrbit { orbit: usize::MAX, count: orbits.len() })
    }

    pub fn orbit_sites(&self, orbit: usize) -> Result<&[Site]> {
        let orbits = self.orbits()?;
        orbits
            .members(orbit)
            .ok_or(CrystalSatError::UnknownOrbit { orbit, count: orbits.len() })
    }

    /// Indicator variable of `(orbit, species)`, if one was allocated.
    pub fn orbit_indicator(&self, orbit: usize, species: SpeciesId) -> Option<Var> {
        self.orbit_vars.get(&(orbit, species)).copied()
    }

    /// Picks between `min` and `max` orbits to fill with `species`.
    ///
    /// Each chosen orbit's indicator implies every member site holds the
    /// species; an unchosen orbit places no restriction on its sites.
    /// Only indicators count, so a fully occupied but unchosen orbit does
    /// not count towards the bounds.
    pub fn choose_orbits(
        &mut self,
        species: SpeciesId,
        min: Option<usize>,
        max: Option<usize>,
        eligible: Option<&[usize]>,
    ) -> Result<usize> {
        self.check_species(species)?;
        let count = self.orbit_count()?;
        let eligible: BTreeSet<usize> = match eligible {
            Some(list) => list.iter().copied().collect(),
            None => (0..count).collect(),
        };
        if let Some(&orbit) = eligible.iter().find(|&&o| o >= count) {
            return Err(CrystalSatError::UnknownOrbit { orbit, count });
        }

        let mut batch = self.formula.batch();
        let mut allocated = Vec::new();
        let indicators: Vec<Var> = eligible
            .iter()
            .map(|&orbit| self.stage_indicator(&mut batch, orbit, species, &mut allocated))
            .collect::<Result<_>>()?;
        self.encode_count(&mut batch, species, &indicators, min.unwrap_or(0), max)?;

        let added = self.commit("choose_orbits", batch);
        self.orbit_vars.extend(allocated);
        Ok(added)
    }

    /// Sets the `(orbit, species)` indicator and every member site true.
    pub fn force_orbit(&mut self, species: SpeciesId, orbit: usize) -> Result<usize> {
        self.check_species(species)?;
        let count = self.orbit_count()?;
        if orbit >= count {
            return Err(CrystalSatError::UnknownOrbit { orbit, count });
        }

        let mut batch = self.formula.batch();
        let mut allocated = Vec::new();
        let indicator = self.stage_indicator(&mut batch, orbit, species, &mut allocated)?;
        batch.unit(indicator as Lit);
        for &site in self.orbit_sites(orbit)? {
            batch.unit(self.encoder.lit(site, species));
        }

        let added = self.commit("force_orbit", batch);
        self.orbit_vars.extend(allocated);
        Ok(added)
    }

    /// Reuses an existing indicator or stages a fresh one with its
    /// `indicator => site` links.
    fn stage_indicator(
        &self,
        batch: &mut ClauseBatch,
        orbit: usize,
        species: SpeciesId,
        allocated: &mut Vec<((usize, SpeciesId), Var)>,
    ) -> Result<Var> {
        if let Some(var) = self.orbit_indicator(orbit, species) {
            return Ok(var);
        }
        let indicator = batch.fresh();
        for &site in self.orbit_sites(orbit)? {
            batch.add(vec![-indicator, self.encoder.lit(site, species)]);
        }
        let var = indicator as Var;
        allocated.push(((orbit, species), var));
        Ok(var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::species::Species;
    use crate::core::structure::{CellParameters, GridDims};
    use crate::symmetry::space_group::SpaceGroup;

    fn cube(n: usize) -> CrystalModel {
        CrystalModel::new(
            GridDims::new(n, n, n).unwrap(),
            CellParameters::cubic(4.0),
            vec![Species::element("Ca"), Species::element("O")],
        )
        .unwrap()
    }

    #[test]
    fn orbit_queries_require_partition() {
        let mut m = cube(2);
        assert!(matches!(m.orbit_count(), Err(CrystalSatError::UndefinedSymmetry)));
        assert!(matches!(m.force_orbit(0, 0), Err(CrystalSatError::UndefinedSymmetry)));
        assert!(matches!(m.choose_orbits(0, Some(1), None, None), Err(CrystalSatError::UndefinedSymmetry)));
    }

    #[test]
    fn cubic_two_grid_splits_by_half_coordinates() {
        let mut m = cube(2);
        let group = SpaceGroup::builtin("Pm-3m").unwrap();
        // corner, edge centres, face centres, body centre
        assert_eq!(m.partition(&group, 1e-6).unwrap(), 4);
        let sizes: Vec<usize> = m.orbits().unwrap().iter().map(|(_, s)| s.len()).collect();
        assert_eq!(sizes, vec![1, 3, 3, 1]);
        assert_eq!(m.orbit_of(Site::new(1, 1, 1)).unwrap(), 3);
        assert!(m.partition(&group, 1e-6).is_err());
    }

    #[test]
    fn force_orbit_pins_every_member() {
        let mut m = cube(2);
        m.partition(&SpaceGroup::builtin("Pm-3m").unwrap(), 1e-6).unwrap();
        let orbit = m.orbit_of(Site::new(0, 1, 1)).unwrap();
        // indicator link per member, indicator unit, member units
        assert_eq!(m.force_orbit(1, orbit).unwrap(), 3 + 1 + 3);
        for &site in m.orbit_sites(orbit).unwrap() {
            assert!(m.formula().is_forced(m.encoder().encode(site, 1)));
        }
        assert!(matches!(m.force_orbit(1, 9), Err(CrystalSatError::UnknownOrbit { orbit: 9, count: 4 })));
    }

    #[test]
    fn choose_orbits_reuses_indicators() {
        let mut m = cube(2);
        m.partition(&SpaceGroup::builtin("Pm-3m").unwrap(), 1e-6).unwrap();
        m.force_orbit(0, 0).unwrap();
        let indicator = m.orbit_indicator(0, 0).unwrap();
        m.choose_orbits(0, Some(1), Some(1), Some(&[0, 3])).unwrap();
        assert_eq!(m.orbit_indicator(0, 0), Some(indicator));
        let body = m.orbit_indicator(3, 0).unwrap();
        // the forced corner already uses the single slot
        assert!(m.formula().is_forbidden(body));
        assert!(matches!(
            m.choose_orbits(0, None, None, Some(&[7])),
            Err(CrystalSatError::UnknownOrbit { orbit: 7, .. })
        ));
    }
}
