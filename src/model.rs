use crate::chemistry::species::{Species, SpeciesCatalog, SpeciesId};
use crate::core::geometry::PeriodicGrid;
use crate::core::structure::{Atom, CellParameters, Coordinate, Crystal, GridDims, Rounding, Site};
use crate::encoding::formula::{ClauseBatch, Formula};
use crate::encoding::variables::{Lit, Var, VariableEncoder};
use crate::error::{CrystalSatError, Result};
use crate::solver::decode::Placement;
use crate::symmetry::orbits::OrbitPartition;
use std::collections::BTreeMap;
use tracing::debug;

/// A unit cell occupancy problem under construction.
///
/// The grid and catalog are fixed at construction. Constraint methods
/// (see the `constraints` and `symmetry` modules) only ever append to the
/// formula, and each one either appends its whole clause group or returns an
/// error having appended nothing.
#[derive(Debug, Clone)]
pub struct CrystalModel {
    pub(crate) grid: PeriodicGrid,
    pub(crate) catalog: SpeciesCatalog,
    pub(crate) encoder: VariableEncoder,
    pub(crate) formula: Formula,
    pub(crate) orbits: Option<OrbitPartition>,
    /// Indicator variable per `(orbit, species)`, allocated on first use.
    pub(crate) orbit_vars: BTreeMap<(usize, SpeciesId), Var>,
}

impl CrystalModel {
    /// An empty species list selects the full element and ion table.
    pub fn new(dims: GridDims, cell: CellParameters, species: Vec<Species>) -> Result<Self> {
        let grid = PeriodicGrid::new(dims, cell)?;
        let catalog = SpeciesCatalog::new(species)?;
        let encoder = VariableEncoder::new(dims, &catalog)?;
        let formula = Formula::new(encoder.max_site_var());
        debug!(
            "model {}x{}x{} with {} species ({} site variables)",
            dims.nx,
            dims.ny,
            dims.nz,
            catalog.len(),
            encoder.max_site_var()
        );
        Ok(Self {
            grid,
            catalog,
            encoder,
            formula,
            orbits: None,
            orbit_vars: BTreeMap::new(),
        })
    }

    pub fn grid(&self) -> &PeriodicGrid { &self.grid }
    pub fn catalog(&self) -> &SpeciesCatalog { &self.catalog }
    pub fn encoder(&self) -> &VariableEncoder { &self.encoder }
    pub fn formula(&self) -> &Formula { &self.formula }

    pub fn species_id(&self, species: &Species) -> Result<SpeciesId> {
        self.catalog.resolve(species)
    }

    /// Resolves a coordinate to a grid node.
    pub fn site(&self, coord: &Coordinate, rounding: Rounding) -> Result<Site> {
        self.grid.to_site(coord, rounding)
    }

    /// Literal for "`site` holds `species`", validating both.
    pub fn lit(&self, site: Site, species: SpeciesId) -> Result<Lit> {
        self.check_site(site)?;
        self.check_species(species)?;
        Ok(self.encoder.lit(site, species))
    }

    pub(crate) fn check_site(&self, site: Site) -> Result<()> {
        if self.grid.contains(site) {
            Ok(())
        } else {
            Err(CrystalSatError::OutOfBounds {
                x: site.x as f64,
                y: site.y as f64,
                z: site.z as f64,
                system: "integer",
            })
        }
    }

    pub(crate) fn check_species(&self, species: SpeciesId) -> Result<()> {
        if self.catalog.contains_id(species) {
            Ok(())
        } else {
            Err(CrystalSatError::UnknownSpecies(format!("species id {}", species)))
        }
    }

    pub(crate) fn check_length(&self, name: &str, value: f64) -> Result<()> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(CrystalSatError::InvalidArgument(format!(
                "{} must be a non-negative distance, got {}",
                name, value
            )))
        }
    }

    /// Appends a finished batch and logs its size.
    pub(crate) fn commit(&mut self, what: &str, batch: ClauseBatch) -> usize {
        let added = self.formula.commit(batch);
        debug!(
            "{}: +{} clauses ({} total, {} variables)",
            what,
            added,
            self.formula.len(),
            self.formula.num_vars()
        );
        added
    }

    /// Builds an exportable structure from decoded placements.
    pub fn to_crystal(&self, placements: &[Placement]) -> Crystal {
        let atoms = placements
            .iter()
            .map(|p| Atom {
                element: p.species.symbol().to_string(),
                fractional_coords: self.grid.fractional(p.site),
                oxidation_state: p.species.charge(),
            })
            .collect();
        Crystal {
            lattice: self.grid.lattice().clone(),
            atoms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_species_list_uses_full_table() {
        let model = CrystalModel::new(GridDims::new(2, 2, 2).unwrap(), CellParameters::cubic(4.0), vec![]).unwrap();
        assert!(!model.catalog().is_explicit());
        assert_eq!(model.species_id(&Species::element("H")).unwrap(), 1);
        assert!(model.formula().is_empty());
        assert_eq!(model.formula().num_vars(), model.encoder().max_site_var());
    }

    #[test]
    fn literal_validation() {
        let model = CrystalModel::new(
            GridDims::new(2, 2, 2).unwrap(),
            CellParameters::cubic(4.0),
            vec![Species::element("Na"), Species::element("Cl")],
        )
        .unwrap();
        assert_eq!(model.lit(Site::new(0, 0, 0), 1).unwrap(), 2);
        assert!(matches!(
            model.lit(Site::new(2, 0, 0), 0),
            Err(CrystalSatError::OutOfBounds { .. })
        ));
        assert!(matches!(
            model.lit(Site::new(0, 0, 0), 2),
            Err(CrystalSatError::UnknownSpecies(_))
        ));
    }
}
