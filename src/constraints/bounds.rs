//! Forced-aware cardinality bounds.
//!
//! Variables pinned true by a unit clause are counted up front and
//! subtracted from both bounds; variables pinned either way are dropped from
//! the counted set. Only the remaining free variables are fed to a totalizer.

use crate::chemistry::species::SpeciesId;
use crate::encoding::formula::ClauseBatch;
use crate::encoding::totalizer::Totalizer;
use crate::encoding::variables::{Lit, Var};
use crate::error::{CrystalSatError, Result};
use crate::model::CrystalModel;
use tracing::debug;

impl CrystalModel {
    /// Constrains how many sites hold `species`.
    ///
    /// A minimum already met by forced sites is a no-op success. Fails with
    /// `InfeasibleBound` when the adjusted minimum exceeds the free sites or
    /// the forced sites already exceed the maximum.
    pub fn bound(&mut self, species: SpeciesId, min: Option<usize>, max: Option<usize>) -> Result<usize> {
        self.check_species(species)?;
        let vars = self.encoder.species_vars(species);
        let mut batch = self.formula.batch();
        self.encode_count(&mut batch, species, &vars, min.unwrap_or(0), max)?;
        Ok(self.commit("bound", batch))
    }

    pub fn exactly(&mut self, species: SpeciesId, count: usize) -> Result<usize> {
        self.bound(species, Some(count), Some(count))
    }

    /// Stages `min <= #true(vars) <= max` into `batch`.
    pub(crate) fn encode_count(
        &self,
        batch: &mut ClauseBatch,
        species: SpeciesId,
        vars: &[Var],
        min: usize,
        max: Option<usize>,
    ) -> Result<()> {
        let infeasible = |reason: String| CrystalSatError::InfeasibleBound { species, reason };
        if let Some(max) = max {
            if min > max {
                return Err(infeasible(format!("minimum {} exceeds maximum {}", min, max)));
            }
        }

        let forced = vars.iter().filter(|&&v| self.formula.is_forced(v)).count();
        let free: Vec<Lit> = vars
            .iter()
            .filter(|&&v| !self.formula.is_fixed(v))
            .map(|&v| v as Lit)
            .collect();

        let adj_min = min.saturating_sub(forced);
        let adj_max = match max {
            Some(max) => Some(max.checked_sub(forced).ok_or_else(|| {
                infeasible(format!("{} sites are already forced, maximum is {}", forced, max))
            })?),
            None => None,
        };
        if adj_min > free.len() {
            return Err(infeasible(format!(
                "{} more sites needed but only {} are unfixed",
                adj_min,
                free.len()
            )));
        }
        debug!(
            "species {}: {} forced, {} free, adjusted window [{}, {:?}]",
            species,
            forced,
            free.len(),
            adj_min,
            adj_max
        );

        if adj_max == Some(0) {
            for lit in free {
                batch.unit(-lit);
            }
            return Ok(());
        }
        if adj_min == free.len() {
            for lit in free {
                batch.unit(lit);
            }
            return Ok(());
        }

        let totalizer = Totalizer::for_bounds(&free, adj_min, adj_max, batch);
        // adj_min <= free.len() was checked above
        for lit in totalizer.bound_literals(adj_min, adj_max).unwrap_or_default() {
            batch.unit(lit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::chemistry::species::Species;
    use crate::core::structure::{CellParameters, GridDims, Site};
    use crate::error::CrystalSatError;
    use crate::model::CrystalModel;

    fn line(n: usize) -> CrystalModel {
        CrystalModel::new(
            GridDims::new(n, 1, 1).unwrap(),
            CellParameters::cubic(n as f64),
            vec![Species::element("S"), Species::element("O")],
        )
        .unwrap()
    }

    #[test]
    fn already_met_minimum_is_a_no_op() {
        let mut m = line(4);
        m.force(Site::new(0, 0, 0), 0).unwrap();
        m.force(Site::new(1, 0, 0), 0).unwrap();
        assert_eq!(m.bound(0, Some(1), None).unwrap(), 0);
    }

    #[test]
    fn over_forced_maximum_is_infeasible() {
        let mut m = line(4);
        m.force(Site::new(0, 0, 0), 0).unwrap();
        m.force(Site::new(1, 0, 0), 0).unwrap();
        let before = m.formula().len();
        assert!(matches!(
            m.bound(0, None, Some(1)),
            Err(CrystalSatError::InfeasibleBound { species: 0, .. })
        ));
        assert_eq!(m.formula().len(), before);
    }

    #[test]
    fn minimum_beyond_free_sites_is_infeasible() {
        let mut m = line(3);
        m.forbid(Site::new(2, 0, 0), 0).unwrap();
        assert!(matches!(m.bound(0, Some(3), None), Err(CrystalSatError::InfeasibleBound { .. })));
        assert!(m.bound(0, Some(2), None).is_ok());
    }

    #[test]
    fn zero_maximum_pins_free_sites_false() {
        let mut m = line(3);
        m.force(Site::new(0, 0, 0), 0).unwrap();
        assert_eq!(m.exactly(0, 1).unwrap(), 2);
        assert!(m.formula().is_forbidden(m.encoder().encode(Site::new(2, 0, 0), 0)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut m = line(3);
        assert!(matches!(m.bound(1, Some(2), Some(1)), Err(CrystalSatError::InfeasibleBound { .. })));
    }
}
