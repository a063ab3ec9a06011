use crate::chemistry::species::{Species, SpeciesId};
use crate::core::structure::{Coordinate, CoordinateSystem, Site};
use crate::encoding::formula::Clause;
use crate::encoding::variables::Lit;
use crate::error::Result;
use crate::model::CrystalModel;
use crate::solver::{SatEngine, SatResult};
use crate::symmetry::equivalence::SiteSymmetry;
use crate::symmetry::space_group::SpaceGroup;
use std::collections::HashMap;
use std::fmt;
use tracing::info;

/// One occupied site of a decoded solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub site: Site,
    pub position: Coordinate,
    pub species_id: SpeciesId,
    pub species: Species,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {}", self.species.to_string(), self.position)
    }
}

/// Solutions that are images of each other under the grid's symmetry.
#[derive(Debug, Clone)]
pub struct EquivalenceClass {
    pub representative: Vec<Placement>,
    /// Positions, in enumeration order, of every model in this class.
    pub members: Vec<usize>,
}

impl CrystalModel {
    /// Maps a model back to placements, sorted by site then species.
    ///
    /// Negative literals, auxiliary variables and reserved species slots are
    /// ignored.
    pub fn decode(&self, model: &[Lit], system: CoordinateSystem) -> Result<Vec<Placement>> {
        let mut placements = Vec::new();
        for &lit in model.iter().filter(|&&l| l > 0) {
            if let Some((site, species_id)) = self.encoder.decode(lit as u32) {
                placements.push(Placement {
                    site,
                    position: self.grid.convert(site, system),
                    species_id,
                    species: self.catalog.inverse(species_id)?,
                });
            }
        }
        placements.sort_by(|a, b| (a.site, a.species_id).cmp(&(b.site, b.species_id)));
        Ok(placements)
    }

    /// One model of the formula as built so far. `None` when unsatisfiable.
    pub fn solve(
        &self,
        engine: &mut dyn SatEngine,
        system: CoordinateSystem,
    ) -> Result<Option<Vec<Placement>>> {
        info!(
            "solving {} clauses over {} variables",
            self.formula.len(),
            self.formula.num_vars()
        );
        match engine.solve(self.formula.num_vars(), self.formula.clauses())? {
            SatResult::Sat(model) => {
                let placements = self.decode(&model, system)?;
                info!("satisfiable, {} sites occupied", placements.len());
                Ok(Some(placements))
            }
            SatResult::Unsat => {
                info!("unsatisfiable");
                Ok(None)
            }
        }
    }

    /// Up to `n` distinct models, blocking each on its site variables.
    ///
    /// Blocking clauses go to a private copy; the model's formula is untouched.
    pub fn solve_multiple(
        &self,
        engine: &mut dyn SatEngine,
        n: usize,
        system: CoordinateSystem,
    ) -> Result<Vec<Vec<Placement>>> {
        self.enumerate(engine, n)?
            .iter()
            .map(|model| self.decode(model, system))
            .collect()
    }

    /// Enumerates up to `n` models and groups them into symmetry classes.
    ///
    /// Two models are equivalent when one maps onto the other under an
    /// operation of `group` that acts on the grid, combined with any grid
    /// translation.
    pub fn solve_unique(
        &self,
        engine: &mut dyn SatEngine,
        n: usize,
        group: &SpaceGroup,
        system: CoordinateSystem,
    ) -> Result<Vec<EquivalenceClass>> {
        let symmetry = SiteSymmetry::new(&self.grid, group);
        let mut classes: Vec<EquivalenceClass> = Vec::new();
        let mut index: HashMap<Vec<(usize, SpeciesId)>, usize> = HashMap::new();

        for (i, model) in self.enumerate(engine, n)?.iter().enumerate() {
            let placements = self.decode(model, system)?;
            let occupancy: Vec<(usize, SpeciesId)> = placements
                .iter()
                .map(|p| (self.grid.site_index(p.site), p.species_id))
                .collect();
            let key = symmetry.canonical_key(&occupancy);
            match index.get(&key) {
                Some(&class) => classes[class].members.push(i),
                None => {
                    index.insert(key, classes.len());
                    classes.push(EquivalenceClass {
                        representative: placements,
                        members: vec![i],
                    });
                }
            }
        }
        info!("{} symmetry-distinct solutions", classes.len());
        Ok(classes)
    }

    fn enumerate(&self, engine: &mut dyn SatEngine, n: usize) -> Result<Vec<Vec<Lit>>> {
        let mut clauses: Vec<Clause> = self.formula.clauses().to_vec();
        let num_vars = self.formula.num_vars();
        let mut models = Vec::new();
        info!("enumerating up to {} models", n);

        while models.len() < n {
            let model = match engine.solve(num_vars, &clauses)? {
                SatResult::Sat(model) => model,
                SatResult::Unsat => break,
            };
            let blocking: Clause = model
                .iter()
                .filter(|&&l| self.encoder.is_site_var(l.unsigned_abs()))
                .map(|&l| -l)
                .collect();
            models.push(model);
            if blocking.is_empty() {
                // nothing left to distinguish further models by
                break;
            }
            clauses.push(blocking);
        }
        info!("found {} models", models.len());
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::structure::{CellParameters, GridDims};
    use crate::solver::cdcl::CdclSolver;

    fn pair() -> CrystalModel {
        CrystalModel::new(
            GridDims::new(2, 1, 1).unwrap(),
            CellParameters::cubic(2.0),
            vec![Species::element("Na"), Species::element("Cl")],
        )
        .unwrap()
    }

    #[test]
    fn decode_skips_auxiliary_and_negative_literals() {
        let m = pair();
        let placements = m.decode(&[-1, 2, 3, -4, 9], CoordinateSystem::Fractional).unwrap();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].species, Species::element("Cl"));
        assert_eq!(placements[1].site, Site::new(1, 0, 0));
        match &placements[1].position {
            Coordinate::Fractional(v) => assert!((v.x - 0.5).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn enumeration_counts_every_filling() {
        let mut m = pair();
        m.exclude_multi_occupancy().unwrap();
        m.fill_unit_cell().unwrap();
        let all = m.solve_multiple(&mut CdclSolver::new(), 10, CoordinateSystem::Integer).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn translations_merge_swapped_fillings() {
        let mut m = pair();
        m.exclude_multi_occupancy().unwrap();
        m.fill_unit_cell().unwrap();
        m.exactly(0, 1).unwrap();
        let group = SpaceGroup::builtin("P1").unwrap();
        let classes = m
            .solve_unique(&mut CdclSolver::new(), 10, &group, CoordinateSystem::Integer)
            .unwrap();
        // NaCl and ClNa are the same chain shifted by one site
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].members.len(), 2);
    }

    #[test]
    fn unsatisfiable_is_not_an_error() {
        let mut m = pair();
        m.force(Site::new(0, 0, 0), 0).unwrap();
        m.forbid(Site::new(0, 0, 0), 0).unwrap();
        assert!(m.solve(&mut CdclSolver::new(), CoordinateSystem::Integer).unwrap().is_none());
    }
}
