use crate::chemistry::species::SpeciesId;
use crate::core::structure::Site;
use crate::encoding::variables::Lit;
use crate::error::{CrystalSatError, Result};
use crate::model::CrystalModel;

impl CrystalModel {
    /// At most one species per site: `!s_p or !t_p` for every species pair.
    pub fn exclude_multi_occupancy(&mut self) -> Result<usize> {
        let mut batch = self.formula.batch();
        for site in self.grid.sites() {
            let vars = self.encoder.site_vars(site);
            for (i, &a) in vars.iter().enumerate() {
                for &b in &vars[i + 1..] {
                    batch.add(vec![-(a as Lit), -(b as Lit)]);
                }
            }
        }
        Ok(self.commit("exclude_multi_occupancy", batch))
    }

    /// At least one species per site.
    pub fn fill_unit_cell(&mut self) -> Result<usize> {
        let mut batch = self.formula.batch();
        for site in self.grid.sites() {
            batch.add(self.encoder.site_vars(site).into_iter().map(|v| v as Lit).collect());
        }
        Ok(self.commit("fill_unit_cell", batch))
    }

    pub fn force(&mut self, site: Site, species: SpeciesId) -> Result<usize> {
        let lit = self.lit(site, species)?;
        let mut batch = self.formula.batch();
        batch.unit(lit);
        Ok(self.commit("force", batch))
    }

    pub fn forbid(&mut self, site: Site, species: SpeciesId) -> Result<usize> {
        let lit = self.lit(site, species)?;
        let mut batch = self.formula.batch();
        batch.unit(-lit);
        Ok(self.commit("forbid", batch))
    }

    pub fn forbid_all(&mut self, site: Site, species: &[SpeciesId]) -> Result<usize> {
        let lits = self.site_lits(site, species)?;
        let mut batch = self.formula.batch();
        for lit in lits {
            batch.unit(-lit);
        }
        Ok(self.commit("forbid_all", batch))
    }

    /// One clause: `site` holds at least one of `species`.
    pub fn require_one_of(&mut self, site: Site, species: &[SpeciesId]) -> Result<usize> {
        if species.is_empty() {
            return Err(CrystalSatError::InvalidArgument(
                "require_one_of needs at least one species".into(),
            ));
        }
        let lits = self.site_lits(site, species)?;
        let mut batch = self.formula.batch();
        batch.add(lits);
        Ok(self.commit("require_one_of", batch))
    }

    /// Appends a raw clause over already-allocated variables.
    pub fn add_clause(&mut self, clause: &[Lit]) -> Result<usize> {
        if clause.is_empty() {
            return Err(CrystalSatError::InvalidArgument("empty clause".into()));
        }
        let limit = self.formula.num_vars();
        if let Some(&bad) = clause.iter().find(|&&l| l == 0 || l.unsigned_abs() > limit) {
            return Err(CrystalSatError::InvalidArgument(format!(
                "literal {} is outside the allocated range 1..={}",
                bad, limit
            )));
        }
        let mut batch = self.formula.batch();
        batch.add(clause.to_vec());
        Ok(self.commit("add_clause", batch))
    }

    fn site_lits(&self, site: Site, species: &[SpeciesId]) -> Result<Vec<Lit>> {
        species.iter().map(|&s| self.lit(site, s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::chemistry::species::Species;
    use crate::core::structure::{CellParameters, GridDims, Site};
    use crate::error::CrystalSatError;
    use crate::model::CrystalModel;

    fn model() -> CrystalModel {
        CrystalModel::new(
            GridDims::new(2, 1, 1).unwrap(),
            CellParameters::cubic(3.0),
            vec![Species::element("Na"), Species::element("Cl"), Species::element("K")],
        )
        .unwrap()
    }

    #[test]
    fn clause_counts() {
        let mut m = model();
        assert_eq!(m.exclude_multi_occupancy().unwrap(), 2 * 3);
        assert_eq!(m.fill_unit_cell().unwrap(), 2);
        assert_eq!(m.forbid_all(Site::new(1, 0, 0), &[0, 2]).unwrap(), 2);
        assert!(m.formula().is_forbidden(m.encoder().encode(Site::new(1, 0, 0), 2)));
    }

    #[test]
    fn failed_calls_append_nothing() {
        let mut m = model();
        let before = m.formula().len();
        assert!(matches!(
            m.forbid_all(Site::new(0, 0, 0), &[0, 7]),
            Err(CrystalSatError::UnknownSpecies(_))
        ));
        assert!(m.require_one_of(Site::new(0, 0, 0), &[]).is_err());
        assert!(m.add_clause(&[1, 99]).is_err());
        assert!(m.add_clause(&[0]).is_err());
        assert_eq!(m.formula().len(), before);
        assert_eq!(m.add_clause(&[1, -6]).unwrap(), 1);
    }
}
