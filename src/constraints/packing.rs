use crate::chemistry::species::{RadiusTable, SpeciesId};
use crate::encoding::variables::Lit;
use crate::error::{CrystalSatError, Result};
use crate::model::CrystalModel;

impl CrystalModel {
    /// Hard-sphere non-overlap.
    ///
    /// Species `s` at `p` and `t` at `q` conflict when
    /// `distance(p, q) < r_s + r_t + margin`. Only site pairs closer than
    /// `2 * max_radius + margin` are examined. Both `(s, t)` and `(t, s)`
    /// are emitted for every unordered site pair.
    pub fn pack(&mut self, radii: &RadiusTable, margin: f64) -> Result<usize> {
        if !margin.is_finite() {
            return Err(CrystalSatError::InvalidArgument(format!("margin {} is not finite", margin)));
        }
        for &(id, r) in radii.entries() {
            self.check_species(id)?;
            if !(r.is_finite() && r >= 0.0) {
                return Err(CrystalSatError::InvalidArgument(format!(
                    "radius {} for species {} is not a valid length",
                    r, id
                )));
            }
        }

        let reach = 2.0 * radii.max_radius() + margin;
        let mut batch = self.formula.batch();
        if reach > 0.0 {
            for (p, q, d) in self.grid.pairs_within(reach) {
                for &(s, r_s) in radii.entries() {
                    for &(t, r_t) in radii.entries() {
                        if d < r_s + r_t + margin {
                            batch.add(vec![-self.encoder.lit(p, s), -self.encoder.lit(q, t)]);
                        }
                    }
                }
            }
        }
        Ok(self.commit("pack", batch))
    }

    /// Keeps `a` and `b` at least `min_distance` apart, in both orientations.
    pub fn enforce_min_separation(
        &mut self,
        a: SpeciesId,
        b: SpeciesId,
        min_distance: f64,
    ) -> Result<usize> {
        self.check_species(a)?;
        self.check_species(b)?;
        self.check_length("min_distance", min_distance)?;

        let mut batch = self.formula.batch();
        for (p, q, _) in self.grid.pairs_within(min_distance) {
            let (a_p, b_q): (Lit, Lit) = (self.encoder.lit(p, a), self.encoder.lit(q, b));
            batch.add(vec![-a_p, -b_q]);
            if a != b {
                batch.add(vec![-self.encoder.lit(p, b), -self.encoder.lit(q, a)]);
            }
        }
        Ok(self.commit("enforce_min_separation", batch))
    }
}

#[cfg(test)]
mod tests {
    use crate::chemistry::species::{RadiusTable, Species};
    use crate::core::structure::{CellParameters, GridDims};
    use crate::error::CrystalSatError;
    use crate::model::CrystalModel;

    fn model() -> CrystalModel {
        CrystalModel::new(
            GridDims::new(4, 1, 1).unwrap(),
            CellParameters::cubic(4.0),
            vec![Species::element("Na"), Species::element("Cl")],
        )
        .unwrap()
    }

    #[test]
    fn pack_respects_radius_sums() {
        let mut m = model();
        // Na-Na 1.2 > 1.0 conflicts at one step, Na-Cl 0.9 and Cl-Cl 0.6 do not
        let radii = RadiusTable::from_pairs(vec![(0, 0.6), (1, 0.3)]);
        // four adjacent unordered pairs on a ring of four; the 2.0 pairs are out of reach
        assert_eq!(m.pack(&radii, 0.0).unwrap(), 4);
    }

    #[test]
    fn pack_rejects_unknown_species_atomically() {
        let mut m = model();
        let radii = RadiusTable::from_pairs(vec![(0, 0.6), (5, 0.4)]);
        assert!(matches!(m.pack(&radii, 0.0), Err(CrystalSatError::UnknownSpecies(_))));
        assert!(m.formula().is_empty());
    }

    #[test]
    fn min_separation_counts() {
        let mut m = model();
        // pairs strictly closer than 1.5: the four adjacent pairs
        assert_eq!(m.enforce_min_separation(0, 1, 1.5).unwrap(), 8);
        assert_eq!(m.enforce_min_separation(0, 0, 1.5).unwrap(), 4);
    }
}
