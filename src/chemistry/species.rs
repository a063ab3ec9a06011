use crate::chemistry::elements::{self, ELEMENT_SYMBOLS};
use crate::chemistry::shannon::{self, IONIC_RADII};
use crate::error::{CrystalSatError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// Contiguous integer handle for a catalog species.
pub type SpeciesId = usize;

/// First ion ID when the catalog spans the whole periodic table.
pub const FIRST_ION_ID: SpeciesId = ELEMENT_SYMBOLS.len() + 1;

// ============================================================================
// SPECIES
// ============================================================================

/// A chemical entity that can occupy a site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum Species {
    /// A neutral element, by symbol.
    Element(String),
    /// A charged ion with a Shannon coordination label ("VI", "XII", ...).
    Ion {
        symbol: String,
        charge: i32,
        coordination: String,
    },
}

impl Species {
    pub fn element(symbol: &str) -> Self {
        Species::Element(symbol.to_string())
    }

    pub fn ion(symbol: &str, charge: i32, coordination: &str) -> Self {
        Species::Ion {
            symbol: symbol.to_string(),
            charge,
            coordination: coordination.to_string(),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Species::Element(symbol) | Species::Ion { symbol, .. } => symbol,
        }
    }

    pub fn charge(&self) -> Option<i32> {
        match self {
            Species::Element(_) => None,
            Species::Ion { charge, .. } => Some(*charge),
        }
    }

    /// Physical radius in Å.
    ///
    /// Elements use the van der Waals radius, falling back to the covalent
    /// radius. Ions use the Shannon effective ionic radius.
    pub fn radius(&self) -> Result<f64> {
        match self {
            Species::Element(symbol) => elements::vdw_radius(symbol)
                .or_else(|| elements::covalent_radius(symbol))
                .ok_or_else(|| CrystalSatError::NoRadiusData(self.to_string())),
            Species::Ion { symbol, charge, coordination } => {
                shannon::ionic_radius(symbol, *charge, coordination)
                    .ok_or_else(|| CrystalSatError::NoRadiusData(self.to_string()))
            }
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Element(symbol) => write!(f, "{}", symbol),
            Species::Ion { symbol, charge, coordination } => {
                let sign = if *charge < 0 { '-' } else { '+' };
                write!(f, "{}{}{}({})", symbol, charge.abs(), sign, coordination)
            }
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Bijection between species and the contiguous ID range `[lower, k)`.
///
/// With an explicit allow-list the IDs are list positions starting at 0.
/// An empty list selects the full table: IDs 1..=118 are elements by
/// atomic number and every bundled Shannon ion follows from 119.
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    allowed: Option<Vec<Species>>,
}

impl SpeciesCatalog {
    pub fn new(allowed: Vec<Species>) -> Result<Self> {
        if allowed.is_empty() {
            return Ok(Self::full_table());
        }

        let mut seen = HashSet::with_capacity(allowed.len());
        for species in &allowed {
            if elements::atomic_number(species.symbol()).is_none() {
                return Err(CrystalSatError::UnknownSpecies(species.to_string()));
            }
            if !seen.insert(species) {
                return Err(CrystalSatError::InvalidArgument(format!(
                    "species {} is listed twice",
                    species
                )));
            }
        }
        Ok(Self { allowed: Some(allowed) })
    }

    pub fn full_table() -> Self {
        Self { allowed: None }
    }

    pub fn is_explicit(&self) -> bool {
        self.allowed.is_some()
    }

    /// Smallest valid ID.
    pub fn lower(&self) -> SpeciesId {
        if self.is_explicit() { 0 } else { 1 }
    }

    /// One past the largest valid ID; also the stride of the variable encoding.
    pub fn k(&self) -> usize {
        match &self.allowed {
            Some(list) => list.len(),
            None => FIRST_ION_ID + IONIC_RADII.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.k() - self.lower()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_id(&self, id: SpeciesId) -> bool {
        (self.lower()..self.k()).contains(&id)
    }

    pub fn resolve(&self, species: &Species) -> Result<SpeciesId> {
        let unknown = || CrystalSatError::UnknownSpecies(species.to_string());
        match &self.allowed {
            Some(list) => list.iter().position(|s| s == species).ok_or_else(unknown),
            None => match species {
                Species::Element(symbol) => elements::atomic_number(symbol).ok_or_else(unknown),
                Species::Ion { symbol, charge, coordination } => {
                    shannon::ion_index(symbol, *charge, coordination)
                        .map(|i| FIRST_ION_ID + i)
                        .ok_or_else(unknown)
                }
            },
        }
    }

    pub fn inverse(&self, id: SpeciesId) -> Result<Species> {
        let out_of_range = || CrystalSatError::UnknownSpecies(format!("species id {}", id));
        match &self.allowed {
            Some(list) => list.get(id).cloned().ok_or_else(out_of_range),
            None => {
                if let Some(symbol) = elements::symbol_of(id) {
                    Ok(Species::element(symbol))
                } else {
                    id.checked_sub(FIRST_ION_ID)
                        .and_then(|i| IONIC_RADII.get(i))
                        .map(|&(symbol, charge, cn, _)| Species::ion(symbol, charge, cn))
                        .ok_or_else(out_of_range)
                }
            }
        }
    }

    pub fn radius(&self, species: &Species) -> Result<f64> {
        species.radius()
    }

    pub fn ids(&self) -> std::ops::Range<SpeciesId> {
        self.lower()..self.k()
    }

    /// `(id, species)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, Species)> + '_ {
        self.ids().filter_map(move |id| self.inverse(id).ok().map(|s| (id, s)))
    }
}

// ============================================================================
// RADIUS TABLE
// ============================================================================

/// Per-species radii gathered for one packing query.
#[derive(Debug, Clone, Default)]
pub struct RadiusTable {
    radii: Vec<(SpeciesId, f64)>,
}

impl RadiusTable {
    /// Looks up every catalog species; fails on the first one without data.
    pub fn from_catalog(catalog: &SpeciesCatalog) -> Result<Self> {
        let ids: Vec<SpeciesId> = catalog.ids().collect();
        Self::for_species(catalog, &ids)
    }

    pub fn for_species(catalog: &SpeciesCatalog, ids: &[SpeciesId]) -> Result<Self> {
        let mut radii = Vec::with_capacity(ids.len());
        for &id in ids {
            let species = catalog.inverse(id)?;
            radii.push((id, species.radius()?));
        }
        Ok(Self { radii })
    }

    /// Explicit radii, bypassing the chemistry tables.
    pub fn from_pairs(radii: Vec<(SpeciesId, f64)>) -> Self {
        Self { radii }
    }

    pub fn get(&self, id: SpeciesId) -> Option<f64> {
        self.radii.iter().find(|(s, _)| *s == id).map(|&(_, r)| r)
    }

    pub fn max_radius(&self) -> f64 {
        self.radii.iter().map(|&(_, r)| r).fold(0.0, f64::max)
    }

    pub fn entries(&self) -> &[(SpeciesId, f64)] {
        &self.radii
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_catalog_ids_follow_list_order() {
        let catalog = SpeciesCatalog::new(vec![
            Species::element("Li"),
            Species::ion("Ca", 2, "VIII"),
            Species::element("O"),
        ])
        .unwrap();
        assert_eq!(catalog.lower(), 0);
        assert_eq!(catalog.k(), 3);
        assert_eq!(catalog.resolve(&Species::ion("Ca", 2, "VIII")).unwrap(), 1);
        assert_eq!(catalog.inverse(2).unwrap(), Species::element("O"));
        assert!(matches!(
            catalog.resolve(&Species::element("Fe")),
            Err(CrystalSatError::UnknownSpecies(_))
        ));
        assert!(catalog.inverse(3).is_err());
    }

    #[test]
    fn full_table_spans_elements_then_ions() {
        let catalog = SpeciesCatalog::full_table();
        assert_eq!(catalog.lower(), 1);
        assert_eq!(catalog.resolve(&Species::element("Fe")).unwrap(), 26);
        let ti = Species::ion("Ti", 4, "VI");
        let id = catalog.resolve(&ti).unwrap();
        assert!(id >= FIRST_ION_ID && id < catalog.k());
        assert_eq!(catalog.inverse(id).unwrap(), ti);
        assert!(matches!(
            catalog.resolve(&Species::ion("Ti", 4, "XII")),
            Err(CrystalSatError::UnknownSpecies(_))
        ));
        for (id, species) in catalog.iter() {
            assert_eq!(catalog.resolve(&species).unwrap(), id);
        }
    }

    #[test]
    fn duplicate_or_bogus_entries_are_rejected() {
        assert!(SpeciesCatalog::new(vec![Species::element("O"), Species::element("O")]).is_err());
        assert!(SpeciesCatalog::new(vec![Species::element("Qq")]).is_err());
    }

    #[test]
    fn radius_lookup() {
        assert_eq!(Species::element("O").radius().unwrap(), 1.52);
        // no van der Waals entry, covalent fallback
        assert_eq!(Species::element("Mo").radius().unwrap(), 1.54);
        assert_eq!(Species::ion("Ti", 4, "VI").radius().unwrap(), 0.605);
        assert!(matches!(
            Species::ion("Ti", 4, "XII").radius(),
            Err(CrystalSatError::NoRadiusData(_))
        ));
        assert!(matches!(
            Species::element("Og").radius(),
            Err(CrystalSatError::NoRadiusData(_))
        ));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Species::ion("O", -2, "II").to_string(), "O2-(II)");
        assert_eq!(Species::ion("Pb", 2, "XII").to_string(), "Pb2+(XII)");
    }
}
