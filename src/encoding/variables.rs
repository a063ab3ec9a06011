use crate::chemistry::species::{SpeciesCatalog, SpeciesId};
use crate::core::structure::{GridDims, Site};
use crate::error::{CrystalSatError, Result};

/// Positive CNF variable.
pub type Var = u32;
/// Signed DIMACS literal.
pub type Lit = i32;

/// Bijection `(site, species) <-> variable`.
///
/// `var = x*(ny*nz*k) + y*(nz*k) + z*k + species + 1`: x varies slowest and
/// species fastest, so every site owns a contiguous block of `k` IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableEncoder {
    dims: GridDims,
    lower: SpeciesId,
    k: usize,
}

impl VariableEncoder {
    pub fn new(dims: GridDims, catalog: &SpeciesCatalog) -> Result<Self> {
        let k = catalog.k();
        let total = dims.site_count() as u128 * k as u128;
        if total >= i32::MAX as u128 / 2 {
            return Err(CrystalSatError::InvalidGrid(format!(
                "{} sites x {} species exceeds the literal range",
                dims.site_count(),
                k
            )));
        }
        Ok(Self { dims, lower: catalog.lower(), k })
    }

    pub fn k(&self) -> usize { self.k }

    /// Largest site-species variable; auxiliary variables start above it.
    pub fn max_site_var(&self) -> Var {
        (self.dims.site_count() * self.k) as Var
    }

    pub fn encode(&self, site: Site, species: SpeciesId) -> Var {
        debug_assert!(self.in_domain(site, species));
        let GridDims { ny, nz, .. } = self.dims;
        (site.x * ny * nz * self.k + site.y * nz * self.k + site.z * self.k + species + 1) as Var
    }

    pub fn lit(&self, site: Site, species: SpeciesId) -> Lit {
        self.encode(site, species) as Lit
    }

    pub fn try_encode(&self, site: Site, species: SpeciesId) -> Result<Var> {
        if !self.in_domain(site, species) {
            return Err(CrystalSatError::InvalidArgument(format!(
                "({}, species {}) is outside the {}x{}x{} grid / [{}, {}) catalog",
                site, species, self.dims.nx, self.dims.ny, self.dims.nz, self.lower, self.k
            )));
        }
        Ok(self.encode(site, species))
    }

    /// Inverse of [`encode`](Self::encode). `None` for auxiliary variables and
    /// for the reserved species slots below `lower`.
    pub fn decode(&self, var: Var) -> Option<(Site, SpeciesId)> {
        if var == 0 || var > self.max_site_var() {
            return None;
        }
        let v = var as usize - 1;
        let species = v % self.k;
        if species < self.lower {
            return None;
        }
        let rest = v / self.k;
        let z = rest % self.dims.nz;
        let rest = rest / self.dims.nz;
        let y = rest % self.dims.ny;
        let x = rest / self.dims.ny;
        Some((Site::new(x, y, z), species))
    }

    pub fn is_site_var(&self, var: Var) -> bool {
        self.decode(var).is_some()
    }

    fn in_domain(&self, site: Site, species: SpeciesId) -> bool {
        site.x < self.dims.nx
            && site.y < self.dims.ny
            && site.z < self.dims.nz
            && species >= self.lower
            && species < self.k
    }

    /// Every variable of one species, in site order.
    pub fn species_vars(&self, species: SpeciesId) -> Vec<Var> {
        (0..self.dims.site_count())
            .map(|i| (i * self.k + species + 1) as Var)
            .collect()
    }

    /// Every variable of one site, in species order.
    pub fn site_vars(&self, site: Site) -> Vec<Var> {
        (self.lower..self.k).map(|s| self.encode(site, s)).collect()
    }
}
