//! TOML problem files.
//!
//! ```toml
//! species = ["Ca", "Ti", { symbol = "O", charge = -2, coordination = "II" }]
//!
//! [grid]
//! nx = 2
//! ny = 2
//! nz = 2
//!
//! [cell]
//! a = 3.9
//! b = 3.9
//! c = 3.9
//! alpha = 90.0
//! beta = 90.0
//! gamma = 90.0
//!
//! [symmetry]
//! space_group = "Pm-3m"
//!
//! [[constraint]]
//! kind = "exclude_multi_occupancy"
//!
//! [[constraint]]
//! kind = "force"
//! species = "Ca"
//! at = [0, 0, 0]
//!
//! [solve]
//! solutions = 4
//! unique = true
//! output = "fractional"
//! ```

use crate::chemistry::species::{RadiusTable, Species, SpeciesId};
use crate::core::geometry::NeighborMode;
use crate::core::structure::{CellParameters, Coordinate, CoordinateSystem, GridDims, Rounding, Site};
use crate::encoding::variables::Lit;
use crate::error::Result as CoreResult;
use crate::model::CrystalModel;
use crate::symmetry::space_group::SpaceGroup;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_tolerance() -> f64 { 1e-3 }
fn default_solutions() -> usize { 1 }
fn default_output() -> CoordinateSystem { CoordinateSystem::Fractional }
fn default_site_system() -> CoordinateSystem { CoordinateSystem::Integer }

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemConfig {
    /// Free-form label carried into reports and CIF block names.
    #[serde(default)]
    pub name: Option<String>,
    pub grid: GridDims,
    pub cell: CellParameters,
    /// Empty or absent selects the full element and ion table.
    #[serde(default)]
    pub species: Vec<Species>,
    #[serde(default)]
    pub symmetry: Option<SymmetryConfig>,
    #[serde(default, rename = "constraint")]
    pub constraints: Vec<ConstraintSpec>,
    #[serde(default)]
    pub solve: SolveConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymmetryConfig {
    /// Bundled symbol or number; ignored when `operations` is given.
    #[serde(default)]
    pub space_group: Option<String>,
    /// Jones-faithful operators, e.g. `"-y,x-y,z+1/3"`.
    #[serde(default)]
    pub operations: Option<Vec<String>>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl SymmetryConfig {
    pub fn group(&self) -> Result<SpaceGroup> {
        match (&self.operations, &self.space_group) {
            (Some(ops), name) => {
                let ops: Vec<&str> = ops.iter().map(String::as_str).collect();
                Ok(SpaceGroup::from_operations(name.as_deref().unwrap_or("custom"), &ops)?)
            }
            (None, Some(name)) => Ok(SpaceGroup::builtin(name)?),
            (None, None) => anyhow::bail!("[symmetry] needs either space_group or operations"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolveConfig {
    #[serde(default = "default_solutions")]
    pub solutions: usize,
    /// Group solutions by symmetry and keep one per class.
    #[serde(default)]
    pub unique: bool,
    #[serde(default = "default_output")]
    pub output: CoordinateSystem,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            solutions: default_solutions(),
            unique: false,
            output: default_output(),
        }
    }
}

/// A site given by position, coordinate system and rounding.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteSpec {
    pub at: [f64; 3],
    #[serde(default = "default_site_system")]
    pub system: CoordinateSystem,
    #[serde(default)]
    pub rounding: Rounding,
}

impl SiteSpec {
    pub fn resolve(&self, model: &CrystalModel) -> CoreResult<Site> {
        let coord = Coordinate::from_values(self.at, self.system)?;
        model.site(&coord, self.rounding)
    }
}

/// One `[[constraint]]` entry, applied in file order.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintSpec {
    ExcludeMultiOccupancy,
    FillUnitCell,
    Force {
        species: Species,
        #[serde(flatten)]
        site: SiteSpec,
    },
    Forbid {
        species: Species,
        #[serde(flatten)]
        site: SiteSpec,
    },
    ForbidAll {
        species: Vec<Species>,
        #[serde(flatten)]
        site: SiteSpec,
    },
    RequireOneOf {
        species: Vec<Species>,
        #[serde(flatten)]
        site: SiteSpec,
    },
    Isolate {
        target: Species,
        forbidden: Vec<Species>,
        cutoff: f64,
        #[serde(default)]
        tolerance: f64,
        #[serde(default)]
        mode: NeighborMode,
    },
    IsolateFromItself {
        species: Species,
        cutoff: f64,
        #[serde(default)]
        tolerance: f64,
        #[serde(default)]
        mode: NeighborMode,
    },
    IsolateFromAll {
        species: Species,
        cutoff: f64,
        #[serde(default)]
        tolerance: f64,
        #[serde(default)]
        mode: NeighborMode,
    },
    Surround {
        center: Species,
        ligand: Species,
        distance: f64,
        #[serde(default)]
        tolerance: f64,
    },
    RequireCoordination {
        center: Species,
        ligand: Species,
        cutoff: f64,
        #[serde(default)]
        tolerance: f64,
        #[serde(default)]
        mode: NeighborMode,
        #[serde(default)]
        min: usize,
        #[serde(default)]
        max: Option<usize>,
    },
    /// Radii from the chemistry tables for `species` (default: whole catalog).
    Pack {
        #[serde(default)]
        species: Option<Vec<Species>>,
        #[serde(default)]
        margin: f64,
    },
    MinSeparation {
        a: Species,
        b: Species,
        distance: f64,
    },
    Bound {
        species: Species,
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    Exactly {
        species: Species,
        count: usize,
    },
    ChooseOrbits {
        species: Species,
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        orbits: Option<Vec<usize>>,
    },
    ForceOrbit {
        species: Species,
        orbit: usize,
    },
    Clause {
        literals: Vec<Lit>,
    },
}

impl ConstraintSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ConstraintSpec::ExcludeMultiOccupancy => "exclude_multi_occupancy",
            ConstraintSpec::FillUnitCell => "fill_unit_cell",
            ConstraintSpec::Force { .. } => "force",
            ConstraintSpec::Forbid { .. } => "forbid",
            ConstraintSpec::ForbidAll { .. } => "forbid_all",
            ConstraintSpec::RequireOneOf { .. } => "require_one_of",
            ConstraintSpec::Isolate { .. } => "isolate",
            ConstraintSpec::IsolateFromItself { .. } => "isolate_from_itself",
            ConstraintSpec::IsolateFromAll { .. } => "isolate_from_all",
            ConstraintSpec::Surround { .. } => "surround",
            ConstraintSpec::RequireCoordination { .. } => "require_coordination",
            ConstraintSpec::Pack { .. } => "pack",
            ConstraintSpec::MinSeparation { .. } => "min_separation",
            ConstraintSpec::Bound { .. } => "bound",
            ConstraintSpec::Exactly { .. } => "exactly",
            ConstraintSpec::ChooseOrbits { .. } => "choose_orbits",
            ConstraintSpec::ForceOrbit { .. } => "force_orbit",
            ConstraintSpec::Clause { .. } => "clause",
        }
    }

    /// Resolves species and sites through the model and applies the rule.
    /// Returns the number of clauses appended.
    pub fn apply(&self, model: &mut CrystalModel) -> CoreResult<usize> {
        let id = |model: &CrystalModel, s: &Species| model.species_id(s);
        let ids = |model: &CrystalModel, list: &[Species]| -> CoreResult<Vec<SpeciesId>> {
            list.iter().map(|s| model.species_id(s)).collect()
        };

        match self {
            ConstraintSpec::ExcludeMultiOccupancy => model.exclude_multi_occupancy(),
            ConstraintSpec::FillUnitCell => model.fill_unit_cell(),
            ConstraintSpec::Force { species, site } => {
                let (s, p) = (id(model, species)?, site.resolve(model)?);
                model.force(p, s)
            }
            ConstraintSpec::Forbid { species, site } => {
                let (s, p) = (id(model, species)?, site.resolve(model)?);
                model.forbid(p, s)
            }
            ConstraintSpec::ForbidAll { species, site } => {
                let (s, p) = (ids(model, species)?, site.resolve(model)?);
                model.forbid_all(p, &s)
            }
            ConstraintSpec::RequireOneOf { species, site } => {
                let (s, p) = (ids(model, species)?, site.resolve(model)?);
                model.require_one_of(p, &s)
            }
            ConstraintSpec::Isolate { target, forbidden, cutoff, tolerance, mode } => {
                let (t, f) = (id(model, target)?, ids(model, forbidden)?);
                model.isolate(t, &f, *cutoff, *tolerance, *mode)
            }
            ConstraintSpec::IsolateFromItself { species, cutoff, tolerance, mode } => {
                let s = id(model, species)?;
                model.isolate_from_itself(s, *cutoff, *tolerance, *mode)
            }
            ConstraintSpec::IsolateFromAll { species, cutoff, tolerance, mode } => {
                let s = id(model, species)?;
                model.isolate_from_all(s, *cutoff, *tolerance, *mode)
            }
            ConstraintSpec::Surround { center, ligand, distance, tolerance } => {
                let (c, l) = (id(model, center)?, id(model, ligand)?);
                model.surround(c, l, *distance, *tolerance)
            }
            ConstraintSpec::RequireCoordination { center, ligand, cutoff, tolerance, mode, min, max } => {
                let (c, l) = (id(model, center)?, id(model, ligand)?);
                model.require_coordination(c, l, *cutoff, *tolerance, *mode, *min, *max)
            }
            ConstraintSpec::Pack { species, margin } => {
                let radii = match species {
                    Some(list) => RadiusTable::for_species(model.catalog(), &ids(model, list)?)?,
                    None => RadiusTable::from_catalog(model.catalog())?,
                };
                model.pack(&radii, *margin)
            }
            ConstraintSpec::MinSeparation { a, b, distance } => {
                let (a, b) = (id(model, a)?, id(model, b)?);
                model.enforce_min_separation(a, b, *distance)
            }
            ConstraintSpec::Bound { species, min, max } => {
                let s = id(model, species)?;
                model.bound(s, *min, *max)
            }
            ConstraintSpec::Exactly { species, count } => {
                let s = id(model, species)?;
                model.exactly(s, *count)
            }
            ConstraintSpec::ChooseOrbits { species, min, max, orbits } => {
                let s = id(model, species)?;
                model.choose_orbits(s, *min, *max, orbits.as_deref())
            }
            ConstraintSpec::ForceOrbit { species, orbit } => {
                let s = id(model, species)?;
                model.force_orbit(s, *orbit)
            }
            ConstraintSpec::Clause { literals } => model.add_clause(literals),
        }
    }
}

impl ProblemConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid problem file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read problem file: {:?}", path))?;
        Self::from_toml(&text).with_context(|| format!("While parsing {:?}", path))
    }

    /// Builds the model and partitions it when `[symmetry]` is present.
    /// Constraints are not applied.
    pub fn build_model(&self) -> Result<CrystalModel> {
        let dims = GridDims::new(self.grid.nx, self.grid.ny, self.grid.nz)?;
        let mut model = CrystalModel::new(dims, self.cell, self.species.clone())?;
        if let Some(symmetry) = &self.symmetry {
            let group = symmetry.group()?;
            model.partition(&group, symmetry.tolerance)?;
        }
        Ok(model)
    }
}
