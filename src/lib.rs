// ============================================================================
// MODULE DECLARATIONS
// ============================================================================
pub mod chemistry;
pub mod constraints;
pub mod core;
pub mod encoding;
pub mod error;
pub mod io;
pub mod model;
pub mod solver;
pub mod symmetry;

// ============================================================================
// RE-EXPORTS (Public API)
// ============================================================================
pub use crate::chemistry::species::{RadiusTable, Species, SpeciesCatalog, SpeciesId};
pub use crate::core::geometry::{NeighborMode, PeriodicGrid};
pub use crate::core::structure::{
    Atom, CellParameters, Coordinate, CoordinateSystem, Crystal, GridDims, Lattice, Rounding, Site,
};
pub use crate::encoding::formula::{Clause, Formula};
pub use crate::encoding::variables::{Lit, Var, VariableEncoder};
pub use crate::error::CrystalSatError;
pub use crate::io::config::{ConstraintSpec, ProblemConfig};
pub use crate::io::{config, writer};
pub use crate::model::CrystalModel;
pub use crate::solver::decode::{EquivalenceClass, Placement};
pub use crate::solver::cdcl::CdclSolver;
pub use crate::solver::{SatEngine, SatResult};
pub use crate::symmetry::space_group::{SpaceGroup, SymOp, SymmetryService};

use anyhow::{Context, Result};
use std::fmt::Write as _;
use tracing::info;

// ============================================================================
// HIGH-LEVEL INTERFACE
// ============================================================================

/// One decoded solution, ready for printing or export.
#[derive(Debug, Clone)]
pub struct Solution {
    pub placements: Vec<Placement>,
    pub crystal: Crystal,
    /// Number of enumerated models equivalent to this one (1 unless unique mode).
    pub class_size: usize,
}

/// Builds the model, applies constraints in file order, solves it.
///
/// Returns the decoded solutions (empty when unsatisfiable) and a text report.
pub fn run_problem(config: &ProblemConfig, engine: &mut dyn SatEngine) -> Result<(Vec<Solution>, String)> {
    let mut report = String::new();
    let label = config.name.as_deref().unwrap_or("problem");

    // 1. MODEL PHASE
    let mut model = config.build_model().context("Model construction failed")?;
    let g = config.grid;
    let _ = writeln!(report, "--- {} ---", label);
    let _ = writeln!(
        report,
        "• Grid:            {}x{}x{} ({} sites)",
        g.nx,
        g.ny,
        g.nz,
        model.grid().site_count()
    );
    let _ = writeln!(report, "• Species:         {}", model.catalog().len());
    if let Ok(count) = model.orbit_count() {
        let _ = writeln!(report, "• Orbits:          {}", count);
    }

    // 2. CONSTRAINT PHASE
    for (i, constraint) in config.constraints.iter().enumerate() {
        let added = constraint
            .apply(&mut model)
            .with_context(|| format!("Constraint #{} ({}) failed", i + 1, constraint.kind()))?;
        info!("constraint #{} {}: {} clauses", i + 1, constraint.kind(), added);
    }
    let _ = writeln!(
        report,
        "• Formula:         {} clauses, {} variables",
        model.formula().len(),
        model.formula().num_vars()
    );

    // 3. SOLVE PHASE
    let wanted = config.solve.solutions.max(1);
    let output = config.solve.output;
    let solutions: Vec<Solution> = if config.solve.unique {
        let group = match &config.symmetry {
            Some(symmetry) => symmetry.group()?,
            None => SpaceGroup::builtin("P1")?,
        };
        model
            .solve_unique(engine, wanted, &group, output)?
            .into_iter()
            .map(|class| Solution {
                crystal: model.to_crystal(&class.representative),
                class_size: class.members.len(),
                placements: class.representative,
            })
            .collect()
    } else {
        model
            .solve_multiple(engine, wanted, output)?
            .into_iter()
            .map(|placements| Solution {
                crystal: model.to_crystal(&placements),
                class_size: 1,
                placements,
            })
            .collect()
    };

    // 4. REPORT GENERATION
    if solutions.is_empty() {
        let _ = writeln!(report, "• Result:          UNSATISFIABLE");
    } else {
        let _ = writeln!(report, "• Result:          {} solution(s)", solutions.len());
    }
    for (i, solution) in solutions.iter().enumerate() {
        let _ = writeln!(
            report,
            "\nSolution {} ({} atoms, class of {})",
            i + 1,
            solution.placements.len(),
            solution.class_size
        );
        for placement in &solution.placements {
            let _ = writeln!(report, "  {}", placement);
        }
    }

    Ok((solutions, report))
}
