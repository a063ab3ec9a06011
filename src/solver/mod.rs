//! SAT engine boundary and model decoding.
//!
//! The model only ever talks to a [`SatEngine`]; [`cdcl::CdclSolver`] wraps
//! `varisat`, and anything speaking the same contract (an FFI wrapper, a
//! process running an external DIMACS solver) can be swapped in.

pub mod cdcl;
pub mod decode;

use crate::encoding::formula::Clause;
use crate::encoding::variables::{Lit, Var};
use crate::error::Result;

/// Outcome of one engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    /// One signed literal per variable `1..=num_vars`.
    Sat(Vec<Lit>),
    Unsat,
}

impl SatResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatResult::Sat(_))
    }
}

/// A synchronous, complete SAT procedure.
pub trait SatEngine {
    /// `Err` only when the engine itself fails; an unsatisfiable formula is
    /// `Ok(SatResult::Unsat)`.
    fn solve(&mut self, num_vars: Var, clauses: &[Clause]) -> Result<SatResult>;
}
