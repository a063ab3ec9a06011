use crate::encoding::formula::Clause;
use crate::encoding::variables::{Lit, Var};
use crate::error::{CrystalSatError, Result};
use crate::solver::{SatEngine, SatResult};
use varisat::{ExtendFormula, Solver};

/// Conflict-driven clause learning through `varisat`.
///
/// Each call builds a fresh solver, so the engine carries no state between
/// formulas apart from its counters.
#[derive(Debug, Clone, Default)]
pub struct CdclSolver {
    /// Number of `solve` calls answered so far.
    pub calls: u64,
}

impl CdclSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SatEngine for CdclSolver {
    fn solve(&mut self, num_vars: Var, clauses: &[Clause]) -> Result<SatResult> {
        self.calls += 1;
        let highest = clauses
            .iter()
            .flatten()
            .map(|l| l.unsigned_abs())
            .max()
            .unwrap_or(0)
            .max(num_vars);

        let mut solver = Solver::new();
        // every variable gets a value in the model, even if no clause mentions it
        for v in 1..=highest {
            let var = varisat::Var::from_dimacs(v as isize);
            solver.add_clause(&[var.positive(), var.negative()]);
        }
        let mut buf: Vec<varisat::Lit> = Vec::new();
        for clause in clauses {
            buf.clear();
            buf.extend(
                clause
                    .iter()
                    .filter(|&&l| l != 0)
                    .map(|&l| varisat::Lit::from_dimacs(l as isize)),
            );
            if buf.is_empty() {
                return Ok(SatResult::Unsat);
            }
            solver.add_clause(&buf);
        }

        match solver.solve() {
            Ok(true) => {
                let model = solver
                    .model()
                    .ok_or_else(|| CrystalSatError::Solver("satisfiable but no model returned".to_string()))?;
                let mut lits: Vec<Lit> = model.iter().map(|l| l.to_dimacs() as Lit).collect();
                lits.sort_by_key(|l| l.unsigned_abs());
                Ok(SatResult::Sat(lits))
            }
            Ok(false) => Ok(SatResult::Unsat),
            Err(e) => Err(CrystalSatError::Solver(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn satisfies(model: &[Lit], clauses: &[Clause]) -> bool {
        clauses.iter().all(|c| c.iter().any(|l| model.contains(l)))
    }

    #[test]
    fn finds_a_model_of_a_small_formula() {
        let clauses = vec![vec![1, 2], vec![-1, 3], vec![-3, -2], vec![2, 3]];
        match CdclSolver::new().solve(3, &clauses).unwrap() {
            SatResult::Sat(model) => {
                assert_eq!(model.len(), 3);
                assert!(satisfies(&model, &clauses));
            }
            SatResult::Unsat => panic!("formula is satisfiable"),
        }
    }

    #[test]
    fn pigeonhole_three_into_two_is_unsat() {
        // p(i, h) = 2 * i + h + 1
        let p = |i: i32, h: i32| 2 * i + h + 1;
        let mut clauses: Vec<Clause> = (0..3).map(|i| vec![p(i, 0), p(i, 1)]).collect();
        for h in 0..2 {
            for i in 0..3 {
                for j in (i + 1)..3 {
                    clauses.push(vec![-p(i, h), -p(j, h)]);
                }
            }
        }
        assert_eq!(CdclSolver::new().solve(6, &clauses).unwrap(), SatResult::Unsat);
    }

    #[test]
    fn empty_clause_is_unsat() {
        assert_eq!(CdclSolver::new().solve(2, &[vec![1], vec![]]).unwrap(), SatResult::Unsat);
    }

    #[test]
    fn unmentioned_variables_still_get_values() {
        let mut solver = CdclSolver::new();
        match solver.solve(4, &[vec![2]]).unwrap() {
            SatResult::Sat(model) => {
                let vars: Vec<Var> = model.iter().map(|l| l.unsigned_abs()).collect();
                assert_eq!(vars, vec![1, 2, 3, 4]);
                assert!(model.contains(&2));
            }
            SatResult::Unsat => panic!("formula is satisfiable"),
        }
        assert_eq!(solver.calls, 1);
    }
}
