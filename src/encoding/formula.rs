use crate::encoding::variables::{Lit, Var};
use std::collections::BTreeSet;

pub type Clause = Vec<Lit>;

// ============================================================================
// VARIABLE ALLOCATOR
// ============================================================================

/// Hands out auxiliary variables above the site-species block.
///
/// Strictly monotonic: a variable is never handed out twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarAllocator {
    next: Var,
}

impl VarAllocator {
    /// An allocator whose first fresh variable is `last + 1`.
    pub fn starting_after(last: Var) -> Self {
        Self { next: last + 1 }
    }

    pub fn fresh(&mut self) -> Var {
        let var = self.next;
        self.next += 1;
        var
    }

    /// Highest variable in use, auxiliary or not.
    pub fn last(&self) -> Var {
        self.next - 1
    }
}

// ============================================================================
// CLAUSE BATCH
// ============================================================================

/// Clauses and fresh variables staged by one constraint.
///
/// A batch works on a private copy of the allocator; nothing reaches the
/// formula until [`Formula::commit`], so a constraint that bails out with an
/// error leaves no partial clauses or burned variable IDs behind.
#[derive(Debug, Clone)]
pub struct ClauseBatch {
    allocator: VarAllocator,
    clauses: Vec<Clause>,
}

impl ClauseBatch {
    pub fn fresh(&mut self) -> Lit {
        self.allocator.fresh() as Lit
    }

    pub fn add(&mut self, clause: Clause) {
        debug_assert!(!clause.contains(&0));
        self.clauses.push(clause);
    }

    pub fn unit(&mut self, lit: Lit) {
        self.add(vec![lit]);
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

// ============================================================================
// FORMULA
// ============================================================================

/// The accumulated CNF plus the unit bookkeeping bounds rely on.
#[derive(Debug, Clone)]
pub struct Formula {
    clauses: Vec<Clause>,
    allocator: VarAllocator,
    forced: BTreeSet<Var>,
    forbidden: BTreeSet<Var>,
}

impl Formula {
    /// An empty formula whose primary variables are `1..=primary_vars`.
    pub fn new(primary_vars: Var) -> Self {
        Self {
            clauses: Vec::new(),
            allocator: VarAllocator::starting_after(primary_vars),
            forced: BTreeSet::new(),
            forbidden: BTreeSet::new(),
        }
    }

    pub fn batch(&self) -> ClauseBatch {
        ClauseBatch {
            allocator: self.allocator.clone(),
            clauses: Vec::new(),
        }
    }

    /// Appends every staged clause and adopts the batch's allocator.
    /// Returns the number of clauses added.
    pub fn commit(&mut self, batch: ClauseBatch) -> usize {
        debug_assert!(batch.allocator.next >= self.allocator.next);
        let added = batch.clauses.len();
        for clause in batch.clauses {
            if let [lit] = clause[..] {
                if lit > 0 {
                    self.forced.insert(lit as Var);
                } else {
                    self.forbidden.insert(lit.unsigned_abs());
                }
            }
            self.clauses.push(clause);
        }
        self.allocator = batch.allocator;
        added
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Highest variable ID referenced or allocated so far.
    pub fn num_vars(&self) -> Var {
        self.allocator.last()
    }

    /// True when a positive unit clause asserts `var`.
    pub fn is_forced(&self, var: Var) -> bool {
        self.forced.contains(&var)
    }

    /// True when a negative unit clause asserts `!var`.
    pub fn is_forbidden(&self, var: Var) -> bool {
        self.forbidden.contains(&var)
    }

    /// Fixed either way by a unit clause.
    pub fn is_fixed(&self, var: Var) -> bool {
        self.is_forced(var) || self.is_forbidden(var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_starts_above_primary_block() {
        let formula = Formula::new(16);
        let mut batch = formula.batch();
        assert_eq!(batch.fresh(), 17);
        assert_eq!(batch.fresh(), 18);
        assert_eq!(formula.num_vars(), 16);
    }

    #[test]
    fn dropped_batch_leaves_no_trace() {
        let mut formula = Formula::new(4);
        {
            let mut batch = formula.batch();
            batch.fresh();
            batch.add(vec![1, 2]);
        }
        assert!(formula.is_empty());
        let mut batch = formula.batch();
        assert_eq!(batch.fresh(), 5);
        batch.add(vec![-5, 1]);
        batch.unit(3);
        batch.unit(-4);
        assert_eq!(formula.commit(batch), 3);
        assert_eq!(formula.num_vars(), 5);
        assert!(formula.is_forced(3));
        assert!(formula.is_forbidden(4));
        assert!(!formula.is_fixed(1));
    }
}
