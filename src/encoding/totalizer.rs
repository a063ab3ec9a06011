//! Totalizer cardinality encoding.
//!
//! Inputs are split in half recursively; every internal node gets a unary
//! counter `out[t-1] <=> (at least t inputs below are true)`. Counters are
//! truncated to the largest threshold a query needs, which keeps every node
//! at `O(cap^2)` clauses.

use crate::encoding::formula::ClauseBatch;
use crate::encoding::variables::Lit;

/// Unary counter over a set of input literals.
#[derive(Debug, Clone)]
pub struct Totalizer {
    inputs: usize,
    outputs: Vec<Lit>,
}

impl Totalizer {
    /// Builds a counter exact up to `cap` (clamped to the input count).
    pub fn build(inputs: &[Lit], cap: usize, batch: &mut ClauseBatch) -> Self {
        let cap = cap.min(inputs.len());
        let outputs = if cap == 0 {
            Vec::new()
        } else {
            build_node(inputs, cap, batch)
        };
        Self { inputs: inputs.len(), outputs }
    }

    /// Counter sized for the given bounds.
    pub fn for_bounds(inputs: &[Lit], min: usize, max: Option<usize>, batch: &mut ClauseBatch) -> Self {
        let upper = match max {
            Some(m) if m < inputs.len() => m + 1,
            _ => 0,
        };
        let cap = min.max(upper);
        Self::build(inputs, cap, batch)
    }

    pub fn outputs(&self) -> &[Lit] {
        &self.outputs
    }

    /// `Some(None)` for the trivial `k == 0`, `None` when `k` is out of reach.
    fn at_least(&self, k: usize) -> Option<Option<Lit>> {
        match k {
            0 => Some(None),
            _ => self.outputs.get(k - 1).map(|&out| Some(out)),
        }
    }

    /// `None` when there are no more than `k` inputs at all.
    fn at_most(&self, k: usize) -> Option<Lit> {
        if k >= self.inputs {
            return None;
        }
        self.outputs.get(k).map(|&out| -out)
    }

    /// Literals that must all hold for `min <= count <= max`.
    ///
    /// Returns `None` when `min` exceeds the number of inputs.
    pub fn bound_literals(&self, min: usize, max: Option<usize>) -> Option<Vec<Lit>> {
        let mut lits = Vec::with_capacity(2);
        if let Some(lit) = self.at_least(min)? {
            lits.push(lit);
        }
        if let Some(lit) = max.and_then(|m| self.at_most(m)) {
            lits.push(lit);
        }
        Some(lits)
    }
}

fn build_node(inputs: &[Lit], cap: usize, batch: &mut ClauseBatch) -> Vec<Lit> {
    if inputs.len() == 1 {
        return vec![inputs[0]];
    }
    let mid = inputs.len() / 2;
    let left = build_node(&inputs[..mid], cap, batch);
    let right = build_node(&inputs[mid..], cap, batch);
    let (p, q) = (left.len(), right.len());
    let m = (p + q).min(cap);
    let out: Vec<Lit> = (0..m).map(|_| batch.fresh()).collect();

    for i in 0..=p {
        for j in 0..=q {
            // left >= i and right >= j  =>  out >= i + j
            if i + j >= 1 && i + j <= m {
                let mut clause = Vec::with_capacity(3);
                if i > 0 {
                    clause.push(-left[i - 1]);
                }
                if j > 0 {
                    clause.push(-right[j - 1]);
                }
                clause.push(out[i + j - 1]);
                batch.add(clause);
            }
            // out >= i + j + 1  =>  left >= i + 1 or right >= j + 1
            if i + j < m {
                let mut clause = Vec::with_capacity(3);
                if i < p {
                    clause.push(left[i]);
                }
                if j < q {
                    clause.push(right[j]);
                }
                clause.push(-out[i + j]);
                batch.add(clause);
            }
        }
    }
    out
}
