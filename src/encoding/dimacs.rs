use crate::encoding::formula::Formula;
use std::fmt::Write as _;
use std::io::{self, Write};

impl Formula {
    /// Serialises the formula in DIMACS CNF.
    pub fn write_dimacs<W: Write>(&self, out: &mut W, comments: &[String]) -> io::Result<()> {
        for comment in comments {
            writeln!(out, "c {}", comment)?;
        }
        writeln!(out, "p cnf {} {}", self.num_vars(), self.len())?;
        let mut line = String::new();
        for clause in self.clauses() {
            line.clear();
            for lit in clause {
                let _ = write!(line, "{} ", lit);
            }
            line.push('0');
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    pub fn to_dimacs(&self) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_dimacs(&mut buf, &[]);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_counts_auxiliary_variables() {
        let mut formula = Formula::new(3);
        let mut batch = formula.batch();
        let aux = batch.fresh();
        batch.add(vec![1, -2, aux]);
        batch.unit(-3);
        formula.commit(batch);
        assert_eq!(formula.to_dimacs(), "p cnf 4 2\n1 -2 4 0\n-3 0\n");
    }
}
