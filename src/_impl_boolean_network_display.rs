use crate::{BooleanNetwork, RegulatoryGraph};
use std::fmt::{Display, Error, Formatter};

impl Display for RegulatoryGraph {
    /// One line per variable: `target <- regulator, regulator`.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for var in self.variables() {
            let regulators = self
                .regulators(var)
                .into_iter()
                .map(|it| self.get_variable_name(it).as_str())
                .collect::<Vec<_>>();
            writeln!(f, "{} <- {}", self[var], regulators.join(", "))?;
        }
        Ok(())
    }
}

impl Display for BooleanNetwork {
    /// Parents of every variable, followed by its truth table (outputs in row order).
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for var in self.variables() {
            let parents = self
                .parents(var)
                .iter()
                .map(|it| self.get_variable_name(*it).as_str())
                .collect::<Vec<_>>();
            writeln!(
                f,
                "{} <- {} : {}",
                self[var],
                parents.join(", "),
                self.get_truth_table(var)
            )?;
        }
        Ok(())
    }
}
