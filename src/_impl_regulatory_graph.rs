use crate::biodivine_std::bitvector::{ArrayBitVector, BitVector};
use crate::biodivine_std::structs::build_index_map;
use crate::{Regulation, RegulationIterator, RegulatoryGraph, Variable, VariableId, VariableIdIterator};
use std::collections::HashSet;
use std::ops::Index;

/// Methods for safely constructing new instances of `RegulatoryGraph`s.
impl RegulatoryGraph {
    /// Create a new `RegulatoryGraph` with variables using the given names
    /// and no regulations.
    ///
    /// The ordering of the variables is preserved.
    pub fn new(variables: Vec<String>) -> RegulatoryGraph {
        RegulatoryGraph {
            regulations: Vec::new(),
            variable_to_index: build_index_map(&variables, |_, i| VariableId(i)),
            variables: variables
                .into_iter()
                .map(|name| Variable { name })
                .collect(),
        }
    }

    /// Create a new `RegulatoryGraph` with the given variable names, failing if some name
    /// appears twice.
    pub fn try_new(variables: Vec<String>) -> Result<RegulatoryGraph, String> {
        let mut seen = HashSet::new();
        for name in &variables {
            if !seen.insert(name.as_str()) {
                return Err(format!("Duplicate variable `{}`.", name));
            }
        }
        Ok(RegulatoryGraph::new(variables))
    }

    /// Add a new `Regulation` to this `RegulatoryGraph`.
    ///
    /// Returns `Err` if `regulator` or `target` are not valid graph variables or when
    /// the regulation between the two variables already exists.
    pub fn add_regulation(&mut self, regulator: &str, target: &str) -> Result<(), String> {
        let regulator = self.get_regulator(regulator)?;
        let target = self.get_target(target)?;
        self.add_raw_regulation(regulator, target)
    }

    /// Same as `add_regulation`, but using `VariableId`s instead of names.
    pub fn add_raw_regulation(
        &mut self,
        regulator: VariableId,
        target: VariableId,
    ) -> Result<(), String> {
        if regulator.0 >= self.num_vars() || target.0 >= self.num_vars() {
            return Err(format!(
                "Invalid regulation: {} -> {} is outside of a graph with {} variables.",
                regulator,
                target,
                self.num_vars()
            ));
        }
        self.assert_no_regulation(regulator, target)?;
        self.regulations.push(Regulation { regulator, target });
        Ok(())
    }

    /// **(internal)** Utility method to safely obtain a regulator variable (using an appropriate error message).
    fn get_regulator(&self, name: &str) -> Result<VariableId, String> {
        self.find_variable(name)
            .ok_or(format!("Invalid regulation: Unknown regulator {}.", name))
    }

    /// **(internal)** Utility method to safely obtain a target variable (using an appropriate error message).
    fn get_target(&self, name: &str) -> Result<VariableId, String> {
        self.find_variable(name)
            .ok_or(format!("Invalid regulation: Unknown target {}.", name))
    }

    /// **(internal)** Utility method to ensure there is no regulation between the two variables yet.
    fn assert_no_regulation(&self, regulator: VariableId, target: VariableId) -> Result<(), String> {
        if self.find_regulation(regulator, target).is_none() {
            Ok(())
        } else {
            Err(format!(
                "Invalid regulation: {} already regulates {}.",
                self.get_variable(regulator),
                self.get_variable(target)
            ))
        }
    }
}

/// Some basic utility methods for inspecting the `RegulatoryGraph`.
impl RegulatoryGraph {
    /// The number of variables in this `RegulatoryGraph`.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// The number of regulations (edges) in this `RegulatoryGraph`.
    pub fn num_regulations(&self) -> usize {
        self.regulations.len()
    }

    /// Find a `VariableId` for the given name, or `None` if the variable does not exist.
    pub fn find_variable(&self, name: &str) -> Option<VariableId> {
        self.variable_to_index.get(name).cloned()
    }

    /// Return a `Variable` corresponding to the given `VariableId`.
    pub fn get_variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }

    /// Shorthand for `self.get_variable(id).get_name()`.
    pub fn get_variable_name(&self, id: VariableId) -> &String {
        &self.variables[id.0].name
    }

    /// Names of all variables, in the order of their ids.
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    /// Find a `Regulation` between two variables if it exists, `None` otherwise.
    pub fn find_regulation(&self, regulator: VariableId, target: VariableId) -> Option<&Regulation> {
        self.regulations
            .iter()
            .find(|r| r.regulator == regulator && r.target == target)
    }

    /// Return a sorted list of variables that regulate the given `target` variable.
    pub fn regulators(&self, target: VariableId) -> Vec<VariableId> {
        let mut regulators: Vec<VariableId> = self
            .regulations
            .iter()
            .filter(|r| r.target == target)
            .map(|r| r.regulator)
            .collect();
        regulators.sort();
        regulators
    }

    /// Return a sorted list of variables that are regulated by the given `regulator` variable.
    pub fn targets(&self, regulator: VariableId) -> Vec<VariableId> {
        let mut targets: Vec<VariableId> = self
            .regulations
            .iter()
            .filter(|r| r.regulator == regulator)
            .map(|r| r.target)
            .collect();
        targets.sort();
        targets
    }

    /// Return an iterator over all variable ids of this graph.
    pub fn variables(&self) -> VariableIdIterator {
        (0..self.variables.len()).map(VariableId)
    }

    /// Return an iterator over all regulations of this graph.
    pub fn regulations(&self) -> RegulationIterator {
        self.regulations.iter()
    }

    /// The parent-adjacency matrix of this graph: row `t` has bit `r` set iff `r` regulates `t`.
    pub fn parent_adjacency(&self) -> Vec<ArrayBitVector> {
        let mut rows = vec![ArrayBitVector::empty(self.num_vars()); self.num_vars()];
        for r in &self.regulations {
            rows[r.target.0].set(r.regulator.0, true);
        }
        rows
    }

    /// Build a copy of this graph where variables are re-indexed by `order`: the `i`-th
    /// variable of the result is `order[i]` of this graph.
    ///
    /// `order` must be a permutation of this graph's variables.
    pub fn permute(&self, order: &[VariableId]) -> Result<RegulatoryGraph, String> {
        if order.len() != self.num_vars() {
            return Err(format!(
                "Permutation of length {} does not match {} variables.",
                order.len(),
                self.num_vars()
            ));
        }
        let names = order
            .iter()
            .map(|v| self.get_variable_name(*v).clone())
            .collect::<Vec<_>>();
        let mut result = RegulatoryGraph::try_new(names)?;
        let mut new_index = vec![VariableId(0); self.num_vars()];
        for (i, old) in order.iter().enumerate() {
            new_index[old.0] = VariableId(i);
        }
        for r in &self.regulations {
            result.add_raw_regulation(new_index[r.regulator.0], new_index[r.target.0])?;
        }
        Ok(result)
    }
}

impl Regulation {
    pub fn get_regulator(&self) -> VariableId {
        self.regulator
    }

    pub fn get_target(&self) -> VariableId {
        self.target
    }
}

impl Index<VariableId> for RegulatoryGraph {
    type Output = Variable;

    fn index(&self, index: VariableId) -> &Self::Output {
        &self.variables[index.0]
    }
}

#[cfg(test)]
mod tests {
    use crate::biodivine_std::bitvector::BitVector;
    use crate::{RegulatoryGraph, VariableId};

    fn abc() -> RegulatoryGraph {
        let mut rg = RegulatoryGraph::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        rg.add_regulation("a", "b").unwrap();
        rg.add_regulation("c", "b").unwrap();
        rg.add_regulation("b", "c").unwrap();
        rg
    }

    #[test]
    fn test_regulatory_graph_basics() {
        let rg = abc();
        let (a, b, c) = (VariableId(0), VariableId(1), VariableId(2));
        assert_eq!(3, rg.num_vars());
        assert_eq!(3, rg.num_regulations());
        assert_eq!(vec![a, c], rg.regulators(b));
        assert_eq!(vec![b], rg.targets(a));
        assert!(rg.find_regulation(a, b).is_some());
        assert!(rg.find_regulation(b, a).is_none());
        assert_eq!("c", rg[c].get_name());
    }

    #[test]
    fn test_invalid_regulations() {
        let mut rg = abc();
        assert!(rg.add_regulation("a", "b").is_err());
        assert!(rg.add_regulation("x", "b").is_err());
        assert!(rg.add_regulation("a", "y").is_err());
        assert!(rg.add_raw_regulation(VariableId(0), VariableId(5)).is_err());
        assert!(RegulatoryGraph::try_new(vec!["a".to_string(), "a".to_string()]).is_err());
    }

    #[test]
    fn test_parent_adjacency() {
        let rows = abc().parent_adjacency();
        assert_eq!(Vec::<usize>::new(), rows[0].ones());
        assert_eq!(vec![0, 2], rows[1].ones());
        assert_eq!(vec![1], rows[2].ones());
    }

    #[test]
    fn test_permute() {
        let rg = abc();
        let permuted = rg
            .permute(&[VariableId(2), VariableId(0), VariableId(1)])
            .unwrap();
        assert_eq!(vec!["c", "a", "b"], permuted.variable_names());
        let b = permuted.find_variable("b").unwrap();
        let a = permuted.find_variable("a").unwrap();
        let c = permuted.find_variable("c").unwrap();
        assert_eq!(vec![c, a], permuted.regulators(b));
        assert!(rg.permute(&[VariableId(0)]).is_err());
    }
}
