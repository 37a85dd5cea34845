use crate::biodivine_std::bitvector::BitVector;
use crate::{
    BooleanNetwork, Error, NetworkBounds, RegulatoryGraph, State, TruthTable, Variable, VariableId,
    VariableIdIterator,
};
use std::ops::Index;
use std::path::Path;

/// Basic methods for safely building `BooleanNetwork`s.
impl BooleanNetwork {
    /// Construct a new `BooleanNetwork` from variable names and, for each variable, its
    /// parents together with a truth table over them.
    ///
    /// The parents of each variable must be valid, unique and sorted, the truth table must
    /// have arity equal to the number of parents and each variable needs at least one parent.
    pub fn try_new(
        variables: Vec<String>,
        nodes: Vec<(Vec<VariableId>, TruthTable)>,
    ) -> Result<BooleanNetwork, String> {
        if variables.len() != nodes.len() {
            return Err(format!(
                "Network has {} variables, but {} update functions were given.",
                variables.len(),
                nodes.len()
            ));
        }
        let mut graph = RegulatoryGraph::try_new(variables)?;
        let mut parents = Vec::with_capacity(nodes.len());
        let mut functions = Vec::with_capacity(nodes.len());
        for (target, (regulators, table)) in nodes.into_iter().enumerate() {
            let target = VariableId(target);
            Self::assert_parents_are_valid(&graph, target, &regulators, &table)?;
            for regulator in &regulators {
                graph.add_raw_regulation(*regulator, target)?;
            }
            parents.push(regulators);
            functions.push(table);
        }
        Ok(BooleanNetwork {
            graph,
            parents,
            functions,
        })
    }

    /// Load a network from a file. Currently, only `.bnet` files are supported.
    pub fn try_from_file<T: AsRef<Path>>(path: T) -> Result<BooleanNetwork, Error> {
        let path: &Path = path.as_ref();
        let extension = path.extension().and_then(|it| it.to_str());
        if extension != Some("bnet") {
            return Err(Error::Parse(format!(
                "Unknown model format: `{}`.",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::try_from_bnet(content.as_str())
            .map_err(|e| Error::Parse(format!("Invalid model `{}`: {}", path.display(), e)))
    }

    /// **(internal)** Utility method to check the parents of one variable.
    fn assert_parents_are_valid(
        graph: &RegulatoryGraph,
        target: VariableId,
        parents: &[VariableId],
        table: &TruthTable,
    ) -> Result<(), String> {
        let name = graph.get_variable_name(target);
        if parents.is_empty() {
            return Err(format!("Variable `{}` has no parents.", name));
        }
        if let Some(invalid) = parents.iter().find(|p| p.0 >= graph.num_vars()) {
            return Err(format!(
                "Variable `{}` has unknown parent {}.",
                name, invalid
            ));
        }
        if parents.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!(
                "Parents of `{}` must be unique and sorted.",
                name
            ));
        }
        if table.arity() != parents.len() {
            return Err(format!(
                "Variable `{}` has {} parents, but its function has arity {}.",
                name,
                parents.len(),
                table.arity()
            ));
        }
        Ok(())
    }
}

/// Structural validation and evaluation of update functions.
impl BooleanNetwork {
    /// Check that this network fits the given bounds: the number of variables is within the
    /// size range and every variable has between one and `max_parents` parents.
    pub fn validate(&self, bounds: &NetworkBounds) -> Result<(), Error> {
        if !bounds.admits_size(self.num_vars()) {
            return Err(Error::Configuration(format!(
                "Network with {} variables is outside of the size range {}..={}.",
                self.num_vars(),
                bounds.min_vars(),
                bounds.max_vars()
            )));
        }
        for var in self.variables() {
            let parents = self.parents(var);
            if parents.is_empty() || parents.len() > bounds.max_parents() {
                return Err(Error::Configuration(format!(
                    "Variable `{}` has {} parents, expected 1..={}.",
                    self.get_variable_name(var),
                    parents.len(),
                    bounds.max_parents()
                )));
            }
            if let Some(p) = parents.iter().find(|p| p.0 >= self.num_vars()) {
                return Err(Error::Configuration(format!(
                    "Variable `{}` references unknown parent {}.",
                    self.get_variable_name(var),
                    p
                )));
            }
            let table = &self.functions[var.0];
            if table.num_rows() != 1 << parents.len() {
                return Err(Error::Configuration(format!(
                    "Truth table of `{}` is incomplete.",
                    self.get_variable_name(var)
                )));
            }
        }
        Ok(())
    }

    /// Fail with `Error::Simulation` unless `state` has one value per variable.
    pub fn check_state(&self, state: &State) -> Result<(), Error> {
        if self.num_vars() == 0 {
            return Err(Error::Simulation(
                "Cannot simulate a network without variables.".to_string(),
            ));
        }
        if state.len() != self.num_vars() {
            return Err(Error::Simulation(format!(
                "State of length {} does not match a network with {} variables.",
                state.len(),
                self.num_vars()
            )));
        }
        Ok(())
    }

    /// Compute the synchronous successor of `state`: every variable is updated at once
    /// using the values from `state`.
    pub fn evaluate(&self, state: &State) -> Result<State, Error> {
        self.check_state(state)?;
        let mut result = *state;
        for var in self.variables() {
            result.set(var.0, self.lookup(var, state));
        }
        Ok(result)
    }

    /// Compute the value the update function of `variable` assigns to `state`.
    pub fn evaluate_node(&self, variable: VariableId, state: &State) -> Result<bool, Error> {
        self.check_state(state)?;
        if variable.0 >= self.num_vars() {
            return Err(Error::Simulation(format!(
                "Unknown variable {} in a network with {} variables.",
                variable,
                self.num_vars()
            )));
        }
        Ok(self.lookup(variable, state))
    }

    /// **(internal)** Truth table lookup without any validation.
    fn lookup(&self, variable: VariableId, state: &State) -> bool {
        let row = self.parents[variable.0]
            .iter()
            .enumerate()
            .fold(0usize, |acc, (i, p)| acc | (usize::from(state.get(p.0)) << i));
        self.functions[variable.0].row(row)
    }
}

/// Some utility methods for accessing the structure of a `BooleanNetwork`.
impl BooleanNetwork {
    /// Obtain a reference to the underlying `RegulatoryGraph` of the `BooleanNetwork`.
    ///
    /// The graph is the structure that is compared against inferred networks.
    pub fn as_graph(&self) -> &RegulatoryGraph {
        &self.graph
    }

    /// The number of variables in this `BooleanNetwork`.
    pub fn num_vars(&self) -> usize {
        self.graph.num_vars()
    }

    /// Return an iterator over all variable ids of this network.
    pub fn variables(&self) -> VariableIdIterator {
        self.graph.variables()
    }

    /// Return the variable object based on the given `VariableId`.
    pub fn get_variable(&self, id: VariableId) -> &Variable {
        self.graph.get_variable(id)
    }

    /// Shorthand for `self.as_graph().get_variable(id).get_name()`.
    pub fn get_variable_name(&self, id: VariableId) -> &String {
        self.graph.get_variable_name(id)
    }

    /// Names of all variables, in the order of their ids.
    pub fn variable_names(&self) -> Vec<String> {
        self.graph.variable_names()
    }

    /// Find a `VariableId` for the given name, or `None` if the variable does not exist.
    pub fn find_variable(&self, name: &str) -> Option<VariableId> {
        self.graph.find_variable(name)
    }

    /// The sorted parents of the given variable.
    pub fn parents(&self, variable: VariableId) -> &[VariableId] {
        &self.parents[variable.0]
    }

    /// The update function of the given variable, indexed by the values of its parents.
    pub fn get_truth_table(&self, variable: VariableId) -> &TruthTable {
        &self.functions[variable.0]
    }
}

impl Index<VariableId> for BooleanNetwork {
    type Output = Variable;

    fn index(&self, index: VariableId) -> &Self::Output {
        self.graph.get_variable(index)
    }
}
