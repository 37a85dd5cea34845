use crate::{BooleanNetwork, TruthTable, VariableId};
use _expression::FnExpression;
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;

/// **(internal)** Tokenizer and recursive-descent parser of `.bnet` update functions.
mod _expression;

impl BooleanNetwork {
    /// Try to load a Boolean network from a `.bnet` model.
    ///
    /// Variables are sorted by name. The parents of a variable are exactly the variables
    /// that appear in its update function. Variables that only appear as regulators (inputs)
    /// keep their value, i.e. `x' = x`. A variable with a constant update function becomes
    /// its own (inessential) parent, since every variable needs at least one parent.
    pub fn try_from_bnet(model_string: &str) -> Result<BooleanNetwork, String> {
        let mut model_map: HashMap<String, FnExpression> = HashMap::new();
        let mut variables = HashSet::new();
        for line in model_string.lines() {
            let line = line.trim();
            if line.starts_with('#')
                || line.is_empty()
                || line.to_lowercase().starts_with("targets,")
            {
                continue; // Skip comments, empty lines and header.
            }
            let Some((variable_name, function_string)) = line.split_once(',') else {
                return Err(format!("Unexpected line: `{}`", line));
            };
            let variable_name = variable_name.trim().to_string();
            if variable_name.is_empty() {
                return Err(format!("Missing variable name: `{}`", line));
            }
            if model_map.contains_key(&variable_name) {
                return Err(format!(
                    "Duplicate function declaration for `{}`.",
                    variable_name
                ));
            }

            // Also scan regulators for variable names, as inputs don't need to have a function.
            let function = FnExpression::try_from(function_string.trim())
                .map_err(|e| format!("Invalid function of `{}`: {}", variable_name, e))?;
            variables.insert(variable_name.clone());
            function.dump_variables(&mut variables);
            model_map.insert(variable_name, function);
        }

        let mut variables = variables.into_iter().collect::<Vec<_>>();
        variables.sort();
        let index: HashMap<&str, VariableId> = variables
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), VariableId(i)))
            .collect();

        let mut nodes = Vec::with_capacity(variables.len());
        for (i, variable) in variables.iter().enumerate() {
            let id = VariableId(i);
            let node = match model_map.get(variable) {
                None => (vec![id], TruthTable::identity()),
                Some(function) => {
                    let mut used = HashSet::new();
                    function.dump_variables(&mut used);
                    if used.is_empty() {
                        let constant = function.evaluate(&|_: &str| false);
                        (vec![id], TruthTable::constant(constant))
                    } else {
                        let mut parents = used.iter().map(|it| index[it.as_str()]).collect::<Vec<_>>();
                        parents.sort();
                        let inputs = parents
                            .iter()
                            .map(|p| variables[p.0].clone())
                            .collect::<Vec<_>>();
                        let table = function
                            .tabulate(&inputs)
                            .map_err(|e| format!("Invalid function of `{}`: {}", variable, e))?;
                        (parents, table)
                    }
                }
            };
            nodes.push(node);
        }

        BooleanNetwork::try_new(variables, nodes)
    }
}

#[cfg(test)]
mod tests {
    use crate::biodivine_std::bitvector::BitVector;
    use crate::{BooleanNetwork, State, TruthTable, VariableId};

    #[test]
    fn read_bnet_network() {
        let model = "targets, factors\n\
        # a comment\n\
        a, !b\n\
        b, a & c\n\
        \n\
        d, 1\n";
        let bn = BooleanNetwork::try_from_bnet(model).unwrap();
        assert_eq!(vec!["a", "b", "c", "d"], bn.variable_names());

        let a = bn.find_variable("a").unwrap();
        let b = bn.find_variable("b").unwrap();
        let c = bn.find_variable("c").unwrap();
        let d = bn.find_variable("d").unwrap();
        assert_eq!(&[b], bn.parents(a));
        assert_eq!(&[a, c], bn.parents(b));
        assert_eq!(&TruthTable::negation(), bn.get_truth_table(a));

        // `c` is an input, it keeps its value.
        assert_eq!(&[c], bn.parents(c));
        assert_eq!(&TruthTable::identity(), bn.get_truth_table(c));

        // `d` is a constant.
        assert_eq!(&[d], bn.parents(d));
        assert_eq!(&TruthTable::constant(true), bn.get_truth_table(d));

        let state = State::from(vec![false, false, true, false]);
        let next = bn.evaluate(&state).unwrap();
        assert_eq!(vec![true, false, true, true], next.values());
        assert_eq!(VariableId(3), d);
    }

    #[test]
    fn read_bnet_errors() {
        assert!(BooleanNetwork::try_from_bnet("a, b\na, !b").is_err());
        assert!(BooleanNetwork::try_from_bnet("a b").is_err());
        assert!(BooleanNetwork::try_from_bnet("a, b &").is_err());
        assert!(BooleanNetwork::try_from_bnet(", b").is_err());
    }

    #[test]
    fn read_empty_bnet() {
        let bn = BooleanNetwork::try_from_bnet("targets, factors\n").unwrap();
        assert_eq!(0, bn.num_vars());
    }
}
