use crate::{BooleanNetwork, VariableId};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A regex which only matches valid `.bnet` names.
    static ref BNET_NAME: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_.]*$").unwrap();
}

impl BooleanNetwork {
    /// Produce a `.bnet` string representation of this model.
    ///
    /// Every update function is written in disjunctive normal form (one conjunction per
    /// true row of its truth table), so the parents of each variable survive a round trip.
    /// Constant functions are written as a tautology (or contradiction) over the parents.
    ///
    /// Returns an error if the network contains names which are not supported in `.bnet`,
    /// such as starting with numbers. You can override this behaviour using
    /// `rename_if_necessary`. If this flag is set, all invalid names will be prefixed with `_`.
    pub fn to_bnet(&self, rename_if_necessary: bool) -> Result<String, String> {
        let mut names = Vec::with_capacity(self.num_vars());
        for var in self.variables() {
            let name = self.get_variable_name(var);
            if BNET_NAME.is_match(name) {
                names.push(name.clone());
            } else if rename_if_necessary && BNET_NAME.is_match(&format!("_{}", name)) {
                names.push(format!("_{}", name));
            } else {
                return Err(format!(
                    "Variable {} cannot be exported to bnet. Please rename it first.",
                    name
                ));
            }
        }

        let mut model = "targets, factors\n".to_string();
        for var in self.variables() {
            let function_string = self.function_to_bnet_string(var, &names);
            model.push_str(&format!("{}, {}\n", names[var.0], function_string));
        }
        Ok(model)
    }

    /// **(internal)** Write the update function of `var` in disjunctive normal form.
    fn function_to_bnet_string(&self, var: VariableId, names: &[String]) -> String {
        let table = self.get_truth_table(var);
        let parents = self.parents(var);
        if table.is_constant() {
            // .bnet constants have no regulators, but we can simulate a constant like this:
            let (term, join) = if table.row(0) {
                ("({} | !{})", " & ")
            } else {
                ("({} & !{})", " | ")
            };
            return parents
                .iter()
                .map(|p| term.replace("{}", &names[p.0]))
                .collect::<Vec<_>>()
                .join(join);
        }
        let terms = (0..table.num_rows())
            .filter(|row| table.row(*row))
            .map(|row| {
                let literals = table
                    .row_inputs(row)
                    .into_iter()
                    .zip(parents)
                    .map(|(value, parent)| {
                        let name = &names[parent.0];
                        if value {
                            name.clone()
                        } else {
                            format!("!{}", name)
                        }
                    })
                    .collect::<Vec<_>>();
                if literals.len() == 1 {
                    literals[0].clone()
                } else {
                    format!("({})", literals.join(" & "))
                }
            })
            .collect::<Vec<_>>();
        terms.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use crate::_test_networks::{delayed_fixed_point, negative_ring};
    use crate::{BooleanNetwork, TruthTable, VariableId};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_network_to_bnet() {
        for network in [delayed_fixed_point(), negative_ring()] {
            let network_after =
                BooleanNetwork::try_from_bnet(network.to_bnet(false).unwrap().as_str()).unwrap();
            assert_eq!(network, network_after);
        }
    }

    #[test]
    fn test_dnf_export() {
        let xor = TruthTable::from_fn(2, |x| x[0] ^ x[1]).unwrap();
        let network = BooleanNetwork::try_new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                (vec![VariableId(0), VariableId(1)], xor),
                (vec![VariableId(1)], TruthTable::constant(false)),
            ],
        )
        .unwrap();
        let bnet = network.to_bnet(false).unwrap();
        assert_eq!("targets, factors\na, (a & !b) | (!a & b)\nb, (b & !b)\n", bnet);
        assert_eq!(network, BooleanNetwork::try_from_bnet(&bnet).unwrap());
    }

    #[test]
    fn test_network_to_bnet_invalid() {
        let network = BooleanNetwork::try_new(
            vec!["3A".to_string()],
            vec![(vec![VariableId(0)], TruthTable::negation())],
        )
        .unwrap();
        // Network with names starting with numbers cannot be exported.
        assert!(network.to_bnet(false).is_err());
        assert_eq!(
            "targets, factors\n_3A, !_3A\n",
            network.to_bnet(true).unwrap()
        );
    }
}
