use crate::RegulatoryGraph;
use std::collections::BTreeSet;

impl RegulatoryGraph {
    /// Read a network structure from a `.sif` (simple interaction format) document.
    ///
    /// Every line has the form `source interaction target [target ...]`, separated by tabs or
    /// spaces. The interaction type (e.g. `+` or `-`) is ignored and repeated edges are merged.
    /// A line with a single name declares an isolated variable.
    ///
    /// If `variables` is given, the graph uses exactly these variables (in this order) and
    /// any other name is an error. Otherwise, variables are all names in the file, sorted.
    pub fn try_from_sif(
        sif: &str,
        variables: Option<&[String]>,
    ) -> Result<RegulatoryGraph, String> {
        let mut edges = Vec::new();
        let mut names = BTreeSet::new();
        for line in sif.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens = line.split_whitespace().collect::<Vec<_>>();
            match tokens.as_slice() {
                [single] => {
                    names.insert(single.to_string());
                }
                [source, _interaction, targets @ ..] if !targets.is_empty() => {
                    names.insert(source.to_string());
                    for target in targets {
                        names.insert(target.to_string());
                        edges.push((source.to_string(), target.to_string()));
                    }
                }
                _ => return Err(format!("Unexpected line: `{}`", line)),
            }
        }

        let mut graph = match variables {
            Some(variables) => RegulatoryGraph::try_new(variables.to_vec())?,
            None => RegulatoryGraph::new(names.into_iter().collect()),
        };
        for (source, target) in edges {
            let regulator = graph
                .find_variable(&source)
                .ok_or(format!("Unknown variable `{}`.", source))?;
            let target = graph
                .find_variable(&target)
                .ok_or(format!("Unknown variable `{}`.", target))?;
            if graph.find_regulation(regulator, target).is_none() {
                graph.add_raw_regulation(regulator, target)?;
            }
        }
        Ok(graph)
    }

    /// Write the structure as `.sif`: one `regulator\t->\ttarget` line per regulation,
    /// ordered by target and then by regulator. Variables without any regulation are
    /// written as a single name so that they survive a round trip.
    pub fn to_sif(&self) -> String {
        let mut result = String::new();
        for target in self.variables() {
            for regulator in self.regulators(target) {
                result.push_str(&format!(
                    "{}\t->\t{}\n",
                    self.get_variable_name(regulator),
                    self.get_variable_name(target)
                ));
            }
        }
        for var in self.variables() {
            if self.regulators(var).is_empty() && self.targets(var).is_empty() {
                result.push_str(&format!("{}\n", self.get_variable_name(var)));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::RegulatoryGraph;

    #[test]
    fn read_sif() {
        let sif = "a\t+\tb\nc - b a\n\n# comment\nb + b\nd\na - b\n";
        let graph = RegulatoryGraph::try_from_sif(sif, None).unwrap();
        assert_eq!(vec!["a", "b", "c", "d"], graph.variable_names());
        assert_eq!(4, graph.num_regulations());
        let a = graph.find_variable("a").unwrap();
        let b = graph.find_variable("b").unwrap();
        let c = graph.find_variable("c").unwrap();
        assert_eq!(vec![a, b, c], graph.regulators(b));
        assert_eq!(vec![c], graph.regulators(a));
    }

    #[test]
    fn read_sif_with_variables() {
        let variables = vec!["X1".to_string(), "X0".to_string(), "X2".to_string()];
        let graph = RegulatoryGraph::try_from_sif("X0 -> X1", Some(&variables)).unwrap();
        assert_eq!(variables, graph.variable_names());
        assert_eq!(1, graph.num_regulations());
        assert!(RegulatoryGraph::try_from_sif("X0 -> X9", Some(&variables)).is_err());
        assert!(RegulatoryGraph::try_from_sif("X0 ->", None).is_err());
    }

    #[test]
    fn sif_round_trip() {
        let sif = "a\t->\tb\nc\t->\tb\nb\t->\tc\nd\n";
        let graph = RegulatoryGraph::try_from_sif(sif, None).unwrap();
        assert_eq!(sif, graph.to_sif());
        assert_eq!(graph, RegulatoryGraph::try_from_sif(&graph.to_sif(), None).unwrap());
    }
}
