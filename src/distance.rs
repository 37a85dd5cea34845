//! Structural distance between a ground-truth network and an inferred network.
//!
//! Both networks are compared through their parent-adjacency matrices. Before the comparison,
//! the inferred graph is aligned with the ground truth: both must have the same variable names
//! and the inferred graph is re-indexed to follow the ground-truth order.

use crate::biodivine_std::bitvector::{ArrayBitVector, BitVector};
use crate::{Error, RegulatoryGraph};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Supported structure comparison metrics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DistanceMetric {
    /// The number of differing entries of the parent-adjacency matrices, divided by `n^2`.
    StructuralHamming,
    /// The Jaccard distance of the parent sets, averaged over all variables.
    ParentJaccard,
}

impl DistanceMetric {
    pub const ALL: [DistanceMetric; 2] = [
        DistanceMetric::StructuralHamming,
        DistanceMetric::ParentJaccard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::StructuralHamming => "shd",
            DistanceMetric::ParentJaccard => "jaccard",
        }
    }
}

impl Display for DistanceMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "shd" => Ok(DistanceMetric::StructuralHamming),
            "jaccard" => Ok(DistanceMetric::ParentJaccard),
            _ => Err(Error::Configuration(format!(
                "Unknown metric `{}` (expected `shd` or `jaccard`).",
                value
            ))),
        }
    }
}

/// One comparison of an inferred network against the ground truth.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceResult {
    pub truth_id: String,
    pub inferred_id: String,
    pub metric: DistanceMetric,
    pub value: f64,
}

impl Display for DistanceResult {
    /// A tab-separated report line.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "distance\t{}\t{}\t{}\t{:.6}",
            self.truth_id, self.inferred_id, self.metric, self.value
        )
    }
}

/// Re-index `inferred` so that its variables follow the order of `truth`.
///
/// Fails with `Error::Alignment` when the two graphs do not have the same variables.
pub fn align(truth: &RegulatoryGraph, inferred: &RegulatoryGraph) -> Result<RegulatoryGraph, Error> {
    if truth.num_vars() != inferred.num_vars() {
        return Err(Error::Alignment(format!(
            "Ground truth has {} variables, inferred network has {}.",
            truth.num_vars(),
            inferred.num_vars()
        )));
    }
    let order = truth
        .variables()
        .map(|var| {
            let name = truth.get_variable_name(var);
            inferred.find_variable(name).ok_or_else(|| {
                Error::Alignment(format!("Variable `{}` missing in inferred network.", name))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    inferred.permute(&order).map_err(Error::Alignment)
}

/// Compute the distance between `truth` and `inferred` using `metric`.
pub fn compute(
    truth: &RegulatoryGraph,
    inferred: &RegulatoryGraph,
    metric: DistanceMetric,
) -> Result<f64, Error> {
    let inferred = align(truth, inferred)?;
    let a = truth.parent_adjacency();
    let b = inferred.parent_adjacency();
    Ok(match metric {
        DistanceMetric::StructuralHamming => structural_hamming(&a, &b),
        DistanceMetric::ParentJaccard => parent_jaccard(&a, &b),
    })
}

/// Compute all `metrics`, labeling the results with the given network identifiers.
pub fn compute_all(
    truth_id: &str,
    truth: &RegulatoryGraph,
    inferred_id: &str,
    inferred: &RegulatoryGraph,
    metrics: &[DistanceMetric],
) -> Result<Vec<DistanceResult>, Error> {
    metrics
        .iter()
        .map(|metric| {
            Ok(DistanceResult {
                truth_id: truth_id.to_string(),
                inferred_id: inferred_id.to_string(),
                metric: *metric,
                value: compute(truth, inferred, *metric)?,
            })
        })
        .collect()
}

fn structural_hamming(a: &[ArrayBitVector], b: &[ArrayBitVector]) -> f64 {
    let n = a.len();
    if n == 0 {
        return 0.0;
    }
    let differences: usize = a
        .iter()
        .zip(b)
        .map(|(x, y)| x.hamming_distance(y))
        .sum();
    differences as f64 / (n * n) as f64
}

fn parent_jaccard(a: &[ArrayBitVector], b: &[ArrayBitVector]) -> f64 {
    let n = a.len();
    if n == 0 {
        return 0.0;
    }
    let total: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let union = x.union_size(y);
            if union == 0 {
                // Both parent sets are empty.
                0.0
            } else {
                1.0 - x.intersection_size(y) as f64 / union as f64
            }
        })
        .sum();
    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::{align, compute, compute_all, DistanceMetric};
    use crate::{Error, RegulatoryGraph};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn graph(names: &[&str], edges: &[(&str, &str)]) -> RegulatoryGraph {
        let mut graph = RegulatoryGraph::new(names.iter().map(|it| it.to_string()).collect());
        for (regulator, target) in edges {
            graph.add_regulation(regulator, target).unwrap();
        }
        graph
    }

    #[test]
    fn distance_of_simple_graphs() {
        let truth = graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let inferred = graph(&["a", "b"], &[("a", "b"), ("a", "a")]);
        // One missing and one extra edge out of four possible.
        let shd = compute(&truth, &inferred, DistanceMetric::StructuralHamming).unwrap();
        assert!((shd - 0.5).abs() < 1e-9);
        // `a` has parents {b} vs {a}, `b` has {a} vs {a}.
        let jaccard = compute(&truth, &inferred, DistanceMetric::ParentJaccard).unwrap();
        assert!((jaccard - 0.5).abs() < 1e-9);
    }

    #[test]
    fn alignment_reorders_variables() {
        let truth = graph(&["a", "b", "c"], &[("a", "b"), ("c", "a")]);
        let inferred = graph(&["c", "b", "a"], &[("a", "b"), ("c", "a")]);
        let aligned = align(&truth, &inferred).unwrap();
        assert_eq!(truth, aligned);
        for metric in DistanceMetric::ALL {
            assert_eq!(0.0, compute(&truth, &inferred, metric).unwrap());
        }
    }

    #[test]
    fn alignment_failures() {
        let truth = graph(&["a", "b"], &[]);
        let smaller = graph(&["a"], &[]);
        let renamed = graph(&["a", "x"], &[]);
        assert!(matches!(
            compute(&truth, &smaller, DistanceMetric::StructuralHamming),
            Err(Error::Alignment(_))
        ));
        assert!(matches!(
            compute(&truth, &renamed, DistanceMetric::ParentJaccard),
            Err(Error::Alignment(_))
        ));
    }

    #[test]
    fn distance_results() {
        let truth = graph(&["a", "b"], &[("a", "b")]);
        let results = compute_all("truth", &truth, "inferred", &truth, &DistanceMetric::ALL).unwrap();
        assert_eq!(2, results.len());
        assert_eq!("distance\ttruth\tinferred\tshd\t0.000000", results[0].to_string());
        assert_eq!(DistanceMetric::ParentJaccard, results[1].metric);
        assert_eq!(
            DistanceMetric::ParentJaccard,
            DistanceMetric::from_str("jaccard").unwrap()
        );
        assert!(DistanceMetric::from_str("edit").is_err());
    }

    /// A random graph over `a0..a{n-1}` given by an adjacency mask.
    fn masked_graph(n: usize, mask: u64) -> RegulatoryGraph {
        let names = (0..n).map(|i| format!("a{}", i)).collect::<Vec<_>>();
        let mut graph = RegulatoryGraph::new(names.clone());
        for target in 0..n {
            for regulator in 0..n {
                if (mask >> (target * n + regulator)) & 1 == 1 {
                    graph.add_regulation(&names[regulator], &names[target]).unwrap();
                }
            }
        }
        graph
    }

    proptest! {
        #[test]
        fn distances_are_symmetric(n in 1usize..8, x in any::<u64>(), y in any::<u64>()) {
            let a = masked_graph(n, x);
            let b = masked_graph(n, y);
            for metric in DistanceMetric::ALL {
                let ab = compute(&a, &b, metric).unwrap();
                let ba = compute(&b, &a, metric).unwrap();
                prop_assert!((ab - ba).abs() < 1e-12);
                prop_assert!((0.0..=1.0).contains(&ab));
                prop_assert_eq!(0.0, compute(&a, &a, metric).unwrap());
            }
        }
    }
}
