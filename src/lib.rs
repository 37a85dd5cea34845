//! Boolean network trajectory data for dynamic Bayesian network inference experiments.
//!
//! The crate generates (or loads) Boolean networks, simulates their synchronous and
//! asynchronous dynamics, labels the visited states as transient or attractor states,
//! samples the trajectories into time-series datasets and finally scores inferred
//! network structures against the ground truth.
//!
//! The main entry points are:
//!
//!  - `BooleanNetwork`: a network with explicit, complete truth tables.
//!  - `random_network::FunctionSampler`: random parent sets and update functions.
//!  - `trajectory::TrajectorySimulator`: labeled trajectories.
//!  - `sampling::Sampler`: fixed-format time-series sampled from trajectories.
//!  - `distance::compute`: structure comparison of two networks.
//!  - `experiment`: the random and biological dataset generation runs.

use std::collections::HashMap;
use std::iter::Map;
use std::ops::Range;
use std::path::PathBuf;

pub mod biodivine_std;
pub mod data_format;
pub mod distance;
pub mod dynamics;
pub mod experiment;
pub mod random_network;
pub mod sampling;
pub mod trajectory;

/// **(internal)** Implements `.bnet` parser for `BooleanNetwork` objects.
mod _bnet_parser;
/// **(internal)** Utility methods for `BinaryOp`.
mod _impl_binary_op;
/// **(internal)** Utility methods for `BooleanNetwork`.
mod _impl_boolean_network;
/// **(internal)** Human readable `BooleanNetwork` description used in reports.
mod _impl_boolean_network_display;
/// **(internal)** `BooleanNetwork` to `.bnet` string.
mod _impl_boolean_network_to_bnet;
/// **(internal)** Utility methods for `Error`.
mod _impl_error;
/// **(internal)** Utility methods for `NetworkBounds`.
mod _impl_network_bounds;
/// **(internal)** Utility methods for `RegulatoryGraph`.
mod _impl_regulatory_graph;
/// **(internal)** `.sif` import and export of `RegulatoryGraph`.
mod _impl_regulatory_graph_sif;
/// **(internal)** Utility methods for `TruthTable`.
mod _impl_truth_table;
/// **(internal)** Utility methods for `Variable`.
mod _impl_variable;
/// **(internal)** Utility methods for `VariableId`.
mod _impl_variable_id;
/// **(internal)** Small hand-written networks shared by unit tests.
#[cfg(test)]
mod _test_networks;

/// A state of a `BooleanNetwork`: one bit per variable, indexed by `VariableId`.
pub type State = biodivine_std::bitvector::BitVector58;

/// A type-safe index of a `Variable` inside a `BooleanNetwork` (or a `RegulatoryGraph`).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VariableId(usize);

/// A variable of a `BooleanNetwork`.
///
/// Variable has a `name` and can have value either true or zero.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Variable {
    name: String,
}

/// Describes a regulation (an edge of the network structure) between two `Variable`s.
///
/// In this crate, the regulation is purely structural: the `target` update function
/// depends on the value of `regulator`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Regulation {
    regulator: VariableId,
    target: VariableId,
}

/// A partial representation of a `BooleanNetwork`, `RegulatoryGraph` contains information
/// about the structure of the network (variables and their parents) but lacks the concrete
/// update functions.
///
/// Inferred networks typically only exist in this form, because the inference tool reports
/// the parent sets, not the functions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegulatoryGraph {
    variables: Vec<Variable>,
    regulations: Vec<Regulation>,
    variable_to_index: HashMap<String, VariableId>,
}

/// Possible binary boolean operators that can appear in `.bnet` update functions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Iff,
    Imp,
}

/// A complete Boolean function of `arity` inputs, given explicitly as `2^arity` output bits.
///
/// Row `r` of the table assigns the `i`-th input the value `(r >> i) & 1`. The table is
/// always complete: it is not possible to construct a `TruthTable` with a missing row.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TruthTable {
    arity: usize,
    outputs: Vec<bool>,
}

/// A Boolean network where every variable has an explicit (sorted) list of parents and
/// a complete `TruthTable` over these parents.
///
/// Once constructed, the network is immutable. Every variable has at least one parent and
/// every parent is a valid variable of the network.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BooleanNetwork {
    graph: RegulatoryGraph,
    parents: Vec<Vec<VariableId>>,
    functions: Vec<TruthTable>,
}

/// Structural bounds enforced by `BooleanNetwork::validate`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NetworkBounds {
    min_vars: usize,
    max_vars: usize,
    max_parents: usize,
}

/// Errors reported by the public operations of this crate.
///
/// The variants follow how far a failure propagates in an experiment run: `Configuration` and
/// `Io` abort the whole run, `Simulation` only aborts one trajectory, `Alignment` only one
/// structure comparison and `Parse` only the model (or file) that could not be read.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Alignment error: {0}")]
    Alignment(String),

    #[error("I/O error at `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// An iterator over all `VariableId`s of a `RegulatoryGraph`.
pub type VariableIdIterator = Map<Range<usize>, fn(usize) -> VariableId>;

/// An iterator over all `Regulation`s of a `RegulatoryGraph`.
pub type RegulationIterator<'a> = std::slice::Iter<'a, Regulation>;
