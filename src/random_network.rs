//! Random Boolean networks: random parent sets and random update functions.
//!
//! A `FunctionSampler` draws, for one variable, a parent set of size `1..=max_parents` and
//! a complete truth table over these parents. Two function families are supported:
//!
//!  - `FunctionFamily::Table`: every output bit is drawn independently, true with
//!    probability `bias`.
//!  - `FunctionFamily::AndOr`: the parents are folded from left to right using random `&` and
//!    `|` operators, every argument is negated with probability 1/2 and so is the whole
//!    expression. The expression is then tabulated.
//!
//! ```rust
//! use bn_datagen::random_network::FunctionSampler;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let network = FunctionSampler::default().random_network(8, &mut rng).unwrap();
//! assert_eq!(8, network.num_vars());
//! ```

use crate::biodivine_std::bitvector::BitVector;
use crate::{BooleanNetwork, Error, State, TruthTable, VariableId};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;

/// Distribution of the number of parents of one variable.
#[derive(Clone, Debug, PartialEq)]
pub enum ParentCountDistribution {
    /// Every size in `1..=max_parents` is equally likely.
    Uniform,
    /// `weights[i]` is the relative weight of size `i + 1`.
    ///
    /// When fewer candidates than `max_parents` are available, the weights of the
    /// unreachable sizes are ignored.
    Weighted(Vec<f64>),
}

/// The family of random update functions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FunctionFamily {
    Table { bias: f64 },
    AndOr,
}

impl Default for FunctionFamily {
    fn default() -> Self {
        FunctionFamily::Table { bias: 0.5 }
    }
}

/// Generator of random parent sets and update functions.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSampler {
    max_parents: usize,
    distribution: ParentCountDistribution,
    family: FunctionFamily,
    allow_self_regulation: bool,
}

impl Default for FunctionSampler {
    /// At most 3 parents with uniform size, unbiased truth tables and no self-regulation.
    fn default() -> Self {
        FunctionSampler {
            max_parents: 3,
            distribution: ParentCountDistribution::Uniform,
            family: FunctionFamily::default(),
            allow_self_regulation: false,
        }
    }
}

impl FunctionSampler {
    /// Create a sampler with uniform parent counts and no self-regulation.
    pub fn new(max_parents: usize, family: FunctionFamily) -> Result<FunctionSampler, Error> {
        let sampler = FunctionSampler {
            max_parents,
            family,
            ..FunctionSampler::default()
        };
        sampler.validate()?;
        Ok(sampler)
    }

    /// Replace the parent count distribution.
    pub fn with_distribution(
        mut self,
        distribution: ParentCountDistribution,
    ) -> Result<FunctionSampler, Error> {
        self.distribution = distribution;
        self.validate()?;
        Ok(self)
    }

    /// Allow (or forbid) a variable to be its own parent.
    pub fn with_self_regulation(mut self, allow: bool) -> FunctionSampler {
        self.allow_self_regulation = allow;
        self
    }

    pub fn max_parents(&self) -> usize {
        self.max_parents
    }

    pub fn family(&self) -> FunctionFamily {
        self.family
    }

    pub fn allows_self_regulation(&self) -> bool {
        self.allow_self_regulation
    }

    /// Check that the sampler parameters are usable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_parents < 1 {
            return Err(Error::Configuration(format!(
                "Maximal number of parents must be at least 1, got {}.",
                self.max_parents
            )));
        }
        if let FunctionFamily::Table { bias } = self.family {
            if !(0.0..=1.0).contains(&bias) {
                return Err(Error::Configuration(format!(
                    "Function bias must be in [0, 1], got {}.",
                    bias
                )));
            }
        }
        if let ParentCountDistribution::Weighted(weights) = &self.distribution {
            if weights.len() != self.max_parents {
                return Err(Error::Configuration(format!(
                    "Expected {} parent count weights, got {}.",
                    self.max_parents,
                    weights.len()
                )));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(Error::Configuration(format!(
                    "Parent count weights must be non-negative, got {:?}.",
                    weights
                )));
            }
        }
        Ok(())
    }

    /// Draw the parents and the update function of `node`.
    ///
    /// Parents are drawn from `candidates` (without `node` itself unless self-regulation is
    /// allowed). The number of parents is capped by the number of usable candidates. The
    /// returned parents are sorted.
    pub fn generate<R: Rng>(
        &self,
        node: VariableId,
        candidates: &[VariableId],
        rng: &mut R,
    ) -> Result<(Vec<VariableId>, TruthTable), Error> {
        self.validate()?;
        let mut usable = candidates
            .iter()
            .filter(|it| self.allow_self_regulation || **it != node)
            .cloned()
            .collect::<Vec<_>>();
        usable.sort();
        usable.dedup();
        if usable.is_empty() {
            return Err(Error::Configuration(format!(
                "No candidate parents for {}.",
                node
            )));
        }

        let cap = self.max_parents.min(usable.len());
        let count = match &self.distribution {
            ParentCountDistribution::Uniform => rng.gen_range(1..=cap),
            ParentCountDistribution::Weighted(weights) => {
                let index = WeightedIndex::new(&weights[..cap]).map_err(|e| {
                    Error::Configuration(format!(
                        "Invalid parent count weights {:?}: {}.",
                        &weights[..cap],
                        e
                    ))
                })?;
                index.sample(rng) + 1
            }
        };

        let mut parents = usable
            .choose_multiple(rng, count)
            .cloned()
            .collect::<Vec<_>>();
        parents.sort();

        let table = match self.family {
            FunctionFamily::Table { bias } => {
                let outputs = (0..(1usize << count)).map(|_| rng.gen_bool(bias)).collect();
                TruthTable::new(count, outputs)
            }
            FunctionFamily::AndOr => random_and_or(count, rng),
        }
        .map_err(Error::Configuration)?;

        Ok((parents, table))
    }

    /// Build a random network with `num_vars` variables named `X0..X{n-1}`. Every variable
    /// can choose its parents among all variables.
    pub fn random_network<R: Rng>(
        &self,
        num_vars: usize,
        rng: &mut R,
    ) -> Result<BooleanNetwork, Error> {
        if num_vars < 1 || num_vars > State::max_length() {
            return Err(Error::Configuration(format!(
                "Cannot generate a network with {} variables (expected 1..={}).",
                num_vars,
                State::max_length()
            )));
        }
        let names = (0..num_vars).map(|i| format!("X{}", i)).collect();
        let candidates = (0..num_vars).map(VariableId::from).collect::<Vec<_>>();
        let nodes = candidates
            .iter()
            .map(|node| self.generate(*node, &candidates, rng))
            .collect::<Result<Vec<_>, _>>()?;
        BooleanNetwork::try_new(names, nodes).map_err(Error::Configuration)
    }
}

/// Draw the parents and truth table of `node` with the default parent count distribution
/// and the `Table` family with the given `bias`.
pub fn generate<R: Rng>(
    node: VariableId,
    candidates: &[VariableId],
    max_parents: usize,
    bias: f64,
    rng: &mut R,
) -> Result<(Vec<VariableId>, TruthTable), Error> {
    FunctionSampler::new(max_parents, FunctionFamily::Table { bias })?.generate(
        node,
        candidates,
        rng,
    )
}

/// A random network using the default `FunctionSampler`.
pub fn random_network<R: Rng>(num_vars: usize, rng: &mut R) -> Result<BooleanNetwork, Error> {
    FunctionSampler::default().random_network(num_vars, rng)
}

/// **(internal)** Tabulate a random and/or chain over `arity` inputs.
fn random_and_or<R: Rng>(arity: usize, rng: &mut R) -> Result<TruthTable, String> {
    let negated = (0..arity).map(|_| rng.gen_bool(0.5)).collect::<Vec<_>>();
    let conjunction = (1..arity).map(|_| rng.gen_bool(0.5)).collect::<Vec<_>>();
    let negate_all = rng.gen_bool(0.5);
    TruthTable::from_fn(arity, |inputs| {
        let mut value = inputs[0] ^ negated[0];
        for i in 1..arity {
            let argument = inputs[i] ^ negated[i];
            value = if conjunction[i - 1] {
                value && argument
            } else {
                value || argument
            };
        }
        value ^ negate_all
    })
}
