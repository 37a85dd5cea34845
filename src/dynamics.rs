//! Synchronous and asynchronous successor computation.
//!
//! A `DynamicsEngine` owns its random generator, so independent trajectories never share
//! random state. Seeds of individual trajectories are derived from the run seed, the network
//! identifier and the trajectory index using `trajectory_seed`.

use crate::biodivine_std::bitvector::BitVector;
use crate::{BooleanNetwork, Error, State, VariableId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The update scheme of a Boolean network.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UpdateMode {
    /// All variables are updated at once.
    Synchronous,
    /// One variable, chosen uniformly at random, is updated per step.
    Asynchronous,
}

impl UpdateMode {
    /// The name used in dataset file names.
    pub fn short_name(&self) -> &'static str {
        match self {
            UpdateMode::Synchronous => "sync",
            UpdateMode::Asynchronous => "async",
        }
    }
}

impl Display for UpdateMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for UpdateMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sync" | "synchronous" => Ok(UpdateMode::Synchronous),
            "async" | "asynchronous" => Ok(UpdateMode::Asynchronous),
            _ => Err(Error::Configuration(format!(
                "Unknown update mode `{}` (expected `sync` or `async`).",
                value
            ))),
        }
    }
}

/// Computes successors of network states under one `UpdateMode`.
pub struct DynamicsEngine<'a> {
    network: &'a BooleanNetwork,
    mode: UpdateMode,
    rng: StdRng,
}

impl<'a> DynamicsEngine<'a> {
    pub fn new(network: &'a BooleanNetwork, mode: UpdateMode, rng: StdRng) -> DynamicsEngine<'a> {
        DynamicsEngine { network, mode, rng }
    }

    /// Create an engine with a generator initialized from `seed`.
    pub fn seeded(network: &'a BooleanNetwork, mode: UpdateMode, seed: u64) -> DynamicsEngine<'a> {
        Self::new(network, mode, StdRng::seed_from_u64(seed))
    }

    pub fn network(&self) -> &'a BooleanNetwork {
        self.network
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// Access the generator of this engine, e.g. to draw an initial state.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Compute the successor of `state`.
    ///
    /// In asynchronous mode, the successor can be equal to `state` when the chosen variable
    /// does not change its value.
    pub fn successor(&mut self, state: &State) -> Result<State, Error> {
        match self.mode {
            UpdateMode::Synchronous => self.network.evaluate(state),
            UpdateMode::Asynchronous => {
                self.network.check_state(state)?;
                let variable = VariableId::from(self.rng.gen_range(0..self.network.num_vars()));
                let value = self.network.evaluate_node(variable, state)?;
                let mut result = *state;
                result.set(variable.to_index(), value);
                Ok(result)
            }
        }
    }

    /// Draw a uniformly random state of the network.
    pub fn random_state(&mut self) -> Result<State, Error> {
        random_state(self.network.num_vars(), &mut self.rng)
    }
}

/// Draw a uniformly random state with `num_vars` values.
pub fn random_state<R: Rng>(num_vars: usize, rng: &mut R) -> Result<State, Error> {
    if num_vars > State::max_length() {
        return Err(Error::Simulation(format!(
            "States with {} variables are not supported (at most {}).",
            num_vars,
            State::max_length()
        )));
    }
    Ok(State::from_mask(num_vars, rng.gen::<u64>()))
}

/// Derive the seed of one trajectory. The result only depends on the arguments, so the
/// trajectories of a run can be simulated in any order (or in parallel).
pub fn trajectory_seed(run_seed: u64, network_id: &str, trajectory: usize) -> u64 {
    fxhash::hash64(&("trajectory", run_seed, network_id, trajectory as u64))
}

/// Derive the seed used to generate the network with the given identifier.
pub fn network_seed(run_seed: u64, network_id: &str) -> u64 {
    fxhash::hash64(&("network", run_seed, network_id))
}

#[cfg(test)]
mod tests {
    use super::{network_seed, random_state, trajectory_seed, DynamicsEngine, UpdateMode};
    use crate::_test_networks::{mutual_negation, negative_ring};
    use crate::biodivine_std::bitvector::BitVector;
    use crate::{Error, State};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::str::FromStr;

    #[test]
    fn parse_update_mode() {
        assert_eq!(UpdateMode::Synchronous, UpdateMode::from_str("sync").unwrap());
        assert_eq!(UpdateMode::Asynchronous, UpdateMode::from_str("Asynchronous").unwrap());
        assert!(matches!(
            UpdateMode::from_str("bogus"),
            Err(Error::Configuration(_))
        ));
        assert_eq!("async", UpdateMode::Asynchronous.to_string());
    }

    #[test]
    fn synchronous_successor() {
        let network = mutual_negation();
        let mut engine = DynamicsEngine::seeded(&network, UpdateMode::Synchronous, 0);
        let s00 = State::from(vec![false, false]);
        assert_eq!(State::from(vec![true, true]), engine.successor(&s00).unwrap());
    }

    #[test]
    fn asynchronous_successor_changes_at_most_one_value() {
        let network = negative_ring();
        let mut engine = DynamicsEngine::seeded(&network, UpdateMode::Asynchronous, 17);
        let mut state = engine.random_state().unwrap();
        for _ in 0..100 {
            let next = engine.successor(&state).unwrap();
            assert!(state.hamming_distance(&next) <= 1);
            state = next;
        }
        let mut engine = DynamicsEngine::seeded(&network, UpdateMode::Asynchronous, 17);
        assert!(matches!(
            engine.successor(&State::empty(2)),
            Err(Error::Simulation(_))
        ));
    }

    #[test]
    fn seeds_are_reproducible() {
        assert_eq!(trajectory_seed(1, "net", 3), trajectory_seed(1, "net", 3));
        assert_ne!(trajectory_seed(1, "net", 3), trajectory_seed(1, "net", 4));
        assert_ne!(trajectory_seed(1, "net", 3), trajectory_seed(2, "net", 3));
        assert_ne!(network_seed(1, "net"), trajectory_seed(1, "net", 0));
        let a = random_state(10, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = random_state(10, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(10, a.len());
        assert!(random_state(64, &mut StdRng::seed_from_u64(5)).is_err());
    }
}
