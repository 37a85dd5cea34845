//! Simulation of labeled trajectories.
//!
//! A trajectory starts in an initial state and follows the successors computed by a
//! `DynamicsEngine`. Once a state repeats, the states from its earlier visit onwards form
//! a cycle: they are labeled as attractor states and all earlier states as transient.
//!
//! Synchronous dynamics are deterministic, so the simulation stops at the first repeat. An
//! asynchronous trajectory is a single random path which continues until `max_steps`. The
//! path can leave a cycle it has closed, in which case the cycle is dropped and the next
//! repeat closes a new one. Only a cycle the path never leaves until its end is reported, so
//! every state labeled as an attractor state lies on it. Asynchronous steps that do not change
//! the state only close a cycle when the state is a fixed point.

use crate::biodivine_std::bitvector::BitVector;
use crate::dynamics::{DynamicsEngine, UpdateMode};
use crate::{BooleanNetwork, Error, State};
use fxhash::{FxHashMap, FxHashSet};
use log::debug;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Whether a state lies before the attractor or inside it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StateLabel {
    Transient,
    Attractor,
}

/// The part of a trajectory where a repeated cycle was found: `length` states starting at
/// step `start`. All later states of the trajectory lie on this cycle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AttractorSpan {
    pub start: usize,
    pub length: usize,
}

/// A simulated sequence of states. The position of a state is its step index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trajectory {
    states: Vec<State>,
    labels: Vec<StateLabel>,
    mode: UpdateMode,
    attractor: Option<AttractorSpan>,
}

/// Summary of one `Trajectory` used in reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryStats {
    pub length: usize,
    pub transient_length: usize,
    pub attractor_length: usize,
    pub transient_proportion: f64,
    pub attractor_proportion: f64,
}

impl Trajectory {
    /// **(internal)** Build a trajectory and its labels from the visited states.
    fn new(states: Vec<State>, mode: UpdateMode, attractor: Option<AttractorSpan>) -> Trajectory {
        let labels = (0..states.len())
            .map(|i| match attractor {
                Some(span) if i >= span.start => StateLabel::Attractor,
                _ => StateLabel::Transient,
            })
            .collect();
        Trajectory {
            states,
            labels,
            mode,
            attractor,
        }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn labels(&self) -> &[StateLabel] {
        &self.labels
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// The cycle the trajectory ends in, or `None` if there is no such cycle within `max_steps`.
    pub fn attractor(&self) -> Option<AttractorSpan> {
        self.attractor
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The states of the detected cycle (empty when there is none).
    pub fn cycle(&self) -> &[State] {
        match self.attractor {
            Some(span) => &self.states[span.start..(span.start + span.length)],
            None => &[],
        }
    }

    /// Number of transient states. Without an attractor, all states are transient.
    pub fn transient_length(&self) -> usize {
        self.attractor.map(|it| it.start).unwrap_or(self.states.len())
    }

    /// Length of the detected cycle (zero when there is none).
    pub fn attractor_length(&self) -> usize {
        self.attractor.map(|it| it.length).unwrap_or(0)
    }

    pub fn stats(&self) -> TrajectoryStats {
        let transient = self.transient_length();
        let length = self.states.len();
        let transient_proportion = if length == 0 {
            0.0
        } else {
            transient as f64 / length as f64
        };
        TrajectoryStats {
            length,
            transient_length: transient,
            attractor_length: self.attractor_length(),
            transient_proportion,
            attractor_proportion: if length == 0 {
                0.0
            } else {
                1.0 - transient_proportion
            },
        }
    }
}

impl Display for TrajectoryStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "length={} transient={} attractor={} transient_proportion={:.3} attractor_proportion={:.3}",
            self.length,
            self.transient_length,
            self.attractor_length,
            self.transient_proportion,
            self.attractor_proportion
        )
    }
}

/// Simulates trajectories of at most `max_steps` steps.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrajectorySimulator {
    max_steps: usize,
}

impl TrajectorySimulator {
    pub fn new(max_steps: usize) -> Result<TrajectorySimulator, Error> {
        if max_steps == 0 {
            return Err(Error::Configuration(
                "Trajectories need at least one step.".to_string(),
            ));
        }
        Ok(TrajectorySimulator { max_steps })
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Simulate the trajectory starting in `initial_state` using the successors of `engine`.
    pub fn run(
        &self,
        engine: &mut DynamicsEngine,
        initial_state: State,
    ) -> Result<Trajectory, Error> {
        engine.network().check_state(&initial_state)?;
        let mut states = vec![initial_state];
        advance(engine, &mut states, self.max_steps)?;
        let attractor = detect_cycle(engine.network(), engine.mode(), &states)?;
        Ok(Trajectory::new(states, engine.mode(), attractor))
    }

    /// Continue `trajectory` by (at most) `steps` further steps of `engine`.
    ///
    /// The engine must use the same network and update mode as the trajectory. Labels are
    /// computed again for the whole path, so the reported cycle can change.
    pub fn extend(
        &self,
        engine: &mut DynamicsEngine,
        trajectory: Trajectory,
        steps: usize,
    ) -> Result<Trajectory, Error> {
        if trajectory.is_empty() || trajectory.mode() != engine.mode() {
            return Err(Error::Simulation(format!(
                "Cannot extend a {} trajectory of length {} using {} dynamics.",
                trajectory.mode(),
                trajectory.len(),
                engine.mode()
            )));
        }
        let mut states = trajectory.states;
        advance(engine, &mut states, steps)?;
        let attractor = detect_cycle(engine.network(), engine.mode(), &states)?;
        Ok(Trajectory::new(states, engine.mode(), attractor))
    }
}

/// **(internal)** Append up to `steps` successors to `states`. Synchronous paths stop before
/// the first repeated state.
fn advance(engine: &mut DynamicsEngine, states: &mut Vec<State>, steps: usize) -> Result<(), Error> {
    let mut visited: FxHashSet<State> = match engine.mode() {
        UpdateMode::Synchronous => states.iter().cloned().collect(),
        UpdateMode::Asynchronous => FxHashSet::default(),
    };
    for _ in 0..steps {
        let Some(current) = states.last().cloned() else {
            return Ok(());
        };
        let next = engine.successor(&current)?;
        if engine.mode() == UpdateMode::Synchronous && !visited.insert(next) {
            break;
        }
        states.push(next);
    }
    Ok(())
}

/// **(internal)** Find the cycle a path ends in.
///
/// For synchronous paths, this is the cycle closed by the successor of the last state. For
/// asynchronous paths, the last cycle closed by a repeat, provided the path stays on its
/// states until the end.
fn detect_cycle(
    network: &BooleanNetwork,
    mode: UpdateMode,
    states: &[State],
) -> Result<Option<AttractorSpan>, Error> {
    let Some(last) = states.last() else {
        return Ok(None);
    };
    let span = match mode {
        UpdateMode::Synchronous => {
            let next = network.evaluate(last)?;
            states.iter().position(|s| *s == next).map(|start| AttractorSpan {
                start,
                length: states.len() - start,
            })
        }
        UpdateMode::Asynchronous => {
            let mut last_visit: FxHashMap<State, usize> = FxHashMap::default();
            last_visit.insert(states[0], 0);
            let mut span: Option<AttractorSpan> = None;
            let mut cycle: FxHashSet<State> = FxHashSet::default();
            for (t, pair) in states.windows(2).enumerate() {
                let (current, next) = (pair[0], pair[1]);
                if next == current {
                    if span.is_none() && network.evaluate(&current)? == current {
                        span = Some(AttractorSpan { start: t, length: 1 });
                        cycle = [current].into_iter().collect();
                    }
                    continue;
                }
                if span.is_some() && !cycle.contains(&next) {
                    span = None;
                    cycle.clear();
                }
                if span.is_none() {
                    if let Some(start) = last_visit.get(&next).cloned() {
                        span = Some(AttractorSpan {
                            start,
                            length: t + 1 - start,
                        });
                        cycle = states[start..=t].iter().cloned().collect();
                    }
                }
                last_visit.insert(next, t + 1);
            }
            span
        }
    };
    if let Some(span) = span {
        debug!(
            "Cycle of length {} found after {} transient steps.",
            span.length, span.start
        );
    }
    Ok(span)
}

/// Simulate one trajectory using a fresh engine seeded by `seed`.
pub fn simulate(
    network: &BooleanNetwork,
    initial_state: State,
    mode: UpdateMode,
    max_steps: usize,
    seed: u64,
) -> Result<Trajectory, Error> {
    let mut engine = DynamicsEngine::seeded(network, mode, seed);
    TrajectorySimulator::new(max_steps)?.run(&mut engine, initial_state)
}

/// Number of different cycles among the given trajectories. Two cycles are the same when they
/// consist of the same states.
pub fn distinct_attractors<'a, I>(trajectories: I) -> usize
where
    I: IntoIterator<Item = &'a Trajectory>,
{
    trajectories
        .into_iter()
        .filter(|it| it.attractor().is_some())
        .map(|it| it.cycle().iter().map(|s| s.mask()).collect::<BTreeSet<_>>())
        .collect::<FxHashSet<_>>()
        .len()
}

/// Default size limit of `SyncAttractorCatalog`.
pub const CATALOG_LIMIT: usize = 16;

/// All attractors of the synchronous dynamics, computed by exploring every state.
///
/// Each attractor is stored as a cycle starting in its smallest state (fixed points are cycles
/// of length one).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyncAttractorCatalog {
    attractors: Vec<Vec<State>>,
    attractor_of: FxHashMap<State, usize>,
}

impl SyncAttractorCatalog {
    /// Explore all `2^n` states of `network`. Fails with `Error::Configuration` when the network
    /// has more than `limit` variables.
    pub fn compute(network: &BooleanNetwork, limit: usize) -> Result<SyncAttractorCatalog, Error> {
        let num_vars = network.num_vars();
        if num_vars == 0 || num_vars > limit || num_vars > State::max_length() {
            return Err(Error::Configuration(format!(
                "Cannot enumerate states of a network with {} variables (limit is {}).",
                num_vars, limit
            )));
        }
        // 0 = unvisited, otherwise the (1-based) walk that visited the state first.
        let mut visited_by = vec![0usize; 1 << num_vars];
        let mut attractors = Vec::new();
        for start in 0..(1u64 << num_vars) {
            if visited_by[start as usize] != 0 {
                continue;
            }
            let walk = start as usize + 1;
            let mut state = State::from_mask(num_vars, start);
            while visited_by[state.mask() as usize] == 0 {
                visited_by[state.mask() as usize] = walk;
                state = network.evaluate(&state)?;
            }
            if visited_by[state.mask() as usize] == walk {
                // The walk closed a new cycle.
                let mut cycle = vec![state];
                let mut next = network.evaluate(&state)?;
                while next != state {
                    cycle.push(next);
                    next = network.evaluate(&next)?;
                }
                let min_index = cycle
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, s)| s.mask())
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                cycle.rotate_left(min_index);
                attractors.push(cycle);
            }
        }
        attractors.sort_by_key(|it| (it.len(), it[0].mask()));
        let mut attractor_of = FxHashMap::default();
        for (i, cycle) in attractors.iter().enumerate() {
            for state in cycle {
                attractor_of.insert(*state, i);
            }
        }
        Ok(SyncAttractorCatalog {
            attractors,
            attractor_of,
        })
    }

    pub fn attractors(&self) -> &[Vec<State>] {
        &self.attractors
    }

    pub fn len(&self) -> usize {
        self.attractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attractors.is_empty()
    }

    /// Lengths of all attractors, sorted.
    pub fn lengths(&self) -> Vec<usize> {
        self.attractors.iter().map(|it| it.len()).collect()
    }

    /// Index of the attractor containing `state`, if `state` is an attractor state.
    pub fn attractor_of(&self, state: &State) -> Option<usize> {
        self.attractor_of.get(state).cloned()
    }

    /// Check that the cycle detected by a synchronous trajectory is one of the attractors.
    pub fn cross_check(&self, trajectory: &Trajectory) -> Result<(), Error> {
        let cycle = trajectory.cycle();
        if cycle.is_empty() {
            return Ok(());
        }
        let index = self.attractor_of(&cycle[0]).ok_or_else(|| {
            Error::Simulation(format!("State {} is not an attractor state.", cycle[0]))
        })?;
        let expected = &self.attractors[index];
        if expected.len() != cycle.len() || cycle.iter().any(|s| self.attractor_of(s) != Some(index))
        {
            return Err(Error::Simulation(format!(
                "Detected cycle of length {} does not match attractor of length {}.",
                cycle.len(),
                expected.len()
            )));
        }
        Ok(())
    }
}
