//! Dataset generation runs.
//!
//! A run simulates a number of trajectories for every network and every `DatasetSetting`,
//! samples them and writes one `.data` file per (network, setting) pair. Trajectories are
//! simulated in parallel, but each one uses its own generator seeded from the run seed, the
//! network and the trajectory index, so the output does not depend on the number of threads.
//!
//! A failed trajectory (`Error::Simulation`) is logged, counted in the run summary and left out
//! of the dataset. Configuration and I/O errors abort the whole run.

use crate::dynamics::{trajectory_seed, DynamicsEngine, UpdateMode};
use crate::sampling::{Dataset, DatasetMetadata, SampledSeries, Sampler};
use crate::trajectory::{Trajectory, TrajectorySimulator};
use crate::{BooleanNetwork, Error};
use log::warn;
use rayon::prelude::*;

mod biological_run;
mod flags;
mod random_run;
mod report;
mod scoring;

pub use biological_run::{run_biological, BiologicalRunConfig};
pub use flags::Flags;
pub use random_run::{run_random, RandomRunConfig, Sweep};
pub use report::{append_distances, ConfigurationSummary, Report, RunSummary};
pub use scoring::{load_structure, score_structure};

/// Parameters of one dataset: `ntraj` series of `steps` samples, `stride` steps apart.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DatasetSetting {
    pub steps: usize,
    pub stride: usize,
    pub ntraj: usize,
    pub mode: UpdateMode,
}

/// The result of simulating and sampling one dataset.
#[derive(Debug)]
pub struct DatasetOutcome {
    pub dataset: Dataset,
    /// Trajectories of the series in `dataset` (in the same order) with their indices.
    pub trajectories: Vec<(usize, Trajectory)>,
    /// Indices of the trajectories that failed, with the reason.
    pub failures: Vec<(usize, Error)>,
    /// Total number of samples that wrapped around an attractor.
    pub wrapped: usize,
}

impl DatasetSetting {
    pub fn validate(&self) -> Result<(), Error> {
        if self.ntraj == 0 {
            return Err(Error::Configuration(
                "Number of trajectories must be positive.".to_string(),
            ));
        }
        Sampler::new(self.stride, self.steps, None).map(|_| ())
    }

    pub fn metadata(&self, num_vars: usize) -> DatasetMetadata {
        DatasetMetadata {
            num_vars,
            steps: self.steps,
            stride: self.stride,
            ntraj: self.ntraj,
            mode: self.mode,
        }
    }
}

/// Simulate `setting.ntraj` trajectories of `network` from random initial states and sample
/// each of them into one series of the resulting dataset.
pub fn simulate_dataset(
    network: &BooleanNetwork,
    network_id: &str,
    setting: &DatasetSetting,
    proportion_transient: Option<f64>,
    run_seed: u64,
) -> Result<DatasetOutcome, Error> {
    setting.validate()?;
    let sampler = Sampler::new(setting.stride, setting.steps, proportion_transient)?;
    let simulator = TrajectorySimulator::new(sampler.required_steps().max(1))?;
    let metadata = setting.metadata(network.num_vars());
    let seed_id = format!("{}/{}", network_id, metadata.file_name());

    let results: Vec<Result<(Trajectory, SampledSeries), Error>> = (0..setting.ntraj)
        .into_par_iter()
        .map(|i| {
            let seed = trajectory_seed(run_seed, &seed_id, i);
            let mut engine = DynamicsEngine::seeded(network, setting.mode, seed);
            let initial = engine.random_state()?;
            let mut trajectory = simulator.run(&mut engine, initial)?;
            let start = sampler.window_start(&trajectory);
            let end = start + sampler.required_steps();
            if setting.mode == UpdateMode::Asynchronous && end >= trajectory.len() {
                // The window was shifted past the simulated path, so the path continues.
                let missing = end + 1 - trajectory.len();
                trajectory = simulator.extend(&mut engine, trajectory, missing)?;
            }
            let series = sampler.sample_at(&trajectory, start)?;
            Ok((trajectory, series))
        })
        .collect();

    let mut outcome = DatasetOutcome {
        dataset: Dataset::new(metadata, network.variable_names())?,
        trajectories: Vec::new(),
        failures: Vec::new(),
        wrapped: 0,
    };
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok((trajectory, series)) => {
                outcome.wrapped += series.wrapped();
                outcome.dataset.push(series.into_states())?;
                outcome.trajectories.push((i, trajectory));
            }
            Err(error) if !error.is_fatal() => {
                warn!(
                    "Trajectory {} of `{}` ({}) failed: {}",
                    i,
                    network_id,
                    metadata.file_name(),
                    error
                );
                outcome.failures.push((i, error));
            }
            Err(error) => return Err(error),
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::{simulate_dataset, DatasetSetting};
    use crate::_test_networks::delayed_fixed_point;
    use crate::biodivine_std::bitvector::BitVector;
    use crate::dynamics::UpdateMode;
    use crate::random_network::random_network;
    use crate::BooleanNetwork;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn dataset_shape() {
        let network = random_network(5, &mut StdRng::seed_from_u64(0)).unwrap();
        let setting = DatasetSetting {
            steps: 10,
            stride: 2,
            ntraj: 7,
            mode: UpdateMode::Asynchronous,
        };
        let outcome = simulate_dataset(&network, "net", &setting, None, 1).unwrap();
        assert!(outcome.failures.is_empty());
        assert_eq!(7, outcome.dataset.num_series());
        assert_eq!(7, outcome.trajectories.len());
        for series in outcome.dataset.series() {
            assert_eq!(10, series.len());
        }
        // Asynchronous trajectories always run for all the steps.
        assert_eq!(0, outcome.wrapped);
    }

    #[test]
    fn shifted_asynchronous_windows_follow_the_dynamics() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut extended = 0;
        for _ in 0..10 {
            let network = random_network(5, &mut rng).unwrap();
            for (stride, proportion) in [(1, 0.0), (1, 0.3), (2, 0.0)] {
                let setting = DatasetSetting {
                    steps: 30,
                    stride,
                    ntraj: 10,
                    mode: UpdateMode::Asynchronous,
                };
                let outcome =
                    simulate_dataset(&network, "net", &setting, Some(proportion), 5).unwrap();
                assert!(outcome.failures.is_empty());
                assert_eq!(0, outcome.wrapped);
                let simulated = (setting.steps - 1) * stride + 1;
                extended += outcome
                    .trajectories
                    .iter()
                    .filter(|(_, it)| it.len() > simulated)
                    .count();
                // One asynchronous step changes at most one variable.
                for series in outcome.dataset.series() {
                    assert_eq!(30, series.len());
                    for pair in series.windows(2) {
                        assert!(pair[0].hamming_distance(&pair[1]) <= stride);
                    }
                }
            }
        }
        // Some windows were moved past the first simulated path.
        assert!(extended > 0);
    }

    #[test]
    fn dataset_is_deterministic() {
        let network = random_network(8, &mut StdRng::seed_from_u64(3)).unwrap();
        let setting = DatasetSetting {
            steps: 20,
            stride: 1,
            ntraj: 16,
            mode: UpdateMode::Synchronous,
        };
        let a = simulate_dataset(&network, "net", &setting, Some(0.5), 9).unwrap();
        let b = simulate_dataset(&network, "net", &setting, Some(0.5), 9).unwrap();
        assert_eq!(a.dataset, b.dataset);
        let c = simulate_dataset(&network, "other", &setting, Some(0.5), 9).unwrap();
        assert_ne!(a.dataset, c.dataset);
    }

    #[test]
    fn failed_trajectories_are_counted() {
        let network = delayed_fixed_point();
        let setting = DatasetSetting {
            steps: 3,
            stride: 1,
            ntraj: 0,
            mode: UpdateMode::Synchronous,
        };
        assert!(simulate_dataset(&network, "net", &setting, None, 0).is_err());
        // A network without variables cannot be simulated, but this does not abort the run.
        let empty = BooleanNetwork::try_new(vec![], vec![]).unwrap();
        let setting = DatasetSetting { ntraj: 3, ..setting };
        let outcome = simulate_dataset(&empty, "empty", &setting, None, 0).unwrap();
        assert_eq!(3, outcome.failures.len());
        assert_eq!(0, outcome.dataset.num_series());
    }
}
