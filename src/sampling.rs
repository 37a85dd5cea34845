//! Sampling of trajectories into fixed-length time-series.
//!
//! Samples are taken every `stride` steps of the trajectory, always on the grid
//! `0, stride, 2 * stride, ...`. By default, the series starts with the initial state. When
//! a proportion of transient samples is requested, the window is shifted along the grid so
//! that the requested number of samples falls before the attractor.
//!
//! A synchronous trajectory is virtually unrolled: a sample past its last state reuses the
//! states of the detected cycle. Such samples are counted as wrapped. An asynchronous path
//! has no such continuation, so it has to be long enough for the whole window (see
//! `TrajectorySimulator::extend`).

use crate::biodivine_std::bitvector::BitVector;
use crate::dynamics::UpdateMode;
use crate::trajectory::{StateLabel, Trajectory};
use crate::{Error, State};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::str::FromStr;

/// Parameters of the sampling: `length` samples, `stride` steps apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
    stride: usize,
    length: usize,
    proportion_transient: Option<f64>,
}

/// A fixed-length time-series sampled from one `Trajectory`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampledSeries {
    states: Vec<State>,
    indices: Vec<usize>,
    sources: Vec<usize>,
    labels: Vec<StateLabel>,
    wrapped: usize,
}

impl Sampler {
    pub fn new(
        stride: usize,
        length: usize,
        proportion_transient: Option<f64>,
    ) -> Result<Sampler, Error> {
        if stride == 0 {
            return Err(Error::Configuration("Stride must be positive.".to_string()));
        }
        if length == 0 {
            return Err(Error::Configuration(
                "Series length must be positive.".to_string(),
            ));
        }
        if let Some(p) = proportion_transient {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Configuration(format!(
                    "Transient proportion must be in [0, 1], got {}.",
                    p
                )));
            }
        }
        Ok(Sampler {
            stride,
            length,
            proportion_transient,
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn proportion_transient(&self) -> Option<f64> {
        self.proportion_transient
    }

    /// Number of trajectory steps needed to take all samples from a window starting at zero.
    pub fn required_steps(&self) -> usize {
        (self.length - 1) * self.stride
    }

    /// The (virtual) index of the first sample in `trajectory`.
    pub fn window_start(&self, trajectory: &Trajectory) -> usize {
        let (Some(p), Some(span)) = (self.proportion_transient, trajectory.attractor()) else {
            return 0;
        };
        let wanted = (p * self.length as f64).round() as usize;
        // Grid points strictly before the attractor.
        let available = (span.start + self.stride - 1) / self.stride;
        if available < wanted {
            debug!(
                "Only {} transient samples available, {} requested.",
                available, wanted
            );
        }
        self.stride * available.saturating_sub(wanted)
    }

    /// Sample `trajectory`, starting at `window_start`.
    ///
    /// Fails with `Error::Simulation` when a sample lies past the end of an asynchronous
    /// trajectory or of a trajectory without an attractor.
    pub fn sample(&self, trajectory: &Trajectory) -> Result<SampledSeries, Error> {
        self.sample_at(trajectory, self.window_start(trajectory))
    }

    /// Sample `trajectory` with the first sample at step `start` (a multiple of the stride).
    pub fn sample_at(&self, trajectory: &Trajectory, start: usize) -> Result<SampledSeries, Error> {
        if trajectory.is_empty() {
            return Err(Error::Simulation("Cannot sample an empty trajectory.".to_string()));
        }
        if start % self.stride != 0 {
            return Err(Error::Configuration(format!(
                "Window start {} is not a multiple of the stride {}.",
                start, self.stride
            )));
        }
        let mut series = SampledSeries {
            states: Vec::with_capacity(self.length),
            indices: Vec::with_capacity(self.length),
            sources: Vec::with_capacity(self.length),
            labels: Vec::with_capacity(self.length),
            wrapped: 0,
        };
        for i in 0..self.length {
            let index = start + i * self.stride;
            let source = if index < trajectory.len() {
                index
            } else if trajectory.mode() == UpdateMode::Asynchronous {
                return Err(Error::Simulation(format!(
                    "Sample at step {} is past the end of an asynchronous trajectory of length {}.",
                    index,
                    trajectory.len()
                )));
            } else if let Some(span) = trajectory.attractor() {
                series.wrapped += 1;
                span.start + (index - span.start) % span.length
            } else {
                return Err(Error::Simulation(format!(
                    "Sample at step {} is past the end of a trajectory of length {} without an attractor.",
                    index,
                    trajectory.len()
                )));
            };
            series.states.push(trajectory.states()[source]);
            series.indices.push(index);
            series.sources.push(source);
            series.labels.push(trajectory.labels()[source]);
        }
        if series.wrapped > 0 {
            warn!(
                "{} of {} samples wrapped around an attractor of length {}.",
                series.wrapped,
                self.length,
                trajectory.attractor_length()
            );
        }
        Ok(series)
    }
}

/// Sample `trajectory` with the given parameters. See `Sampler`.
pub fn sample(
    trajectory: &Trajectory,
    stride: usize,
    length: usize,
    proportion_transient: Option<f64>,
) -> Result<SampledSeries, Error> {
    Sampler::new(stride, length, proportion_transient)?.sample(trajectory)
}

impl SampledSeries {
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Step of each sample in the unrolled trajectory.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Position of each sample in the actual trajectory.
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    pub fn labels(&self) -> &[StateLabel] {
        &self.labels
    }

    /// Number of samples that reused cycle states past the end of the trajectory.
    pub fn wrapped(&self) -> usize {
        self.wrapped
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn transient_samples(&self) -> usize {
        self.labels
            .iter()
            .filter(|it| **it == StateLabel::Transient)
            .count()
    }

    pub fn into_states(self) -> Vec<State> {
        self.states
    }
}

lazy_static! {
    static ref DATASET_NAME: Regex =
        Regex::new(r"^nodes(\d+)_steps(\d+)_sample(\d+)_ntraj(\d+)_(sync|async)\.data$").unwrap();
}

/// The configuration a dataset was generated with. It determines the dataset file name.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DatasetMetadata {
    pub num_vars: usize,
    pub steps: usize,
    pub stride: usize,
    pub ntraj: usize,
    pub mode: UpdateMode,
}

impl DatasetMetadata {
    /// `nodes<N>_steps<S>_sample<k>_ntraj<T>_<mode>.data`
    pub fn file_name(&self) -> String {
        format!(
            "nodes{}_steps{}_sample{}_ntraj{}_{}.data",
            self.num_vars, self.steps, self.stride, self.ntraj, self.mode
        )
    }

    /// Recover the metadata from a dataset file name.
    pub fn from_file_name(name: &str) -> Result<DatasetMetadata, String> {
        let captures = DATASET_NAME
            .captures(name)
            .ok_or_else(|| format!("`{}` is not a dataset file name.", name))?;
        let number = |i: usize| -> Result<usize, String> {
            captures[i]
                .parse::<usize>()
                .map_err(|e| format!("Invalid number in `{}`: {}", name, e))
        };
        Ok(DatasetMetadata {
            num_vars: number(1)?,
            steps: number(2)?,
            stride: number(3)?,
            ntraj: number(4)?,
            mode: UpdateMode::from_str(&captures[5]).map_err(|e| e.to_string())?,
        })
    }
}

/// A collection of equally long time-series of one network.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dataset {
    metadata: DatasetMetadata,
    variables: Vec<String>,
    series: Vec<Vec<State>>,
}

impl Dataset {
    /// An empty dataset over the given variables.
    pub fn new(metadata: DatasetMetadata, variables: Vec<String>) -> Result<Dataset, Error> {
        if variables.len() != metadata.num_vars {
            return Err(Error::Configuration(format!(
                "Dataset of {} variables got {} variable names.",
                metadata.num_vars,
                variables.len()
            )));
        }
        Ok(Dataset {
            metadata,
            variables,
            series: Vec::new(),
        })
    }

    /// Append one time-series. All series must have `metadata.steps` states of the right length.
    pub fn push(&mut self, series: Vec<State>) -> Result<(), Error> {
        if series.len() != self.metadata.steps {
            return Err(Error::Configuration(format!(
                "Expected a series of {} states, got {}.",
                self.metadata.steps,
                series.len()
            )));
        }
        if let Some(state) = series.iter().find(|s| s.len() != self.metadata.num_vars) {
            return Err(Error::Configuration(format!(
                "State {} does not have {} values.",
                state, self.metadata.num_vars
            )));
        }
        self.series.push(series);
        Ok(())
    }

    /// The file name of this dataset without the `.data` extension.
    pub fn name(&self) -> String {
        self.metadata
            .file_name()
            .trim_end_matches(".data")
            .to_string()
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn series(&self) -> &[Vec<State>] {
        &self.series
    }

    /// The number of series actually present (can be lower than `metadata.ntraj` when some
    /// trajectories failed).
    pub fn num_series(&self) -> usize {
        self.series.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{sample, Dataset, DatasetMetadata, Sampler};
    use crate::_test_networks::{delayed_fixed_point, mutual_negation, negative_ring};
    use crate::biodivine_std::bitvector::BitVector;
    use crate::dynamics::UpdateMode;
    use crate::trajectory::{simulate, StateLabel};
    use crate::{Error, State};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn sample_without_wrap() {
        let network = negative_ring();
        let initial = State::from(vec![true, false, false, false, false]);
        let trajectory = simulate(&network, initial, UpdateMode::Synchronous, 9, 0).unwrap();
        let series = sample(&trajectory, 3, 4, None).unwrap();
        assert_eq!(vec![0, 3, 6, 9], series.indices());
        assert_eq!(series.indices(), series.sources());
        assert_eq!(0, series.wrapped());
        assert_eq!(trajectory.states()[6], series.states()[2]);
    }

    #[test]
    fn sample_wraps_around_attractor() {
        let network = mutual_negation();
        let trajectory = simulate(
            &network,
            State::from(vec![false, false]),
            UpdateMode::Synchronous,
            10,
            0,
        )
        .unwrap();
        // The trajectory is just `00, 11`.
        let series = sample(&trajectory, 1, 5, None).unwrap();
        assert_eq!(vec![0, 1, 2, 3, 4], series.indices());
        assert_eq!(vec![0, 1, 0, 1, 0], series.sources());
        assert_eq!(3, series.wrapped());
        let series = sample(&trajectory, 2, 3, None).unwrap();
        assert!(series.states().iter().all(|s| s.ones().is_empty()));
    }

    #[test]
    fn sample_past_end_without_attractor() {
        let network = negative_ring();
        let initial = State::from(vec![true, false, false, false, false]);
        let trajectory = simulate(&network, initial, UpdateMode::Synchronous, 4, 0).unwrap();
        assert!(matches!(
            sample(&trajectory, 2, 4, None),
            Err(Error::Simulation(_))
        ));
    }

    #[test]
    fn asynchronous_samples_never_wrap() {
        let network = delayed_fixed_point();
        let initial = State::from(vec![false, true, false]);
        let trajectory = simulate(&network, initial, UpdateMode::Asynchronous, 3, 1).unwrap();
        assert_eq!(4, trajectory.len());
        let sampler = Sampler::new(1, 4, None).unwrap();
        assert_eq!(4, sampler.sample_at(&trajectory, 0).unwrap().len());
        assert!(matches!(
            sampler.sample_at(&trajectory, 2),
            Err(Error::Simulation(_))
        ));
        assert!(matches!(
            Sampler::new(2, 2, None).unwrap().sample_at(&trajectory, 1),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn sample_transient_proportion() {
        let network = delayed_fixed_point();
        let initial = State::from(vec![false, true, false]);
        let trajectory = simulate(&network, initial, UpdateMode::Synchronous, 10, 0).unwrap();
        // Two transient states, then the fixed point at step 2.
        let series = sample(&trajectory, 1, 4, Some(0.25)).unwrap();
        assert_eq!(vec![1, 2, 3, 4], series.indices());
        assert_eq!(1, series.transient_samples());
        let series = sample(&trajectory, 1, 4, Some(0.0)).unwrap();
        assert_eq!(vec![2, 3, 4, 5], series.indices());
        assert!(series.labels().iter().all(|it| *it == StateLabel::Attractor));
        // Not enough transient states for the request.
        let series = sample(&trajectory, 1, 4, Some(1.0)).unwrap();
        assert_eq!(0, series.indices()[0]);
        assert_eq!(2, series.transient_samples());
    }

    #[test]
    fn invalid_sampler() {
        assert!(Sampler::new(0, 10, None).is_err());
        assert!(Sampler::new(1, 0, None).is_err());
        assert!(Sampler::new(1, 10, Some(1.5)).is_err());
        assert_eq!(18, Sampler::new(2, 10, None).unwrap().required_steps());
    }

    #[test]
    fn dataset_file_names() {
        let metadata = DatasetMetadata {
            num_vars: 8,
            steps: 20,
            stride: 2,
            ntraj: 32,
            mode: UpdateMode::Asynchronous,
        };
        assert_eq!("nodes8_steps20_sample2_ntraj32_async.data", metadata.file_name());
        assert_eq!(
            metadata,
            DatasetMetadata::from_file_name(&metadata.file_name()).unwrap()
        );
        assert!(DatasetMetadata::from_file_name("nodes8_steps20.data").is_err());
        assert!(DatasetMetadata::from_file_name("nodes8_steps20_sample2_ntraj32_both.data").is_err());
    }

    #[test]
    fn dataset_rejects_bad_series() {
        let metadata = DatasetMetadata {
            num_vars: 2,
            steps: 2,
            stride: 1,
            ntraj: 1,
            mode: UpdateMode::Synchronous,
        };
        let names = vec!["X0".to_string(), "X1".to_string()];
        assert!(Dataset::new(metadata, vec!["X0".to_string()]).is_err());
        let mut dataset = Dataset::new(metadata, names).unwrap();
        assert!(dataset.push(vec![State::empty(2)]).is_err());
        assert!(dataset.push(vec![State::empty(2), State::empty(3)]).is_err());
        dataset.push(vec![State::empty(2), State::empty(2)]).unwrap();
        assert_eq!(1, dataset.num_series());
        assert_eq!("nodes2_steps2_sample1_ntraj1_sync", dataset.name());
    }

    proptest! {
        #[test]
        fn samples_are_evenly_spaced(
            mask in 0u64..32,
            stride in 1usize..5,
            length in 1usize..30,
            proportion in proptest::option::of(0.0f64..=1.0),
        ) {
            let network = negative_ring();
            let initial = State::from_mask(5, mask);
            let trajectory = simulate(&network, initial, UpdateMode::Synchronous, 20, 0).unwrap();
            // Every state of this network lies on a cycle of length at most 10.
            prop_assert!(trajectory.attractor().is_some());
            let series = sample(&trajectory, stride, length, proportion).unwrap();
            prop_assert_eq!(length, series.len());
            prop_assert_eq!(0, series.indices()[0] % stride);
            for window in series.indices().windows(2) {
                prop_assert_eq!(window[0] + stride, window[1]);
            }
        }
    }
}
