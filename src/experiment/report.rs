use crate::distance::DistanceResult;
use crate::experiment::DatasetOutcome;
use crate::trajectory::{distinct_attractors, SyncAttractorCatalog};
use crate::{BooleanNetwork, Error};
use std::fmt::{Display, Formatter, Write as FmtWrite};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Success counts of one (network, dataset setting) pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigurationSummary {
    pub network_id: String,
    pub dataset: String,
    pub succeeded: usize,
    pub failed: usize,
    pub wrapped: usize,
}

/// Everything a run produced, configuration by configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub configurations: Vec<ConfigurationSummary>,
    /// Models that were not used, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl ConfigurationSummary {
    pub fn new(network_id: &str, outcome: &DatasetOutcome) -> ConfigurationSummary {
        ConfigurationSummary {
            network_id: network_id.to_string(),
            dataset: outcome.dataset.metadata().file_name(),
            succeeded: outcome.dataset.num_series(),
            failed: outcome.failures.len(),
            wrapped: outcome.wrapped,
        }
    }
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.configurations.iter().map(|it| it.succeeded).sum()
    }

    pub fn failed(&self) -> usize {
        self.configurations.iter().map(|it| it.failed).sum()
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for c in &self.configurations {
            writeln!(
                f,
                "{}\t{}\tsucceeded={}\tfailed={}\twrapped={}",
                c.network_id, c.dataset, c.succeeded, c.failed, c.wrapped
            )?;
        }
        for (model, reason) in &self.skipped {
            writeln!(f, "skipped\t{}\t{}", model, reason)?;
        }
        write!(
            f,
            "total\tsucceeded={}\tfailed={}",
            self.succeeded(),
            self.failed()
        )
    }
}

/// The `report.txt` artifact: network structures, attractor analysis and the run summary.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    text: String,
}

impl Report {
    pub fn new() -> Report {
        Report::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Describe the structure of a network and its synchronous attractors (if known).
    pub fn add_network(
        &mut self,
        id: &str,
        network: &BooleanNetwork,
        catalog: Option<&SyncAttractorCatalog>,
    ) {
        // Writing into a `String` cannot fail.
        let _ = writeln!(self.text, "# network {} ({} variables)", id, network.num_vars());
        self.text.push_str(&network.to_string());
        match catalog {
            Some(catalog) => {
                let lengths = catalog
                    .lengths()
                    .iter()
                    .map(|it| it.to_string())
                    .collect::<Vec<_>>();
                let _ = writeln!(
                    self.text,
                    "sync attractors: {} (lengths {})",
                    catalog.len(),
                    lengths.join(", ")
                );
            }
            None => self.text.push_str("sync attractors: not enumerated\n"),
        }
    }

    /// Describe the trajectories of one dataset.
    pub fn add_dataset(&mut self, outcome: &DatasetOutcome) {
        let _ = writeln!(self.text, "## {}", outcome.dataset.metadata().file_name());
        let _ = writeln!(
            self.text,
            "trajectories: {} succeeded, {} failed; distinct attractors: {}; wrapped samples: {}",
            outcome.dataset.num_series(),
            outcome.failures.len(),
            distinct_attractors(outcome.trajectories.iter().map(|(_, it)| it)),
            outcome.wrapped
        );
        for (i, trajectory) in &outcome.trajectories {
            let _ = writeln!(self.text, "trajectory {}: {}", i, trajectory.stats());
        }
        for (i, error) in &outcome.failures {
            let _ = writeln!(self.text, "failed {} [{}]: {}", i, error.class_name(), error);
        }
    }

    pub fn add_summary(&mut self, summary: &RunSummary) {
        let _ = writeln!(self.text, "# summary\n{}", summary);
    }

    /// Write the report into a new file at `path`.
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(self.text.as_bytes())
            .map_err(|e| Error::io(path, e))?;
        writer.flush().map_err(|e| Error::io(path, e))
    }
}

/// Append distance results to the report at `path` (creating it if necessary).
pub fn append_distances(path: &Path, results: &[DistanceResult]) -> Result<(), Error> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for result in results {
        writeln!(writer, "{}", result).map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::{append_distances, Report, RunSummary};
    use crate::_test_networks::mutual_negation;
    use crate::distance::{compute_all, DistanceMetric};
    use crate::dynamics::UpdateMode;
    use crate::experiment::{simulate_dataset, ConfigurationSummary, DatasetSetting};
    use crate::trajectory::{SyncAttractorCatalog, CATALOG_LIMIT};
    use crate::Error;

    #[test]
    fn report_content() {
        let network = mutual_negation();
        let catalog = SyncAttractorCatalog::compute(&network, CATALOG_LIMIT).unwrap();
        let setting = DatasetSetting {
            steps: 4,
            stride: 1,
            ntraj: 3,
            mode: UpdateMode::Synchronous,
        };
        let outcome = simulate_dataset(&network, "mutual", &setting, None, 0).unwrap();
        let mut report = Report::new();
        report.add_network("mutual", &network, Some(&catalog));
        report.add_dataset(&outcome);
        let summary = RunSummary {
            configurations: vec![ConfigurationSummary::new("mutual", &outcome)],
            skipped: vec![("big".to_string(), "too many variables".to_string())],
        };
        report.add_summary(&summary);

        let text = report.as_str();
        assert!(text.starts_with("# network mutual (2 variables)\nX0 <- X1 : 10\n"));
        assert!(text.contains("sync attractors: 3 (lengths 1, 1, 2)"));
        assert!(text.contains("## nodes2_steps4_sample1_ntraj3_sync.data"));
        assert!(text.contains("trajectory 2: length="));
        assert!(text.contains("skipped\tbig\ttoo many variables"));
        assert!(text.ends_with("total\tsucceeded=3\tfailed=0\n"));
    }

    #[test]
    fn failed_trajectories_keep_their_index() {
        let setting = DatasetSetting {
            steps: 4,
            stride: 1,
            ntraj: 3,
            mode: UpdateMode::Synchronous,
        };
        let mut outcome = simulate_dataset(&mutual_negation(), "mutual", &setting, None, 0).unwrap();
        outcome.trajectories.remove(1);
        outcome
            .failures
            .push((1, Error::Simulation("lost".to_string())));
        let mut report = Report::new();
        report.add_dataset(&outcome);
        let text = report.as_str();
        assert!(text.contains("trajectory 0: length="));
        assert!(!text.contains("trajectory 1: "));
        assert!(text.contains("trajectory 2: length="));
        assert!(text.contains("failed 1 [SimulationError]: Simulation error: lost"));
    }

    #[test]
    fn report_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let mut report = Report::new();
        report.add_summary(&RunSummary::default());
        report.write(&path).unwrap();
        let graph = mutual_negation().as_graph().clone();
        let results = compute_all("a", &graph, "b", &graph, &DistanceMetric::ALL).unwrap();
        append_distances(&path, &results).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# summary\n"));
        assert!(content.ends_with("distance\ta\tb\tjaccard\t0.000000\n"));
        assert!(report.write(&dir.path().join("missing").join("report.txt")).is_err());
    }
}
