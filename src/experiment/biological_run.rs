use crate::biodivine_std::bitvector::BitVector;
use crate::data_format::{write_dataset, Layout};
use crate::dynamics::UpdateMode;
use crate::experiment::random_run::create_dir;
use crate::experiment::{
    simulate_dataset, ConfigurationSummary, DatasetSetting, Flags, Report, RunSummary,
};
use crate::trajectory::{SyncAttractorCatalog, CATALOG_LIMIT};
use crate::{BooleanNetwork, Error, NetworkBounds, State};
use log::{info, warn};
use std::path::PathBuf;

/// Configuration of the biological model experiment.
///
/// Every model is stored as `<models>/<id>/model.bnet`. Datasets of a model are written into
/// `<out>/<id>/`.
#[derive(Clone, Debug, PartialEq)]
pub struct BiologicalRunConfig {
    pub models: PathBuf,
    /// If set, only these model ids are used.
    pub allow: Option<Vec<String>>,
    /// Models with more variables are skipped.
    pub max_size: usize,
    pub steps: Vec<usize>,
    pub strides: Vec<usize>,
    pub ntraj: Vec<usize>,
    pub modes: Vec<UpdateMode>,
    pub transient_proportion: Option<f64>,
    pub seed: u64,
    pub out: PathBuf,
    pub report: PathBuf,
    pub layout: Layout,
}

impl Default for BiologicalRunConfig {
    fn default() -> Self {
        BiologicalRunConfig {
            models: PathBuf::from("models"),
            allow: None,
            max_size: 16,
            steps: vec![50],
            strides: vec![1],
            ntraj: vec![10],
            modes: vec![UpdateMode::Synchronous, UpdateMode::Asynchronous],
            transient_proportion: None,
            seed: 0,
            out: PathBuf::from("BN_data"),
            report: PathBuf::from("report.txt"),
            layout: Layout::TimeRows,
        }
    }
}

impl BiologicalRunConfig {
    pub const FLAGS: [&'static str; 12] = [
        "models",
        "allow",
        "max-size",
        "steps",
        "strides",
        "ntraj",
        "modes",
        "transient-proportion",
        "seed",
        "out",
        "report",
        "layout",
    ];

    /// Build the configuration from command line flags. Missing flags keep default values.
    pub fn from_flags(flags: &Flags) -> Result<BiologicalRunConfig, Error> {
        let mut config = BiologicalRunConfig::default();
        if let Some(models) = flags.get("models") {
            config.models = PathBuf::from(models);
        }
        config.allow = flags.list("allow")?;
        if let Some(max_size) = flags.value("max-size")? {
            config.max_size = max_size;
        }
        if let Some(steps) = flags.list("steps")? {
            config.steps = steps;
        }
        if let Some(strides) = flags.list("strides")? {
            config.strides = strides;
        }
        if let Some(ntraj) = flags.list("ntraj")? {
            config.ntraj = ntraj;
        }
        if let Some(modes) = flags.list("modes")? {
            config.modes = modes;
        }
        config.transient_proportion = flags.value("transient-proportion")?;
        if let Some(seed) = flags.value("seed")? {
            config.seed = seed;
        }
        if let Some(out) = flags.get("out") {
            config.out = PathBuf::from(out);
        }
        if let Some(report) = flags.get("report") {
            config.report = PathBuf::from(report);
        }
        if let Some(layout) = flags.value("layout")? {
            config.layout = layout;
        }
        config.validate()?;
        Ok(config)
    }

    /// Bounds of usable models: any size up to `max_size`, any number of parents.
    pub fn bounds(&self) -> Result<NetworkBounds, Error> {
        NetworkBounds::new(1, self.max_size, self.max_size)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.max_size > State::max_length() {
            return Err(Error::Configuration(format!(
                "Maximal model size {} exceeds the supported {} variables.",
                self.max_size,
                State::max_length()
            )));
        }
        self.bounds()?;
        if self.modes.is_empty() || self.settings().is_empty() {
            return Err(Error::Configuration(
                "No dataset settings configured.".to_string(),
            ));
        }
        for setting in self.settings() {
            setting.validate()?;
        }
        if let Some(p) = self.transient_proportion {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Configuration(format!(
                    "Transient proportion must be in [0, 1], got {}.",
                    p
                )));
            }
        }
        Ok(())
    }

    /// All combinations of the configured values.
    pub fn settings(&self) -> Vec<DatasetSetting> {
        let mut result = Vec::new();
        for mode in &self.modes {
            for steps in &self.steps {
                for stride in &self.strides {
                    for ntraj in &self.ntraj {
                        result.push(DatasetSetting {
                            steps: *steps,
                            stride: *stride,
                            ntraj: *ntraj,
                            mode: *mode,
                        });
                    }
                }
            }
        }
        result
    }

    /// Ids of all models in the model directory (sorted), restricted to the allow-list.
    pub fn model_ids(&self) -> Result<Vec<String>, Error> {
        let entries = std::fs::read_dir(&self.models).map_err(|e| Error::io(&self.models, e))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&self.models, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(id) = entry.file_name().to_str() {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        if let Some(allow) = &self.allow {
            for id in allow {
                if !ids.contains(id) {
                    warn!("Allowed model `{}` not found in `{}`.", id, self.models.display());
                }
            }
            ids.retain(|id| allow.contains(id));
        }
        Ok(ids)
    }
}

/// Run the biological model experiment: load every model, skip models that cannot be used
/// and write the datasets of the remaining ones into per-model directories.
pub fn run_biological(config: &BiologicalRunConfig) -> Result<RunSummary, Error> {
    config.validate()?;
    let bounds = config.bounds()?;
    create_dir(&config.out)?;

    let mut report = Report::new();
    let mut summary = RunSummary::default();
    for id in config.model_ids()? {
        let path = config.models.join(&id).join("model.bnet");
        if !path.is_file() {
            warn!("Skipping model `{}`: missing `{}`.", id, path.display());
            summary.skipped.push((id, "missing model.bnet".to_string()));
            continue;
        }
        let network = match BooleanNetwork::try_from_file(&path) {
            Ok(network) => network,
            Err(error) if !error.is_fatal() => {
                warn!("Skipping model `{}`: {}", id, error);
                summary.skipped.push((id, error.to_string()));
                continue;
            }
            Err(error) => return Err(error),
        };
        if let Err(error) = network.validate(&bounds) {
            info!("Skipping model `{}`: {}", id, error);
            summary.skipped.push((id, error.to_string()));
            continue;
        }
        info!("Loaded model `{}` with {} variables.", id, network.num_vars());

        let model_out = config.out.join(&id);
        create_dir(&model_out)?;
        let catalog = if network.num_vars() <= CATALOG_LIMIT {
            Some(SyncAttractorCatalog::compute(&network, CATALOG_LIMIT)?)
        } else {
            None
        };
        report.add_network(&id, &network, catalog.as_ref());

        for setting in config.settings() {
            let outcome = simulate_dataset(
                &network,
                &id,
                &setting,
                config.transient_proportion,
                config.seed,
            )?;
            let path = model_out.join(outcome.dataset.metadata().file_name());
            write_dataset(&path, &outcome.dataset, config.layout)?;
            info!(
                "Written `{}` ({} series, {} failed).",
                path.display(),
                outcome.dataset.num_series(),
                outcome.failures.len()
            );
            report.add_dataset(&outcome);
            summary
                .configurations
                .push(ConfigurationSummary::new(&id, &outcome));
        }
    }

    report.add_summary(&summary);
    report.write(&config.report)?;
    Ok(summary)
}
