use crate::data_format::{write_dataset, Layout};
use crate::dynamics::{network_seed, UpdateMode};
use crate::experiment::{
    simulate_dataset, ConfigurationSummary, DatasetSetting, Flags, Report, RunSummary,
};
use crate::random_network::{FunctionFamily, FunctionSampler};
use crate::trajectory::{SyncAttractorCatalog, CATALOG_LIMIT};
use crate::{Error, NetworkBounds};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How the dataset settings of a random run are combined.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Sweep {
    /// Vary one of steps, stride and trajectory count at a time, keeping the others at
    /// their baseline values.
    OneAtATime,
    /// All combinations.
    Grid,
}

impl FromStr for Sweep {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "one-at-a-time" => Ok(Sweep::OneAtATime),
            "grid" => Ok(Sweep::Grid),
            _ => Err(Error::Configuration(format!(
                "Unknown sweep `{}` (expected `one-at-a-time` or `grid`).",
                value
            ))),
        }
    }
}

/// Configuration of the random network experiment.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomRunConfig {
    /// One random network is generated for every size.
    pub nodes: Vec<usize>,
    /// Every entry of `nodes` must lie in `min_size..=max_size`.
    pub min_size: usize,
    pub max_size: usize,
    pub max_parents: usize,
    pub steps: Vec<usize>,
    pub strides: Vec<usize>,
    pub ntraj: Vec<usize>,
    pub modes: Vec<UpdateMode>,
    pub transient_proportion: Option<f64>,
    pub family: FunctionFamily,
    pub allow_self_regulation: bool,
    pub sweep: Sweep,
    pub seed: u64,
    pub out: PathBuf,
    pub report: PathBuf,
    pub layout: Layout,
}

impl Default for RandomRunConfig {
    fn default() -> Self {
        RandomRunConfig {
            nodes: vec![5, 8, 16],
            min_size: NetworkBounds::default().min_vars(),
            max_size: NetworkBounds::default().max_vars(),
            max_parents: 3,
            steps: vec![10, 20, 30],
            strides: vec![1, 2, 3],
            ntraj: vec![16, 32, 64],
            modes: vec![UpdateMode::Synchronous, UpdateMode::Asynchronous],
            transient_proportion: None,
            family: FunctionFamily::default(),
            allow_self_regulation: false,
            sweep: Sweep::OneAtATime,
            seed: 0,
            out: PathBuf::from("BN_data"),
            report: PathBuf::from("report.txt"),
            layout: Layout::TimeRows,
        }
    }
}

impl RandomRunConfig {
    pub const FLAGS: [&'static str; 19] = [
        "nodes",
        "min-nodes",
        "max-nodes",
        "min-size",
        "max-size",
        "max-parents",
        "steps",
        "strides",
        "ntraj",
        "modes",
        "transient-proportion",
        "bias",
        "family",
        "self-regulation",
        "sweep",
        "seed",
        "out",
        "report",
        "layout",
    ];

    /// Build the configuration from command line flags. Missing flags keep default values.
    pub fn from_flags(flags: &Flags) -> Result<RandomRunConfig, Error> {
        let mut config = RandomRunConfig::default();
        if let Some(min_size) = flags.value("min-size")? {
            config.min_size = min_size;
        }
        if let Some(max_size) = flags.value("max-size")? {
            config.max_size = max_size;
        }
        if let Some(nodes) = flags.list("nodes")? {
            config.nodes = nodes;
        }
        let min_nodes: Option<usize> = flags.value("min-nodes")?;
        let max_nodes: Option<usize> = flags.value("max-nodes")?;
        if min_nodes.is_some() || max_nodes.is_some() {
            if flags.get("nodes").is_some() {
                return Err(Error::Configuration(
                    "Use either `--nodes` or `--min-nodes`/`--max-nodes`.".to_string(),
                ));
            }
            let min = min_nodes.unwrap_or(config.min_size);
            let max = max_nodes.unwrap_or(config.max_size);
            config.nodes = (min..=max).collect();
        }
        if let Some(max_parents) = flags.value("max-parents")? {
            config.max_parents = max_parents;
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
        let bias: Option<f64> = flags.value("bias")?;
        match flags.get("family").unwrap_or("table") {
            "table" => {
                config.family = FunctionFamily::Table {
                    bias: bias.unwrap_or(0.5),
                }
            }
            "and-or" if bias.is_none() => config.family = FunctionFamily::AndOr,
            "and-or" => {
                return Err(Error::Configuration(
                    "`--bias` only applies to the `table` family.".to_string(),
                ))
            }
            other => {
                return Err(Error::Configuration(format!(
                    "Unknown function family `{}` (expected `table` or `and-or`).",
                    other
                )))
            }
        }
        if let Some(allow) = flags.value("self-regulation")? {
            config.allow_self_regulation = allow;
        }
        if let Some(sweep) = flags.value("sweep")? {
            config.sweep = sweep;
        }
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

    /// The function sampler used to generate the networks.
    pub fn sampler(&self) -> Result<FunctionSampler, Error> {
        Ok(FunctionSampler::new(self.max_parents, self.family)?
            .with_self_regulation(self.allow_self_regulation))
    }

    /// The structural bounds every generated network satisfies.
    pub fn bounds(&self) -> Result<NetworkBounds, Error> {
        NetworkBounds::new(self.min_size, self.max_size, self.max_parents)
    }

    pub fn validate(&self) -> Result<(), Error> {
        for (name, list) in [
            ("nodes", &self.nodes),
            ("steps", &self.steps),
            ("strides", &self.strides),
            ("ntraj", &self.ntraj),
        ] {
            if list.is_empty() {
                return Err(Error::Configuration(format!("No values of `{}`.", name)));
            }
        }
        if self.modes.is_empty() {
            return Err(Error::Configuration("No update modes.".to_string()));
        }
        let bounds = self.bounds()?;
        if let Some(n) = self.nodes.iter().find(|n| !bounds.admits_size(**n)) {
            return Err(Error::Configuration(format!(
                "Network size {} is outside of {}..={}.",
                n,
                bounds.min_vars(),
                bounds.max_vars()
            )));
        }
        self.sampler()?;
        if !self.allow_self_regulation && self.nodes.contains(&1) {
            return Err(Error::Configuration(
                "Networks with one variable need self-regulation.".to_string(),
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

    /// All dataset settings of one network, without duplicates.
    ///
    /// With `Sweep::OneAtATime`, the baseline is the middle value of `steps` and `ntraj` and
    /// the first (i.e. densest) stride.
    pub fn settings(&self) -> Vec<DatasetSetting> {
        let mut result: Vec<DatasetSetting> = Vec::new();
        let mut push = |setting: DatasetSetting| {
            if !result.contains(&setting) {
                result.push(setting);
            }
        };
        for mode in &self.modes {
            match self.sweep {
                Sweep::Grid => {
                    for steps in &self.steps {
                        for stride in &self.strides {
                            for ntraj in &self.ntraj {
                                push(DatasetSetting {
                                    steps: *steps,
                                    stride: *stride,
                                    ntraj: *ntraj,
                                    mode: *mode,
                                });
                            }
                        }
                    }
                }
                Sweep::OneAtATime => {
                    let (Some(steps), Some(stride), Some(ntraj)) = (
                        self.steps.get(self.steps.len() / 2),
                        self.strides.first(),
                        self.ntraj.get(self.ntraj.len() / 2),
                    ) else {
                        continue;
                    };
                    let baseline = DatasetSetting {
                        steps: *steps,
                        stride: *stride,
                        ntraj: *ntraj,
                        mode: *mode,
                    };
                    for steps in &self.steps {
                        push(DatasetSetting {
                            steps: *steps,
                            ..baseline
                        });
                    }
                    for stride in &self.strides {
                        push(DatasetSetting {
                            stride: *stride,
                            ..baseline
                        });
                    }
                    for ntraj in &self.ntraj {
                        push(DatasetSetting {
                            ntraj: *ntraj,
                            ..baseline
                        });
                    }
                }
            }
        }
        result
    }
}

/// Run the random network experiment: generate one network per size, simulate all dataset
/// settings and write the datasets, the networks (as `.bnet`) and the report.
pub fn run_random(config: &RandomRunConfig) -> Result<RunSummary, Error> {
    config.validate()?;
    let sampler = config.sampler()?;
    let bounds = config.bounds()?;
    create_dir(&config.out)?;

    let mut report = Report::new();
    let mut summary = RunSummary::default();
    for num_vars in &config.nodes {
        let network_id = format!("nodes{}", num_vars);
        let mut rng = StdRng::seed_from_u64(network_seed(config.seed, &network_id));
        let network = sampler.random_network(*num_vars, &mut rng)?;
        network.validate(&bounds)?;
        info!(
            "Generated network `{}` with {} regulations.",
            network_id,
            network.as_graph().num_regulations()
        );

        let bnet_path = config.out.join(format!("{}.bnet", network_id));
        let bnet = network.to_bnet(false).map_err(Error::Configuration)?;
        std::fs::write(&bnet_path, bnet).map_err(|e| Error::io(&bnet_path, e))?;

        let catalog = if *num_vars <= CATALOG_LIMIT {
            Some(SyncAttractorCatalog::compute(&network, CATALOG_LIMIT)?)
        } else {
            None
        };
        report.add_network(&network_id, &network, catalog.as_ref());

        for setting in config.settings() {
            let outcome = simulate_dataset(
                &network,
                &network_id,
                &setting,
                config.transient_proportion,
                config.seed,
            )?;
            if let Some(catalog) = &catalog {
                for (_, trajectory) in &outcome.trajectories {
                    if trajectory.mode() == UpdateMode::Synchronous {
                        if let Err(error) = catalog.cross_check(trajectory) {
                            warn!("Attractor cross-check of `{}` failed: {}", network_id, error);
                        }
                    }
                }
            }
            let path = config.out.join(outcome.dataset.metadata().file_name());
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
                .push(ConfigurationSummary::new(&network_id, &outcome));
        }
    }

    report.add_summary(&summary);
    report.write(&config.report)?;
    Ok(summary)
}

/// **(internal)** Create the output directory (and its parents).
pub(super) fn create_dir(path: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}
