/*
   Compares an inferred network structure (`.sif` or `.bnet`) with the ground-truth `.bnet`
   model and prints one `distance` line per metric. With `--report`, the lines are also
   appended to the given report file.

   Usage: score-structure --truth model.bnet --inferred inferred.sif
       [--metric shd|jaccard|all] [--report report.txt]
*/

use bn_datagen::distance::DistanceMetric;
use bn_datagen::experiment::{append_distances, score_structure, Flags};
use bn_datagen::Error;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

const FLAGS: [&str; 4] = ["truth", "inferred", "metric", "report"];

fn run() -> Result<(), Error> {
    let flags = Flags::parse(std::env::args().skip(1), &FLAGS)?;
    let truth = flags
        .get("truth")
        .map(PathBuf::from)
        .ok_or_else(|| Error::Configuration("Missing `--truth`.".to_string()))?;
    let inferred = flags
        .get("inferred")
        .map(PathBuf::from)
        .ok_or_else(|| Error::Configuration("Missing `--inferred`.".to_string()))?;
    let metrics = match flags.get("metric") {
        None | Some("all") => DistanceMetric::ALL.to_vec(),
        Some(metric) => vec![metric.parse::<DistanceMetric>()?],
    };

    let results = score_structure(&truth, &inferred, &metrics)?;
    for result in &results {
        println!("{}", result);
    }
    if let Some(report) = flags.get("report") {
        let report = PathBuf::from(report);
        append_distances(&report, &results)?;
        info!("Appended {} results to `{}`.", results.len(), report.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
