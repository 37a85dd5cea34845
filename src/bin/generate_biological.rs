/*
   Simulates curated biological models stored as `<models>/<id>/model.bnet` and writes their
   datasets into `<out>/<id>/`. Models that cannot be parsed or that exceed `--max-size` are
   skipped and listed in the summary.

   Usage: generate-biological [--models models] [--allow id1,id2] [--max-size 16]
       [--steps 50] [--strides 1] [--ntraj 10] [--modes sync,async] [--transient-proportion p]
       [--seed n] [--out BN_data] [--report report.txt] [--layout time-rows|series-columns]
*/

use bn_datagen::experiment::{run_biological, BiologicalRunConfig, Flags};
use env_logger::Env;
use log::error;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Flags::parse(std::env::args().skip(1), &BiologicalRunConfig::FLAGS)
        .and_then(|flags| BiologicalRunConfig::from_flags(&flags));
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Known flags: --{}", BiologicalRunConfig::FLAGS.join(", --"));
            std::process::exit(1);
        }
    };

    match run_biological(&config) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            error!(
                "Biological run over `{}` failed: {}",
                config.models.display(),
                e
            );
            std::process::exit(1);
        }
    }
}
