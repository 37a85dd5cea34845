/*
   Generates random Boolean networks of the configured sizes, simulates them and writes one
   `.data` file per dataset setting, together with the `.bnet` model of every network and
   a human readable report.

   Usage: generate-random [--nodes 5,8,16 | --min-nodes a --max-nodes b] [--min-size 5] [--max-size 16]
       [--max-parents 3] [--steps 10,20,30] [--strides 1,2,3] [--ntraj 16,32,64]
       [--modes sync,async] [--sweep one-at-a-time|grid]
       [--transient-proportion p] [--bias p] [--family table|and-or] [--self-regulation bool]
       [--seed n] [--out BN_data] [--report report.txt] [--layout time-rows|series-columns]

   Set `RUST_LOG` to change the log level (default `info`).
*/

use bn_datagen::experiment::{run_random, Flags, RandomRunConfig};
use env_logger::Env;
use log::error;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Flags::parse(std::env::args().skip(1), &RandomRunConfig::FLAGS)
        .and_then(|flags| RandomRunConfig::from_flags(&flags));
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Known flags: --{}", RandomRunConfig::FLAGS.join(", --"));
            std::process::exit(1);
        }
    };

    match run_random(&config) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            error!("Random run failed: {}", e);
            std::process::exit(1);
        }
    }
}
