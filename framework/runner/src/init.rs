use clap::Parser;

use crate::cli::{PaperloadCli, RunConfig};

/// Initialise logging and parse the command line into a [RunConfig].
pub fn init() -> RunConfig {
    env_logger::init();

    RunConfig::from(PaperloadCli::parse())
}
