mod catalog;
mod cli;
mod client;
mod context;
mod executor;
mod init;
mod progress;
mod run;
mod types;
mod user;

pub mod prelude {
    pub use crate::catalog::{Scenario, ScenarioCatalog};
    pub use crate::cli::{PaperloadCli, RunConfig};
    pub use crate::client::{JobClient, PollOutcome};
    pub use crate::context::RunnerContext;
    pub use crate::init::init;
    pub use crate::run::run;
    pub use crate::types::PaperloadResult;
}
