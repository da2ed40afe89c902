use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct PaperloadCli {
    /// Base URL of the document-processing service to drive load against
    #[clap(short, long, default_value = "http://localhost:8080/api/pdf")]
    pub base_url: String,

    /// API key sent with every request in the `X-API-Key` header
    #[clap(short, long, default_value = "admin-key-12345")]
    pub api_key: String,

    /// The number of concurrent virtual users to run
    #[clap(short, long, default_value = "10")]
    pub users: usize,

    /// The number of seconds to run the load test for
    #[clap(short, long, default_value = "60")]
    pub duration: u64,

    /// Directory holding the fixture files referenced by scenarios
    #[clap(long, default_value = "./test_files")]
    pub fixture_dir: PathBuf,

    /// Directory where the CSV and Markdown reports are written
    #[clap(long, default_value = "./results")]
    pub results_dir: PathBuf,

    /// Timeout for one job submission request, in seconds
    #[clap(long, default_value = "300")]
    pub request_timeout: u64,

    /// Timeout for one status poll request, in seconds
    #[clap(long, default_value = "10")]
    pub poll_timeout: u64,

    /// How long to keep polling one job for a terminal status before giving up, in seconds
    #[clap(long, default_value = "300")]
    pub poll_max_wait: u64,

    /// Seed for scenario selection and jitter.
    ///
    /// Each virtual user derives its own random stream from this seed and its user index, so a
    /// seeded run picks the same scenario sequence every time. Leave unset for entropy-seeded
    /// runs.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}

/// Resolved configuration for one run, passed explicitly to every component.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub api_key: String,
    pub users: usize,
    pub duration: Duration,
    pub fixture_dir: PathBuf,
    pub results_dir: PathBuf,
    pub request_timeout: Duration,
    pub poll_timeout: Duration,
    pub poll_max_wait: Duration,
    pub seed: Option<u64>,
    pub no_progress: bool,
}

impl From<PaperloadCli> for RunConfig {
    fn from(cli: PaperloadCli) -> Self {
        Self {
            base_url: cli.base_url.trim_end_matches('/').to_string(),
            api_key: cli.api_key,
            users: cli.users,
            duration: Duration::from_secs(cli.duration),
            fixture_dir: cli.fixture_dir,
            results_dir: cli.results_dir,
            request_timeout: Duration::from_secs(cli.request_timeout),
            poll_timeout: Duration::from_secs(cli.poll_timeout),
            poll_max_wait: Duration::from_secs(cli.poll_max_wait),
            seed: cli.seed,
            no_progress: cli.no_progress,
        }
    }
}
