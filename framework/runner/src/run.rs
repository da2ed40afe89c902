use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use nanoid::nanoid;
use paperload_core::prelude::DeadlineHandle;
use paperload_instruments::report::{
    print_console_summary, write_csv_report, write_markdown_report,
};
use paperload_instruments::ResultsCollector;
use paperload_summary_model::{append_run_summary, summarize, RunInfo, RunSummary};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::ScenarioCatalog;
use crate::cli::RunConfig;
use crate::client::JobClient;
use crate::context::RunnerContext;
use crate::executor::Executor;
use crate::progress::start_progress;
use crate::user::run_user;

const CSV_REPORT_FILE: &str = "load_test_results.csv";
const MARKDOWN_REPORT_FILE: &str = "load_test_report.md";
const RUN_HISTORY_FILE: &str = "run_history.jsonl";

/// Run the load test: spawn the configured number of virtual users, wait for all of them to
/// finish, then aggregate the results log and write the reports.
///
/// Individual request failures never abort the run; they are recorded and counted. An error from
/// this function is fatal (pre-flight failure or an orchestration problem) and no report is
/// written in that case.
pub fn run(suite: &str, config: RunConfig, catalog: ScenarioCatalog) -> anyhow::Result<RunSummary> {
    log::info!(
        "Starting load test '{suite}' with {} concurrent users for {} seconds",
        config.users,
        config.duration.as_secs()
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let executor = Executor::new(runtime);
    let client = JobClient::new(&config)?;

    executor
        .run(client.health_check())
        .context("Pre-flight health check failed")?;
    log::info!("Target service is available");

    let deadline = DeadlineHandle::new();
    let context = Arc::new(RunnerContext::new(
        executor,
        client,
        catalog,
        ResultsCollector::new(),
        config.clone(),
    ));

    if !config.no_progress {
        start_progress(config.duration, deadline.new_listener());
    }

    {
        // Arm the wall-clock deadline for the run.
        let deadline = deadline.clone();
        let duration = config.duration;
        context.executor().spawn(async move {
            tokio::time::sleep(duration).await;
            deadline.expire();
        });
    }

    let started_at = Utc::now().timestamp_millis();

    let mut handles = Vec::with_capacity(config.users);
    for user_index in 0..config.users {
        let context = context.clone();
        let listener = deadline.new_listener();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(user_index as u64)),
            None => StdRng::from_entropy(),
        };

        handles.push(
            std::thread::Builder::new()
                .name(format!("user-{user_index}"))
                .spawn(move || run_user(user_index, context, listener, rng))
                .context("Failed to spawn virtual user thread")?,
        );
    }

    let mut user_reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let report = handle
            .join()
            .map_err(|e| anyhow::anyhow!("Error joining virtual user thread: {:?}", e))?;
        user_reports.push(report);
    }

    let ended_at = Utc::now().timestamp_millis();

    let records = context.collector().snapshot();
    let info = RunInfo {
        run_id: nanoid!(),
        suite: suite.to_string(),
        started_at,
        ended_at,
        concurrent_users: config.users,
        run_duration: config.duration.as_secs(),
    };
    let summary = summarize(&info, &records, &user_reports);

    std::fs::create_dir_all(&config.results_dir).with_context(|| {
        format!(
            "Failed to create results directory {}",
            config.results_dir.display()
        )
    })?;
    let csv_path = config.results_dir.join(CSV_REPORT_FILE);
    write_csv_report(&csv_path, &records)?;
    let scenario_names = context
        .catalog()
        .scenarios()
        .iter()
        .map(|s| s.name.clone())
        .collect::<Vec<_>>();
    write_markdown_report(
        &config.results_dir.join(MARKDOWN_REPORT_FILE),
        &summary,
        &scenario_names,
        &csv_path,
    )?;
    append_run_summary(&summary, config.results_dir.join(RUN_HISTORY_FILE))?;

    print_console_summary(&records, &summary);

    Ok(summary)
}
