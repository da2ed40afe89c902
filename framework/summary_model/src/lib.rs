use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Job status as reported by the document-processing service.
///
/// The service reports `PROCESSING` for a job that is being worked on, but some deployments use
/// `RUNNING` for the same state, so both spellings are accepted on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    #[serde(alias = "RUNNING")]
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// A terminal status is one the job can never transition out of.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// The outcome of a single submission attempt by one virtual user.
///
/// A record is created per attempt and appended to the results log exactly once. `success` is
/// only true when the job reached `COMPLETED`; a missing fixture file, a transport error, a
/// `FAILED`/`CANCELLED` terminal status and poll exhaustion all leave `success` false with a
/// distinguishing `error` text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestRecord {
    /// Index of the virtual user that made the attempt
    pub user_index: usize,
    /// Name of the scenario that was attempted
    pub scenario: String,
    /// Unix timestamp in milliseconds when the attempt started
    pub started_at: i64,
    /// Unix timestamp in milliseconds when the attempt ended
    pub ended_at: i64,
    /// Always `ended_at - started_at`
    pub duration_ms: u64,
    /// The job id returned by the service, if the submission was accepted
    pub job_id: Option<String>,
    /// The last status observed for the job, if any response was received
    pub status: Option<JobStatus>,
    /// Why the attempt failed, when it did
    pub error: Option<String>,
    pub success: bool,
}

impl RequestRecord {
    /// Create a record for an attempt that ran from `started_at` to `ended_at`.
    ///
    /// The duration is derived from the two timestamps so the `duration_ms == ended_at -
    /// started_at` invariant holds by construction. A clock that jumps backwards clamps the
    /// duration to zero rather than producing a negative value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_index: usize,
        scenario: String,
        started_at: i64,
        ended_at: i64,
        job_id: Option<String>,
        status: Option<JobStatus>,
        error: Option<String>,
        success: bool,
    ) -> Self {
        let ended_at = ended_at.max(started_at);
        Self {
            user_index,
            scenario,
            started_at,
            ended_at,
            duration_ms: (ended_at - started_at) as u64,
            job_id,
            status,
            error,
            success,
        }
    }
}

/// Requests completed by one virtual user over the whole run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserReport {
    pub user_index: usize,
    /// Number of jobs this user drove all the way to `COMPLETED`
    pub completed_requests: usize,
}

/// Identity and configuration of one run, captured by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunInfo {
    /// Chosen by the runner. Unique for each run.
    pub run_id: String,
    /// Name of the scenario suite that was run
    pub suite: String,
    /// Unix timestamp in milliseconds when the run started
    pub started_at: i64,
    /// Unix timestamp in milliseconds when the last virtual user finished
    pub ended_at: i64,
    /// The number of virtual users that were configured
    pub concurrent_users: usize,
    /// The nominal run duration in seconds
    pub run_duration: u64,
}

/// Summary of a run, derived once from the frozen results log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub info: RunInfo,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    /// Percentage in `[0, 100]`, defined as 0 for an empty log
    pub success_rate: f64,
    /// Mean duration over successful requests, 0 when there were none
    pub avg_duration_ms: f64,
    /// Fastest successful request, 0 when there were none
    pub min_duration_ms: u64,
    /// Slowest successful request, 0 when there were none
    pub max_duration_ms: u64,
    /// Requests per wall-clock second over all attempts, defined as 0 when the measured
    /// elapsed time is not positive
    pub requests_per_second: f64,
    /// Per-user completed request counts, ordered by user index
    pub user_totals: Vec<UserReport>,
}

/// Compute the summary for a finished run.
///
/// This is a pure function over the frozen results log: calling it twice with the same inputs
/// yields an identical summary.
pub fn summarize(info: &RunInfo, records: &[RequestRecord], users: &[UserReport]) -> RunSummary {
    let total_requests = records.len();
    let successful_requests = records.iter().filter(|r| r.success).count();
    let failed_requests = total_requests - successful_requests;

    let success_rate = if total_requests == 0 {
        0.0
    } else {
        successful_requests as f64 / total_requests as f64 * 100.0
    };

    let durations = records
        .iter()
        .filter(|r| r.success)
        .map(|r| r.duration_ms)
        .collect::<Vec<_>>();
    let avg_duration_ms = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<u64>() as f64 / durations.len() as f64
    };
    let min_duration_ms = durations.iter().min().copied().unwrap_or(0);
    let max_duration_ms = durations.iter().max().copied().unwrap_or(0);

    let elapsed_s = (info.ended_at - info.started_at) as f64 / 1000.0;
    let requests_per_second = if elapsed_s > 0.0 {
        total_requests as f64 / elapsed_s
    } else {
        // A run that starts and ends within the same measurement tick has no meaningful rate.
        0.0
    };

    RunSummary {
        info: info.clone(),
        total_requests,
        successful_requests,
        failed_requests,
        success_rate,
        avg_duration_ms,
        min_duration_ms,
        max_duration_ms,
        requests_per_second,
        user_totals: users
            .iter()
            .cloned()
            .sorted_by_key(|u| u.user_index)
            .collect(),
    }
}

/// Append the run summary to a file
///
/// The summary will be serialized to JSON and output as a single line followed by a newline. The
/// recommended file extension is `.jsonl`.
pub fn append_run_summary(run_summary: &RunSummary, path: PathBuf) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_run_summary(run_summary, &mut file)?;
    let _ = file.write("\n".as_bytes())?;
    Ok(())
}

/// Serialize the run summary to a writer
pub fn store_run_summary<W: Write>(run_summary: &RunSummary, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, run_summary)?;
    Ok(())
}

/// Load run summaries from a file
///
/// The file should contain one JSON object per line. This is the format produced by
/// [append_run_summary].
pub fn load_run_summaries(path: PathBuf) -> anyhow::Result<Vec<RunSummary>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut runs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let run: RunSummary = serde_json::from_str(&line)?;
        runs.push(run);
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(user: usize, scenario: &str, duration_ms: u64, success: bool) -> RequestRecord {
        RequestRecord::new(
            user,
            scenario.to_string(),
            1_000,
            1_000 + duration_ms as i64,
            success.then(|| "job-1".to_string()),
            success.then_some(JobStatus::Completed),
            (!success).then(|| "boom".to_string()),
            success,
        )
    }

    fn info(started_at: i64, ended_at: i64) -> RunInfo {
        RunInfo {
            run_id: "test-run".to_string(),
            suite: "pdf_suite".to_string(),
            started_at,
            ended_at,
            concurrent_users: 2,
            run_duration: 10,
        }
    }

    #[test]
    fn status_terminality() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn status_accepts_running_alias() {
        let status: JobStatus = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(status, JobStatus::Processing);

        let status: JobStatus = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(status, JobStatus::Processing);

        assert_eq!(
            serde_json::to_string(&JobStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn record_duration_is_derived_from_timestamps() {
        let r = record(0, "merge", 250, true);
        assert_eq!(r.duration_ms, 250);
        assert_eq!(r.ended_at - r.started_at, 250);
    }

    #[test]
    fn record_clamps_backwards_clock() {
        let r = RequestRecord::new(0, "merge".to_string(), 2_000, 1_500, None, None, None, false);
        assert_eq!(r.duration_ms, 0);
        assert_eq!(r.ended_at, r.started_at);
    }

    #[test]
    fn empty_log_summarizes_to_zeroes() {
        let summary = summarize(&info(1_000, 1_000), &[], &[]);

        assert_eq!(summary.total_requests, 0);
        assert_eq!(summary.successful_requests, 0);
        assert_eq!(summary.failed_requests, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.avg_duration_ms, 0.0);
        assert_eq!(summary.min_duration_ms, 0);
        assert_eq!(summary.max_duration_ms, 0);
        assert_eq!(summary.requests_per_second, 0.0);
    }

    #[test]
    fn counts_split_between_success_and_failure() {
        let records = vec![
            record(0, "merge", 100, true),
            record(0, "split", 200, false),
            record(1, "merge", 300, true),
            record(1, "rotate", 400, true),
        ];
        let summary = summarize(&info(0, 2_000), &records, &[]);

        assert_eq!(summary.total_requests, 4);
        assert_eq!(summary.successful_requests, 3);
        assert_eq!(summary.failed_requests, 1);
        assert_eq!(
            summary.total_requests,
            summary.successful_requests + summary.failed_requests
        );
        assert_eq!(summary.success_rate, 75.0);
        // Duration stats only consider successful requests.
        assert_eq!(summary.min_duration_ms, 100);
        assert_eq!(summary.max_duration_ms, 400);
        assert!((summary.avg_duration_ms - (100.0 + 300.0 + 400.0) / 3.0).abs() < f64::EPSILON);
        // 4 requests over 2 seconds of wall clock.
        assert!((summary.requests_per_second - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn success_rate_stays_within_bounds() {
        let all_failed = vec![record(0, "merge", 10, false); 5];
        let summary = summarize(&info(0, 1_000), &all_failed, &[]);
        assert_eq!(summary.success_rate, 0.0);

        let all_ok = vec![record(0, "merge", 10, true); 5];
        let summary = summarize(&info(0, 1_000), &all_ok, &[]);
        assert_eq!(summary.success_rate, 100.0);
    }

    #[test]
    fn zero_elapsed_time_yields_zero_rate() {
        let records = vec![record(0, "merge", 50, true)];
        let summary = summarize(&info(5_000, 5_000), &records, &[]);
        assert_eq!(summary.requests_per_second, 0.0);

        let summary = summarize(&info(5_000, 4_000), &records, &[]);
        assert_eq!(summary.requests_per_second, 0.0);
    }

    #[test]
    fn summarize_is_idempotent() {
        let records = vec![
            record(0, "merge", 100, true),
            record(1, "split", 200, false),
        ];
        let users = vec![
            UserReport {
                user_index: 1,
                completed_requests: 0,
            },
            UserReport {
                user_index: 0,
                completed_requests: 1,
            },
        ];
        let first = summarize(&info(0, 3_000), &records, &users);
        let second = summarize(&info(0, 3_000), &records, &users);
        assert_eq!(first, second);
        // User totals come out ordered by user index regardless of input order.
        assert_eq!(first.user_totals[0].user_index, 0);
        assert_eq!(first.user_totals[1].user_index, 1);
    }

    #[test]
    fn run_history_roundtrips_through_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_history.jsonl");

        let first = summarize(&info(0, 1_000), &[record(0, "merge", 10, true)], &[]);
        let second = summarize(&info(1_000, 3_000), &[], &[]);
        append_run_summary(&first, path.clone()).unwrap();
        append_run_summary(&second, path.clone()).unwrap();

        let loaded = load_run_summaries(path).unwrap();
        assert_eq!(loaded, vec![first, second]);
    }
}
