use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use paperload_summary_model::{JobStatus, RequestRecord};
use serde::Deserialize;

use crate::catalog::Scenario;
use crate::cli::RunConfig;

const API_KEY_HEADER: &str = "X-API-Key";
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
/// Fixed suspension between status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    job_id: Option<String>,
    status: Option<JobStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatusResponse {
    status: JobStatus,
}

/// The outcome of polling one job to a terminal status. Consumed immediately by the driver.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// Only true when the job reached `COMPLETED`
    pub success: bool,
    /// The terminal status, when one was observed
    pub status: Option<JobStatus>,
    pub error: Option<String>,
}

/// Client for the document-processing service's job API.
///
/// Submission and polling failures are captured into the returned values rather than propagated:
/// a failed request is a data point for the run, not an error. Only [JobClient::new] and
/// [JobClient::health_check] surface errors, and both are fatal for the run.
#[derive(Debug)]
pub struct JobClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    fixture_dir: PathBuf,
    poll_timeout: Duration,
}

impl JobClient {
    pub fn new(config: &RunConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build the HTTP client")?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            fixture_dir: config.fixture_dir.clone(),
            poll_timeout: config.poll_timeout,
        })
    }

    /// Pre-flight availability check, used once before any virtual user starts.
    pub async fn health_check(&self) -> anyhow::Result<()> {
        self.http
            .get(format!("{}/health", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
            .context("Failed to reach the target service")?
            .error_for_status()
            .context("Target service is not healthy")?;
        Ok(())
    }

    /// Submit one job for the given scenario.
    ///
    /// A fixture file missing from the fixture directory short-circuits the attempt with a
    /// failed record and no network call. Transport and HTTP errors are captured into the record
    /// with the time elapsed up to the failure. `success` in the returned record means the
    /// submission was accepted; the driver downgrades it if polling does not end in `COMPLETED`.
    pub async fn submit(&self, scenario: &Scenario, user_index: usize) -> RequestRecord {
        let started_at = Utc::now().timestamp_millis();

        let mut file_parts = Vec::with_capacity(scenario.files.len());
        for file in &scenario.files {
            let path = self.fixture_dir.join(file);
            match tokio::fs::read(&path).await {
                Ok(bytes) => file_parts.push((file.clone(), bytes)),
                Err(_) => {
                    log::error!("File not found: {}", path.display());
                    return RequestRecord::new(
                        user_index,
                        scenario.name.clone(),
                        started_at,
                        Utc::now().timestamp_millis(),
                        None,
                        None,
                        Some(format!("Fixture file not found: {}", path.display())),
                        false,
                    );
                }
            }
        }

        let mut form = reqwest::multipart::Form::new();
        for (name, bytes) in file_parts {
            form = form.part("file", reqwest::multipart::Part::bytes(bytes).file_name(name));
        }
        for (key, value) in &scenario.params {
            form = form.text(key.clone(), value.clone());
        }

        let response = self
            .http
            .post(format!("{}/{}", self.base_url, scenario.endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match response {
            Ok(response) => match response.json::<SubmitResponse>().await {
                Ok(body) => RequestRecord::new(
                    user_index,
                    scenario.name.clone(),
                    started_at,
                    Utc::now().timestamp_millis(),
                    body.job_id,
                    body.status,
                    None,
                    true,
                ),
                Err(e) => RequestRecord::new(
                    user_index,
                    scenario.name.clone(),
                    started_at,
                    Utc::now().timestamp_millis(),
                    None,
                    None,
                    Some(format!("Invalid submission response: {e}")),
                    false,
                ),
            },
            Err(e) => RequestRecord::new(
                user_index,
                scenario.name.clone(),
                started_at,
                Utc::now().timestamp_millis(),
                None,
                None,
                Some(e.to_string()),
                false,
            ),
        }
    }

    /// Poll a job until it reaches a terminal status or `max_wait` elapses.
    ///
    /// `FAILED` and `CANCELLED` are failures with their own reasons, distinct from poll
    /// exhaustion. A transport error ends the poll loop immediately; retrying is the caller's
    /// decision, not this layer's.
    pub async fn poll_until_terminal(&self, job_id: &str, max_wait: Duration) -> PollOutcome {
        let started = std::time::Instant::now();

        while started.elapsed() < max_wait {
            match self.poll_once(job_id).await {
                Ok(JobStatus::Completed) => {
                    return PollOutcome {
                        success: true,
                        status: Some(JobStatus::Completed),
                        error: None,
                    }
                }
                Ok(JobStatus::Failed) => {
                    return PollOutcome {
                        success: false,
                        status: Some(JobStatus::Failed),
                        error: Some("Job failed".to_string()),
                    }
                }
                Ok(JobStatus::Cancelled) => {
                    return PollOutcome {
                        success: false,
                        status: Some(JobStatus::Cancelled),
                        error: Some("Job cancelled".to_string()),
                    }
                }
                Ok(status) => {
                    log::trace!("Job {job_id} is still {status}");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(e) => {
                    return PollOutcome {
                        success: false,
                        status: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        }

        PollOutcome {
            success: false,
            status: None,
            error: Some("Timeout waiting for job completion".to_string()),
        }
    }

    async fn poll_once(&self, job_id: &str) -> anyhow::Result<JobStatus> {
        let response = self
            .http
            .get(format!("{}/jobs/{}", self.base_url, job_id))
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.poll_timeout)
            .send()
            .await?
            .error_for_status()?;
        let body = response.json::<JobStatusResponse>().await?;
        Ok(body.status)
    }
}
