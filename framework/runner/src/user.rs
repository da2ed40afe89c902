use std::sync::Arc;
use std::time::Duration;

use paperload_core::prelude::DeadlineListener;
use paperload_summary_model::UserReport;
use rand::rngs::StdRng;
use rand::Rng;

use crate::context::RunnerContext;

/// Inter-iteration jitter bounds in milliseconds, uniform in `[JITTER_MIN_MS, JITTER_MAX_MS)`.
/// Desynchronises the users so their poll loops don't align.
const JITTER_MIN_MS: u64 = 100;
const JITTER_MAX_MS: u64 = 300;

/// Drive one virtual user until the run deadline.
///
/// The deadline is checked at the top of the loop, so an iteration that is in flight when it
/// passes is allowed to finish. Every submission attempt ends up in the results log, including
/// ones that never reached the network.
pub(crate) fn run_user(
    user_index: usize,
    context: Arc<RunnerContext>,
    mut deadline: DeadlineListener,
    mut rng: StdRng,
) -> UserReport {
    let mut completed_requests = 0;

    loop {
        if deadline.is_expired() {
            log::debug!("Stopping user {user_index}");
            break;
        }

        let scenario = context.catalog().pick(&mut rng).clone();
        let mut record = context
            .executor()
            .run(context.client().submit(&scenario, user_index));

        if record.success {
            if let Some(job_id) = record.job_id.clone() {
                let outcome = context.executor().run(
                    context
                        .client()
                        .poll_until_terminal(&job_id, context.config().poll_max_wait),
                );
                if outcome.success {
                    completed_requests += 1;
                    log::info!("User {user_index}: completed {completed_requests} requests");
                } else {
                    record.success = false;
                    record.status = outcome.status;
                    record.error = outcome.error;
                }
            }
        } else if let Some(error) = &record.error {
            log::error!("User {user_index}: {} failed - {error}", record.scenario);
        }

        context.collector().record(record);

        let jitter = rng.gen_range(JITTER_MIN_MS..JITTER_MAX_MS);
        std::thread::sleep(Duration::from_millis(jitter));
    }

    UserReport {
        user_index,
        completed_requests,
    }
}
