use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chrono::DateTime;
use paperload_summary_model::RunSummary;

/// Threshold below which the success rate is called out, in percent.
const SUCCESS_RATE_THRESHOLD: f64 = 95.0;
/// Threshold above which the average duration is called out, in milliseconds.
const AVG_DURATION_THRESHOLD_MS: f64 = 10_000.0;
/// Threshold below which the throughput is called out, in requests per second.
const THROUGHPUT_THRESHOLD: f64 = 1.0;

/// Render the narrative Markdown report for a finished run.
pub fn render_markdown(summary: &RunSummary, scenario_names: &[String], csv_path: &Path) -> String {
    let mut report = String::new();

    let _ = writeln!(report, "# Load Test Report");
    let _ = writeln!(report);
    let _ = writeln!(report, "## Configuration");
    let _ = writeln!(report, "- **Suite**: {}", summary.info.suite);
    let _ = writeln!(report, "- **Run ID**: {}", summary.info.run_id);
    let _ = writeln!(
        report,
        "- **Concurrent Users**: {}",
        summary.info.concurrent_users
    );
    let _ = writeln!(
        report,
        "- **Duration**: {} seconds",
        summary.info.run_duration
    );
    let _ = writeln!(
        report,
        "- **Test Scenarios**: {}",
        scenario_names.join(", ")
    );
    let _ = writeln!(
        report,
        "- **Start Time**: {}",
        format_timestamp(summary.info.started_at)
    );
    let _ = writeln!(
        report,
        "- **End Time**: {}",
        format_timestamp(summary.info.ended_at)
    );
    let _ = writeln!(report);
    let _ = writeln!(report, "## Summary");
    let _ = writeln!(report, "- **Total Requests**: {}", summary.total_requests);
    let _ = writeln!(
        report,
        "- **Successful**: {}",
        summary.successful_requests
    );
    let _ = writeln!(report, "- **Failed**: {}", summary.failed_requests);
    let _ = writeln!(report, "- **Success Rate**: {:.2}%", summary.success_rate);
    let _ = writeln!(
        report,
        "- **Total Time**: {:.2}s",
        (summary.info.ended_at - summary.info.started_at) as f64 / 1000.0
    );
    let _ = writeln!(
        report,
        "- **Requests/Second**: {:.2}",
        summary.requests_per_second
    );
    let _ = writeln!(
        report,
        "- **Avg Duration**: {:.2}ms",
        summary.avg_duration_ms
    );
    let _ = writeln!(report, "- **Min Duration**: {}ms", summary.min_duration_ms);
    let _ = writeln!(report, "- **Max Duration**: {}ms", summary.max_duration_ms);
    let _ = writeln!(report);
    let _ = writeln!(report, "## User Results");
    let _ = writeln!(report, "| User | Completed Requests |");
    let _ = writeln!(report, "|------|--------------------|");
    for user in &summary.user_totals {
        let _ = writeln!(
            report,
            "| {} | {} |",
            user.user_index, user.completed_requests
        );
    }
    let _ = writeln!(report);
    let _ = writeln!(report, "## Detailed Results");
    let _ = writeln!(report, "See: {}", csv_path.display());
    let _ = writeln!(report);
    let _ = writeln!(report, "## Recommendations");
    for line in recommendations(summary) {
        let _ = writeln!(report, "{line}");
    }

    report
}

pub fn write_markdown_report(
    path: &Path,
    summary: &RunSummary,
    scenario_names: &[String],
    csv_path: &Path,
) -> anyhow::Result<()> {
    std::fs::write(path, render_markdown(summary, scenario_names, csv_path))
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    log::info!("Report generated: {}", path.display());
    Ok(())
}

fn recommendations(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::with_capacity(3);
    lines.push(if summary.success_rate < SUCCESS_RATE_THRESHOLD {
        "- ⚠️ Success rate is below 95%, investigate failures".to_string()
    } else {
        "- ✅ Success rate is good".to_string()
    });
    lines.push(if summary.avg_duration_ms > AVG_DURATION_THRESHOLD_MS {
        "- ⚠️ Average duration is high, consider optimization".to_string()
    } else {
        "- ✅ Response times are acceptable".to_string()
    });
    lines.push(if summary.requests_per_second < THROUGHPUT_THRESHOLD {
        "- ⚠️ Low throughput, consider scaling".to_string()
    } else {
        "- ✅ Throughput is good".to_string()
    });
    lines
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
