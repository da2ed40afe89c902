use std::path::Path;

use anyhow::Context;
use paperload_summary_model::RequestRecord;

/// Render the results log as CSV, one row per submission attempt.
pub fn render_csv(records: &[RequestRecord]) -> String {
    let mut csv = String::from("user,scenario,duration_ms,success,job_id,error\n");
    for r in records {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            r.user_index,
            escape(&r.scenario),
            r.duration_ms,
            r.success,
            escape(r.job_id.as_deref().unwrap_or("")),
            escape(r.error.as_deref().unwrap_or("")),
        ));
    }
    csv
}

pub fn write_csv_report(path: &Path, records: &[RequestRecord]) -> anyhow::Result<()> {
    std::fs::write(path, render_csv(records))
        .with_context(|| format!("Failed to write CSV report to {}", path.display()))?;
    log::info!("CSV data: {}", path.display());
    Ok(())
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
