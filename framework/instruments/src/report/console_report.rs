use std::collections::HashMap;

use paperload_summary_model::{RequestRecord, RunSummary};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ScenarioRow {
    scenario: String,
    requests: usize,
    successful: usize,
    failed: usize,
    avg_ms: String,
    min_ms: String,
    max_ms: String,
}

/// Print the per-scenario breakdown and overall summary block to the console.
pub fn print_console_summary(records: &[RequestRecord], summary: &RunSummary) {
    if !records.is_empty() {
        println!("\nSummary of scenarios");
        let mut by_scenario: HashMap<String, Vec<&RequestRecord>> = HashMap::new();
        for record in records {
            by_scenario
                .entry(record.scenario.clone())
                .or_default()
                .push(record);
        }

        let mut rows = by_scenario
            .into_iter()
            .map(|(scenario, records)| scenario_row(scenario, &records))
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| a.scenario.cmp(&b.scenario));

        let mut table = Table::new(&rows);
        table.with(Style::modern());
        println!("{table}");
    }

    println!("\n{}", "=".repeat(60));
    println!("LOAD TEST SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total Requests:    {}", summary.total_requests);
    println!("Successful:        {}", summary.successful_requests);
    println!("Failed:            {}", summary.failed_requests);
    println!("Success Rate:      {:.2}%", summary.success_rate);
    println!(
        "Total Time:        {:.2}s",
        (summary.info.ended_at - summary.info.started_at) as f64 / 1000.0
    );
    println!("Requests/Second:   {:.2}", summary.requests_per_second);
    println!("Avg Duration:      {:.2}ms", summary.avg_duration_ms);
    println!("Min Duration:      {}ms", summary.min_duration_ms);
    println!("Max Duration:      {}ms", summary.max_duration_ms);
    println!("{}", "=".repeat(60));
}

fn scenario_row(scenario: String, records: &[&RequestRecord]) -> ScenarioRow {
    let successful = records.iter().filter(|r| r.success).count();
    let durations = records
        .iter()
        .filter(|r| r.success)
        .map(|r| r.duration_ms)
        .collect::<Vec<_>>();
    let avg = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<u64>() as f64 / durations.len() as f64
    };

    ScenarioRow {
        scenario,
        requests: records.len(),
        successful,
        failed: records.len() - successful,
        avg_ms: format!("{avg:.2}"),
        min_ms: durations.iter().min().copied().unwrap_or(0).to_string(),
        max_ms: durations.iter().max().copied().unwrap_or(0).to_string(),
    }
}
