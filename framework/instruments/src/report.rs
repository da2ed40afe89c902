mod console_report;
mod csv_report;
mod markdown_report;

pub use console_report::print_console_summary;
pub use csv_report::{render_csv, write_csv_report};
pub use markdown_report::{render_markdown, write_markdown_report};
