use anyhow::Context;
use paperload_runner::prelude::*;

fn main() -> PaperloadResult<()> {
    let config = init();

    // The standard operations of the PDF processing service, with the fixture files and
    // parameters each endpoint expects.
    let catalog = ScenarioCatalog::new(vec![
        Scenario::new("merge", "merge", &["simple.pdf", "simple2.pdf"], &[]),
        Scenario::new("split", "split", &["multipage.pdf"], &[("pagesPerFile", "1")]),
        Scenario::new("compress", "compress", &["large.pdf"], &[("quality", "0.8")]),
        Scenario::new("rotate", "rotate", &["simple.pdf"], &[("angle", "90")]),
        Scenario::new("extract-text", "extract-text", &["text_only.pdf"], &[]),
        Scenario::new(
            "pdf-to-image",
            "pdf-to-image",
            &["simple.pdf"],
            &[("format", "png"), ("dpi", "150")],
        ),
        Scenario::new("html-to-pdf", "html-to-pdf", &["test_html.html"], &[]),
        Scenario::new(
            "ocr-pdf",
            "ocr-pdf",
            &["ocr_test.pdf"],
            &[("language", "eng"), ("dpi", "300")],
        ),
    ])
    .context("Invalid scenario catalog")?;

    let summary = run(env!("CARGO_PKG_NAME"), config, catalog)?;

    log::info!(
        "Load test completed: {} requests, {:.2}% success rate",
        summary.total_requests,
        summary.success_rate
    );

    Ok(())
}
