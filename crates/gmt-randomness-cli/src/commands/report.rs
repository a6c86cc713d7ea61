use gmt_randomness_tests::{BatteryReport, TestSummary};

/// Plain-text summary table for a battery run.
pub fn render(report: &BatteryReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} sample(s) of {} bits\n\n",
        report.samples, report.sequence_len
    ));
    out.push_str(&"=".repeat(78));
    out.push('\n');
    out.push_str(&format!(
        "{:<28} {:>9} {:>6} {:>24} {:>6}\n",
        "Test", "Pass", "Min", "Uniformity", "Result"
    ));
    out.push_str(&"-".repeat(78));
    out.push('\n');
    for summary in &report.summaries {
        out.push_str(&row(summary));
        out.push('\n');
    }
    out.push_str(&"=".repeat(78));
    out.push('\n');

    for id in &report.unknown_tests {
        out.push_str(&format!("unknown test: {id}\n"));
    }
    let acceptable = report.summaries.iter().filter(|s| s.acceptable).count();
    out.push_str(&format!(
        "{acceptable}/{} tests acceptable: {}\n",
        report.summaries.len(),
        if report.is_acceptable() { "PASS" } else { "FAIL" }
    ));
    out
}

fn row(summary: &TestSummary) -> String {
    let uniformity = if summary.uniformity.is_empty() {
        "—".to_string()
    } else {
        summary
            .uniformity
            .iter()
            .map(|u| format!("{u:.6}"))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let verdict = if summary.acceptable { "✓" } else { "✗" };
    let mut line = format!(
        "{:<28} {:>9} {:>6} {:>24} {:>6}",
        summary.id,
        format!("{}/{}", summary.passed, summary.executed),
        summary.min_pass,
        uniformity,
        verdict
    );
    if summary.skipped > 0 {
        line.push_str(&format!("  ({} skipped)", summary.skipped));
    }
    line
}
