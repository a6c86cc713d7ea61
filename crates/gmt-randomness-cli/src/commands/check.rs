use std::path::Path;

use gmt_randomness_tests::{BatteryRunner, RunnerConfig};

use crate::error::CliError;
use crate::input::load_samples;

/// Run the battery on the first sample of the file and print every result.
pub fn run(length: usize, input: &Path, ascii: bool, tests: &[String]) -> Result<bool, CliError> {
    let samples = load_samples(input, length, ascii)?;
    let (battery, unknown) = super::make_battery(length, tests)?;
    let runner = BatteryRunner::new(battery, RunnerConfig::default());
    let sequence = &samples.as_slice()[0];

    println!(
        "Checking first of {} sample(s) from {} ({length} bits)\n",
        samples.len(),
        input.display()
    );
    let mut all_passed = unknown.is_empty();
    for (id, outcome) in runner.run_all(sequence) {
        match outcome {
            Ok(result) => {
                let mark = if result.passed { "✓" } else { "✗" };
                let scores: Vec<String> = result.scores.iter().map(|p| format!("{p:.6}")).collect();
                println!(
                    "  {mark} {:<28} {:<22} {}",
                    id,
                    scores.join(" "),
                    result.details
                );
                all_passed &= result.passed;
            }
            Err(e) if e.is_ineligible() => println!("  - {id:<28} skipped: {e}"),
            Err(e) => {
                println!("  ! {id:<28} {e}");
                all_passed = false;
            }
        }
    }
    Ok(all_passed)
}
