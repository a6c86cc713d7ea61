use std::path::Path;
use std::time::Instant;

use gmt_randomness_tests::BatteryRunner;

use crate::error::CliError;
use crate::input::{load_config, load_samples};

pub struct BatteryCommandConfig<'a> {
    pub length: usize,
    pub input: &'a Path,
    pub ascii: bool,
    pub tests: &'a [String],
    pub output_path: Option<&'a Path>,
    pub config_path: Option<&'a Path>,
    pub serial: bool,
    pub significance: Option<f64>,
}

/// Run the battery over every sample in the file and judge pass rate and uniformity.
pub fn run(cfg: BatteryCommandConfig<'_>) -> Result<bool, CliError> {
    let mut config = load_config(cfg.config_path)?;
    if cfg.serial {
        config.parallel = false;
    }
    if let Some(significance) = cfg.significance {
        config.significance = significance;
    }

    let samples = load_samples(cfg.input, cfg.length, cfg.ascii)?;
    let (battery, unknown) = super::make_battery(cfg.length, cfg.tests)?;
    println!(
        "Running {} test(s) over {} sample(s) from {}...\n",
        battery.len(),
        samples.len(),
        cfg.input.display()
    );

    let runner = BatteryRunner::new(battery, config);
    let t0 = Instant::now();
    let mut report = runner.run_many(samples.as_slice());
    report.unknown_tests = unknown;
    let elapsed = t0.elapsed().as_secs_f64();

    print!("{}", super::report::render(&report));
    println!("[{elapsed:.1}s]");

    if let Some(path) = cfg.output_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        println!("\nReport saved to: {}", path.display());
    }
    Ok(report.is_acceptable())
}
