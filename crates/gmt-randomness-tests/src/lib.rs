//! GM/T 0005 randomness test battery.
//!
//! Fifteen statistical tests over bit sequences, configured once per sequence
//! length (20,000 or 1,000,000 bits). Each execution yields one or two
//! p-values with matching q-values. A [`BatteryRunner`] runs a [`Battery`]
//! over a sample set, counts passes and checks that q-values are uniformly
//! distributed.
//!
//! ```no_run
//! use gmt_randomness_tests::{Battery, BatteryRunner, RunnerConfig, SampleSet};
//!
//! let data = std::fs::read("samples.bin").unwrap();
//! let samples = SampleSet::from_bytes(&data, 1_000_000).unwrap();
//! let runner = BatteryRunner::new(Battery::for_length(1_000_000).unwrap(), RunnerConfig::default());
//! let report = runner.run_many(samples.as_slice());
//! for summary in &report.summaries {
//!     println!("{:<28} {}/{} {:?}", summary.id, summary.passed, summary.executed, summary.uniformity);
//! }
//! ```

pub mod algorithms;
pub mod battery;
pub mod bits;
pub mod error;
pub mod result;
pub mod runner;
pub mod special;
pub mod uniformity;
pub mod unit;

pub use battery::{Battery, SequenceLength};
pub use bits::{BitSequence, SampleSet};
pub use error::{Error, Result};
pub use result::{Statistic, TestResult};
pub use runner::{BatteryReport, BatteryRunner, RunnerConfig, TestSummary, min_pass_count};
pub use uniformity::{ACCEPTANCE_THRESHOLD, QValueScorer};
pub use unit::{Algorithm, DEFAULT_SIGNIFICANCE, TestUnit};
