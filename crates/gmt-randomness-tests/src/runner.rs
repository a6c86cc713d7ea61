//! Running a battery over one or many sequences and judging the outcome.

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::battery::Battery;
use crate::bits::BitSequence;
use crate::error::{Error, Result};
use crate::result::TestResult;
use crate::uniformity::{ACCEPTANCE_THRESHOLD, QValueScorer};
use crate::unit::{DEFAULT_SIGNIFICANCE, TestUnit};

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════════

/// Knobs for a battery run. Loadable from JSON; missing fields take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Pass/fail threshold on every p-value.
    pub significance: f64,
    /// Number of equal intervals for the q-value uniformity check.
    pub intervals: usize,
    /// Minimum uniformity score for a test to be acceptable.
    pub uniformity_threshold: f64,
    /// Spread samples over the rayon thread pool.
    pub parallel: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            significance: DEFAULT_SIGNIFICANCE,
            intervals: 10,
            uniformity_threshold: ACCEPTANCE_THRESHOLD,
            parallel: true,
        }
    }
}

/// Minimum number of passing samples out of `samples` at significance `alpha`.
///
/// `⌈s·(1 − α − 3·√(α(1 − α)/s))⌉`, never negative.
pub fn min_pass_count(samples: usize, alpha: f64) -> usize {
    if samples == 0 {
        return 0;
    }
    let s = samples as f64;
    let proportion = 1.0 - alpha - 3.0 * (alpha * (1.0 - alpha) / s).sqrt();
    (s * proportion).ceil().max(0.0) as usize
}

// ═══════════════════════════════════════════════════════════════════════════════
// Aggregation
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-test accumulator. Workers fold into private tallies that are merged at
/// the end, so the order of samples does not matter.
#[derive(Debug, Default)]
struct Tally {
    executed: usize,
    passed: usize,
    skipped: usize,
    /// One q-value list per score position.
    q_values: Vec<Vec<f64>>,
    errors: Vec<String>,
}

impl Tally {
    fn record(mut self, outcome: Result<TestResult>) -> Self {
        match outcome {
            Ok(result) => {
                self.executed += 1;
                if result.passed {
                    self.passed += 1;
                }
                if self.q_values.len() < result.q_values.len() {
                    self.q_values.resize_with(result.q_values.len(), Vec::new);
                }
                for (list, q) in self.q_values.iter_mut().zip(result.q_values) {
                    list.push(q);
                }
            }
            Err(e) if e.is_ineligible() => {
                debug!("{e}");
                self.skipped += 1;
            }
            Err(e) => self.errors.push(e.to_string()),
        }
        self
    }

    fn merge(mut self, other: Tally) -> Self {
        self.executed += other.executed;
        self.passed += other.passed;
        self.skipped += other.skipped;
        if self.q_values.len() < other.q_values.len() {
            self.q_values.resize_with(other.q_values.len(), Vec::new);
        }
        for (list, more) in self.q_values.iter_mut().zip(other.q_values) {
            list.extend(more);
        }
        self.errors.extend(other.errors);
        self
    }
}

/// Outcome of one test across a sample set.
#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub id: String,
    pub name: String,
    /// Samples the test actually ran on; ineligible samples are excluded.
    pub executed: usize,
    pub passed: usize,
    pub skipped: usize,
    /// Uniformity score per statistic position; empty when nothing executed.
    pub uniformity: Vec<f64>,
    /// Passing count required for `executed` samples.
    pub min_pass: usize,
    pub errors: Vec<String>,
    pub acceptable: bool,
}

/// All test summaries for one `run_many` call.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryReport {
    pub sequence_len: usize,
    pub samples: usize,
    pub summaries: Vec<TestSummary>,
    /// Identifiers that were requested but are not in the battery.
    pub unknown_tests: Vec<String>,
}

impl BatteryReport {
    /// Every test acceptable and no unknown identifiers requested.
    pub fn is_acceptable(&self) -> bool {
        self.unknown_tests.is_empty() && self.summaries.iter().all(|s| s.acceptable)
    }

    pub fn get(&self, id: &str) -> Option<&TestSummary> {
        self.summaries.iter().find(|s| s.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Executes a [`Battery`] with a [`RunnerConfig`].
#[derive(Debug, Clone)]
pub struct BatteryRunner {
    battery: Battery,
    config: RunnerConfig,
    scorer: QValueScorer,
}

impl BatteryRunner {
    /// The config's significance is applied to every unit in the battery.
    pub fn new(battery: Battery, config: RunnerConfig) -> Self {
        Self {
            battery: battery.with_significance(config.significance),
            scorer: QValueScorer::new(config.intervals),
            config,
        }
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a single test by identifier.
    pub fn run_one(&self, sequence: &BitSequence, id: &str) -> Result<TestResult> {
        self.battery.get(id)?.execute(sequence)
    }

    /// Run every test in battery order; each entry carries its own outcome.
    pub fn run_all(&self, sequence: &BitSequence) -> Vec<(String, Result<TestResult>)> {
        self.battery
            .iter()
            .map(|(id, unit)| (id.to_string(), unit.execute(sequence)))
            .collect()
    }

    /// Run every test against every sequence and score pass rate and uniformity.
    pub fn run_many(&self, sequences: &[BitSequence]) -> BatteryReport {
        let summaries: Vec<TestSummary> = self
            .battery
            .iter()
            .map(|(id, unit)| self.summarize(id, unit, sequences))
            .collect();
        let report = BatteryReport {
            sequence_len: self.battery.sequence_len(),
            samples: sequences.len(),
            summaries,
            unknown_tests: Vec::new(),
        };
        info!(
            "battery finished: {} tests over {} samples, {} acceptable",
            report.summaries.len(),
            report.samples,
            report.summaries.iter().filter(|s| s.acceptable).count()
        );
        report
    }

    /// [`run_many`](Self::run_many) restricted to the named tests.
    ///
    /// Unknown identifiers are listed in the report and make it unacceptable,
    /// the known ones still run.
    pub fn run_selected<S: AsRef<str>>(
        &self,
        sequences: &[BitSequence],
        ids: &[S],
    ) -> BatteryReport {
        let (battery, unknown) = self.battery.select(ids);
        let runner = BatteryRunner {
            battery,
            config: self.config,
            scorer: self.scorer,
        };
        let mut report = runner.run_many(sequences);
        report.unknown_tests = unknown
            .into_iter()
            .filter_map(|e| match e {
                Error::UnknownTest(id) => Some(id),
                _ => None,
            })
            .collect();
        report
    }

    fn summarize(&self, id: &str, unit: &TestUnit, sequences: &[BitSequence]) -> TestSummary {
        let tally = if self.config.parallel {
            sequences
                .par_iter()
                .fold(Tally::default, |tally, seq| tally.record(unit.execute(seq)))
                .reduce(Tally::default, Tally::merge)
        } else {
            sequences
                .iter()
                .fold(Tally::default(), |tally, seq| tally.record(unit.execute(seq)))
        };

        if tally.skipped > 0 {
            warn!(
                "{id}: skipped {} of {} samples as ineligible",
                tally.skipped,
                sequences.len()
            );
        }
        for e in &tally.errors {
            warn!("{id}: {e}");
        }

        let uniformity: Vec<f64> = tally
            .q_values
            .iter()
            .filter_map(|q| self.scorer.score(q))
            .collect();
        let min_pass = min_pass_count(tally.executed, self.config.significance);
        let acceptable = tally.executed > 0
            && tally.errors.is_empty()
            && tally.passed >= min_pass
            && uniformity
                .iter()
                .all(|&u| u >= self.config.uniformity_threshold);
        debug!(
            "{id}: {}/{} passed (min {min_pass}), uniformity {uniformity:?}",
            tally.passed, tally.executed
        );

        TestSummary {
            id: id.to_string(),
            name: unit.name().to_string(),
            executed: tally.executed,
            passed: tally.passed,
            skipped: tally.skipped,
            uniformity,
            min_pass,
            errors: tally.errors,
            acceptable,
        }
    }
}
