//! Integration tests for gmt-randomness-tests.
//!
//! These exercise the full pipeline: bytes → samples → battery → report.

use gmt_randomness_tests::{
    Battery, BatteryRunner, BitSequence, Error, RunnerConfig, SampleSet, min_pass_count,
};

/// Generate pseudo-random data for testing (simple LCG).
fn pseudo_random(n: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(n);
    let mut state: u64 = 0xDEAD_BEEF_CAFE_BABE;
    for _ in 0..n {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        data.push((state >> 33) as u8);
    }
    data
}

#[test]
fn full_battery_passes_on_pseudo_random_megabit() {
    let seq = BitSequence::from_bytes(&pseudo_random(125_000));
    assert_eq!(seq.len(), 1_000_000);

    let runner = BatteryRunner::new(
        Battery::for_length(1_000_000).unwrap(),
        RunnerConfig::default(),
    );
    let results = runner.run_all(&seq);
    assert_eq!(results.len(), 23);
    for (id, outcome) in &results {
        let result = outcome.as_ref().unwrap_or_else(|e| panic!("{id}: {e}"));
        assert!(
            result.passed,
            "{id} failed with scores {:?} ({})",
            result.scores, result.details
        );
    }
}

#[test]
fn small_battery_accepts_pseudo_random_samples() {
    let data = pseudo_random(20 * 2500);
    let samples = SampleSet::from_bytes(&data, 20_000).unwrap();
    assert_eq!(samples.len(), 20);

    let runner = BatteryRunner::new(Battery::for_length(20_000).unwrap(), RunnerConfig::default());
    let report = runner.run_many(samples.as_slice());
    assert_eq!(report.samples, 20);
    assert_eq!(report.summaries.len(), 18);
    for summary in &report.summaries {
        assert_eq!(summary.executed, 20, "{}", summary.id);
        assert_eq!(summary.min_pass, min_pass_count(20, 0.01));
        assert!(
            summary.acceptable,
            "{}: {}/{} uniformity {:?}",
            summary.id, summary.passed, summary.executed, summary.uniformity
        );
    }
    assert!(report.is_acceptable());

    let dual = ["serial_3", "longest_runs_in_a_block", "cumulative_sums"];
    for id in dual {
        assert_eq!(report.get(id).unwrap().uniformity.len(), 2, "{id}");
    }
}

#[test]
fn unknown_tests_are_reported_not_fatal() {
    let samples = SampleSet::from_bytes(&pseudo_random(2 * 2500), 20_000).unwrap();
    let runner = BatteryRunner::new(Battery::for_length(20_000).unwrap(), RunnerConfig::default());

    let report = runner.run_selected(samples.as_slice(), &["monobit", "serial_7", "runs"]);
    let ids: Vec<&str> = report.summaries.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["monobit", "runs"]);
    assert_eq!(report.unknown_tests, vec!["serial_7".to_string()]);

    let seq = &samples.as_slice()[0];
    assert_eq!(
        runner.run_one(seq, "serial_7").unwrap_err(),
        Error::UnknownTest("serial_7".into())
    );
}

#[test]
fn wrong_length_samples_are_skipped() {
    let runner = BatteryRunner::new(Battery::for_length(20_000).unwrap(), RunnerConfig::default());
    let short = BitSequence::from_bytes(&pseudo_random(1000));
    let results = runner.run_all(&short);
    assert!(results.iter().all(|(_, r)| matches!(r, Err(e) if e.is_ineligible())));

    let report = runner.run_many(&[short]);
    assert!(report.summaries.iter().all(|s| s.executed == 0 && s.skipped == 1));
    assert!(!report.is_acceptable());
}

#[test]
fn report_serializes_to_json() {
    let samples = SampleSet::from_bytes(&pseudo_random(2500), 20_000).unwrap();
    let (battery, _) = Battery::for_length(20_000).unwrap().select(&["monobit"]);
    let report = BatteryRunner::new(battery, RunnerConfig::default()).run_many(samples.as_slice());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["sequence_len"], 20_000);
    assert_eq!(json["summaries"][0]["id"], "monobit");
    assert_eq!(json["summaries"][0]["executed"], 1);
}

#[test]
fn unsupported_length_is_rejected() {
    assert_eq!(
        Battery::for_length(100_000_000).unwrap_err(),
        Error::UnsupportedLength(100_000_000)
    );
}
