pub mod battery;
pub mod check;
pub mod list;
pub mod report;

use gmt_randomness_tests::{Battery, Error};

use crate::error::CliError;

/// Battery for `length`, narrowed to `tests` when any are given.
///
/// Unknown identifiers are returned (the engine logs them as warnings); the
/// remaining tests still run.
pub fn make_battery(length: usize, tests: &[String]) -> Result<(Battery, Vec<String>), CliError> {
    let battery = Battery::for_length(length)?;
    if tests.is_empty() {
        return Ok((battery, Vec::new()));
    }
    let (selected, unknown) = battery.select(tests);
    let unknown: Vec<String> = unknown
        .into_iter()
        .map(|e| match e {
            Error::UnknownTest(id) => id,
            other => other.to_string(),
        })
        .collect();
    Ok((selected, unknown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_keeps_full_battery() {
        let (battery, unknown) = make_battery(20_000, &[]).unwrap();
        assert_eq!(battery.len(), 18);
        assert!(unknown.is_empty());
    }

    #[test]
    fn filter_reports_unknown_ids() {
        let tests = vec!["poker_4".to_string(), "poker_5".to_string()];
        let (battery, unknown) = make_battery(20_000, &tests).unwrap();
        assert_eq!(battery.ids().collect::<Vec<_>>(), vec!["poker_4"]);
        assert_eq!(unknown, vec!["poker_5".to_string()]);
    }

    #[test]
    fn unknown_ids_are_returned_in_request_order() {
        let tests: Vec<String> = ["serial_9", "monobit", "serial_9"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (battery, unknown) = make_battery(20_000, &tests).unwrap();
        assert_eq!(battery.len(), 1);
        assert_eq!(unknown, vec!["serial_9".to_string(), "serial_9".to_string()]);
    }

    #[test]
    fn unsupported_length_fails() {
        assert!(matches!(
            make_battery(4096, &[]),
            Err(CliError::Engine(Error::UnsupportedLength(4096)))
        ));
    }
}
