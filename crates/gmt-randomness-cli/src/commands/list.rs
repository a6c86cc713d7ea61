use gmt_randomness_tests::Battery;

use crate::error::CliError;

pub fn run(length: usize) -> Result<bool, CliError> {
    let battery = Battery::for_length(length)?;
    println!("{} tests for {length}-bit sequences:\n", battery.len());
    for (id, unit) in battery.iter() {
        println!("  {:<28} {}", id, unit.name());
    }
    Ok(true)
}
