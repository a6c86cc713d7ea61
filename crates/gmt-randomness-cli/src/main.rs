//! CLI for the GM/T 0005 randomness test battery.

mod commands;
mod error;
mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gmt-randomness")]
#[command(about = "GM/T 0005 randomness tests for 20,000 and 1,000,000-bit samples")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the battery for a sequence length: identifiers and display names
    List {
        /// Bits per sample (20000 or 1000000)
        #[arg(long, default_value = "1000000")]
        length: usize,
    },

    /// Run every test on the first sample of a file and print each result
    Check {
        /// Bits per sample (20000 or 1000000)
        #[arg(long, default_value = "1000000")]
        length: usize,

        /// Input file: raw bytes (MSB first) or, with --ascii, '0'/'1' text
        #[arg(long)]
        input: PathBuf,

        /// Parse the input as ASCII '0'/'1' text
        #[arg(long)]
        ascii: bool,

        /// Run only this test identifier (repeatable)
        #[arg(long = "test")]
        tests: Vec<String>,
    },

    /// Run the battery over every sample in a file: pass rate and q-value uniformity
    Battery {
        /// Bits per sample (20000 or 1000000)
        #[arg(long, default_value = "1000000")]
        length: usize,

        /// Input file: raw bytes (MSB first) or, with --ascii, '0'/'1' text
        #[arg(long)]
        input: PathBuf,

        /// Parse the input as ASCII '0'/'1' text
        #[arg(long)]
        ascii: bool,

        /// Run only this test identifier (repeatable)
        #[arg(long = "test")]
        tests: Vec<String>,

        /// Write the full report as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Runner configuration JSON (significance, intervals, uniformity_threshold, parallel)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the significance level from the config
        #[arg(long)]
        significance: Option<f64>,

        /// Run samples on one thread
        #[arg(long)]
        serial: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::List { length } => commands::list::run(length),
        Commands::Check {
            length,
            input,
            ascii,
            tests,
        } => commands::check::run(length, &input, ascii, &tests),
        Commands::Battery {
            length,
            input,
            ascii,
            tests,
            output,
            config,
            significance,
            serial,
        } => commands::battery::run(commands::battery::BatteryCommandConfig {
            length,
            input: &input,
            ascii,
            tests: &tests,
            output_path: output.as_deref(),
            config_path: config.as_deref(),
            serial,
            significance,
        }),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
