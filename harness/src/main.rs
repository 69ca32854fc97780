//! Run the Schnorr verification suite and print one report per benchmark.

use clap::Parser;
use sigbench::{run_suite, Config, RunConfig};
use sigbench_cryptography::Context;
use std::process;
use tracing::{error, Level};

/// Benchmark Schnorr signature verification while checking every outcome.
#[derive(Parser)]
#[command(name = "sigbench", version, about)]
struct App {
    /// The log level for traces. opts: (error, debug, info, warn, trace)
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,

    /// Batch sizes to exercise (each in 1..=64).
    #[arg(long, value_delimiter = ',', default_values_t = sigbench::config::DEFAULT_BATCH_SIZES)]
    batch_sizes: Vec<usize>,

    /// Skip the single-signature benchmark.
    #[arg(long)]
    no_single: bool,

    /// Untimed runs per benchmark.
    #[arg(long, default_value_t = 1)]
    warmup: u32,

    /// Timed runs per benchmark.
    #[arg(long, default_value_t = 10)]
    samples: u32,

    /// Signatures verified per run.
    #[arg(long, default_value_t = sigbench::perturb::OPERATIONS)]
    operations: usize,
}

fn main() {
    let app = App::parse();

    // Create logger
    tracing_subscriber::fmt().with_max_level(app.log_level).init();

    let config = Config {
        single: !app.no_single,
        batch_sizes: app.batch_sizes,
        run: RunConfig {
            warmup: app.warmup,
            samples: app.samples,
            operations: app.operations,
        },
    };
    let context = Context::signing_and_verification();
    match run_suite(&context, &config) {
        Ok(reports) => {
            for report in reports {
                println!("{report}");
            }
        }
        Err(err) => {
            error!(%err, "suite aborted");
            process::exit(1);
        }
    }
}
