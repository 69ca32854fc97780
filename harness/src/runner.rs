//! Repetition driver.
//!
//! [run_benchmark] calls [Body::setup] once, runs a number of untimed warmup bodies, then times
//! each of `samples` bodies and reports the per-operation minimum, average, and maximum. The
//! first error returned by any stage aborts the run.

use crate::Error;
use std::{
    fmt::{self, Display},
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Driver settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Untimed runs performed after setup.
    pub warmup: u32,
    /// Timed runs.
    pub samples: u32,
    /// Operations performed by one run (used to normalize timings).
    pub operations: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            warmup: 1,
            samples: 10,
            operations: crate::perturb::OPERATIONS,
        }
    }
}

/// State and callbacks of a benchmark.
pub trait Body {
    /// Prepare state before any run. Not timed.
    fn setup(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// A single run. Timed.
    fn run(&mut self) -> Result<(), Error>;

    /// Check or release state after the last run. Not timed.
    fn teardown(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Per-operation timings of a completed benchmark.
#[derive(Clone, Debug)]
pub struct Report {
    pub name: String,
    pub samples: u32,
    pub min: Duration,
    pub avg: Duration,
    pub max: Duration,
}

fn micros(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000_000.0
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: min {:.1}us / avg {:.1}us / max {:.1}us",
            self.name,
            micros(self.min),
            micros(self.avg),
            micros(self.max)
        )
    }
}

/// Drive `body` according to `config`.
pub fn run_benchmark<B: Body>(
    name: &str,
    body: &mut B,
    config: &RunConfig,
) -> Result<Report, Error> {
    if config.samples == 0 {
        return Err(Error::InvalidSamples);
    }
    if config.operations == 0 {
        return Err(Error::InvalidOperations(config.operations));
    }

    body.setup()?;
    for _ in 0..config.warmup {
        body.run()?;
    }

    let mut min = Duration::MAX;
    let mut max = Duration::ZERO;
    let mut total = Duration::ZERO;
    for sample in 0..config.samples {
        let start = Instant::now();
        body.run()?;
        let elapsed = start.elapsed();
        debug!(name, sample, ?elapsed, "sample complete");
        min = min.min(elapsed);
        max = max.max(elapsed);
        total += elapsed;
    }
    body.teardown()?;

    let operations = config.operations as f64;
    let report = Report {
        name: name.to_string(),
        samples: config.samples,
        min: min.div_f64(operations),
        avg: (total / config.samples).div_f64(operations),
        max: max.div_f64(operations),
    };
    info!(
        name,
        min = ?report.min,
        avg = ?report.avg,
        max = ?report.max,
        "benchmark complete"
    );
    Ok(report)
}
