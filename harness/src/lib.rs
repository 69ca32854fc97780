//! Benchmark Schnorr signature verification while proving, on every iteration, that the primitive
//! accepts exactly the signatures it should.
//!
//! A deterministic [BatchFixture] of up to 64 signed records is built once per configuration.
//! The timed loop then corrupts one byte of the first signature, verifies (alone or together with
//! the rest of the batch), restores the byte, and fails the run if the outcome differs from the
//! expectation: valid iff the corruption was a no-op.
//!
//! # Example
//! ```rust
//! use sigbench::{run_suite, Config, RunConfig};
//! use sigbench_cryptography::Context;
//!
//! let context = Context::signing_and_verification();
//! let config = Config {
//!     single: true,
//!     batch_sizes: vec![2],
//!     run: RunConfig {
//!         warmup: 0,
//!         samples: 1,
//!         operations: 8,
//!     },
//! };
//! let reports = run_suite(&context, &config).expect("suite failed");
//! assert_eq!(reports.len(), 2);
//! ```

use sigbench_cryptography::Context;
use thiserror::Error;
use tracing::info;

pub mod config;
pub use config::{Benchmark, Config, Mode};
pub mod exercise;
pub use exercise::BatchView;
pub mod fixture;
pub use fixture::{BatchFixture, SignatureRecord, MAX_BATCH_SIZE};
pub mod perturb;
pub use perturb::Perturbation;
pub mod runner;
pub use runner::{run_benchmark, Body, Report, RunConfig};

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid batch size: {0} (expected 1..={max})", max = MAX_BATCH_SIZE)]
    InvalidBatchSize(usize),
    #[error("invalid sample count: must be positive")]
    InvalidSamples,
    #[error("invalid operation count: {0} (must cover the largest batch)")]
    InvalidOperations(usize),
    #[error("failed to build fixture record {index}: {source}")]
    Fixture {
        index: usize,
        source: sigbench_cryptography::Error,
    },
    #[error("{name}: {mode} verification mismatch (batch_size={batch_size} iteration={iteration} offset={offset} delta={delta:#04x}): expected {expected}, got {actual}")]
    Mismatch {
        name: String,
        mode: Mode,
        batch_size: usize,
        iteration: usize,
        offset: usize,
        delta: u8,
        expected: bool,
        actual: bool,
    },
    #[error("fixture not restored after {0}")]
    NotPristine(String),
    #[error("benchmark not set up: {0}")]
    Unprepared(String),
}

/// A [Benchmark] bound to its fixture.
struct Workload<'a> {
    context: &'a Context,
    benchmark: &'a Benchmark,
    operations: usize,
    fixture: Option<BatchFixture>,
    view: Option<BatchView>,
}

impl<'a> Workload<'a> {
    fn new(context: &'a Context, benchmark: &'a Benchmark, operations: usize) -> Self {
        Self {
            context,
            benchmark,
            operations,
            fixture: None,
            view: None,
        }
    }
}

fn unprepared(benchmark: &Benchmark) -> Error {
    Error::Unprepared(benchmark.name.clone())
}

impl Body for Workload<'_> {
    fn setup(&mut self) -> Result<(), Error> {
        let fixture = BatchFixture::build(self.context, self.benchmark.batch_size)?;
        if self.benchmark.mode == Mode::Batch {
            self.view = Some(BatchView::new(&fixture));
        }
        self.fixture = Some(fixture);
        Ok(())
    }

    fn run(&mut self) -> Result<(), Error> {
        let Some(fixture) = self.fixture.as_mut() else {
            return Err(unprepared(self.benchmark));
        };
        match self.benchmark.mode {
            Mode::Single => {
                exercise::verify_single(self.context, fixture, self.operations)?;
            }
            Mode::Batch => {
                let Some(view) = self.view.as_mut() else {
                    return Err(unprepared(self.benchmark));
                };
                exercise::verify_batch(self.context, fixture, view, self.operations)?;
            }
        }
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), Error> {
        let fixture = self.fixture.take().ok_or_else(|| unprepared(self.benchmark))?;
        let view_consistent = self
            .view
            .take()
            .map_or(true, |view| view.is_consistent(&fixture));
        if !view_consistent || !fixture.is_pristine(self.context) {
            return Err(Error::NotPristine(self.benchmark.name.clone()));
        }
        Ok(())
    }
}

/// Run every benchmark of `config` in order.
///
/// Stops at the first error.
pub fn run_suite(context: &Context, config: &Config) -> Result<Vec<Report>, Error> {
    config.validate()?;
    let benchmarks = config.benchmarks();
    info!(count = benchmarks.len(), ?config.run, "starting suite");

    let mut reports = Vec::with_capacity(benchmarks.len());
    for benchmark in &benchmarks {
        let mut workload = Workload::new(context, benchmark, config.run.operations);
        reports.push(run_benchmark(&benchmark.name, &mut workload, &config.run)?);
    }
    Ok(reports)
}
