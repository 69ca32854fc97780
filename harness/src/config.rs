//! Suite configuration.

use crate::{fixture::MAX_BATCH_SIZE, runner::RunConfig, Error};
use std::fmt::{self, Display};

/// Batch sizes exercised by default.
pub const DEFAULT_BATCH_SIZES: [usize; 6] = [1, 2, 4, 8, 16, 32];

/// How signatures are handed to the primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// One signature per call.
    Single,
    /// Every record of the fixture in one call.
    Batch,
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Single => write!(f, "single"),
            Mode::Batch => write!(f, "batch"),
        }
    }
}

/// Name under which `mode` at `batch_size` is reported.
pub fn name(mode: Mode, batch_size: usize) -> String {
    match mode {
        Mode::Single => "schnorr_verify".to_string(),
        Mode::Batch => format!("schnorr_verify_batch{batch_size}"),
    }
}

/// A single named entry of the suite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Benchmark {
    pub name: String,
    pub mode: Mode,
    pub batch_size: usize,
}

impl Benchmark {
    pub fn new(mode: Mode, batch_size: usize) -> Self {
        Self {
            name: name(mode, batch_size),
            mode,
            batch_size,
        }
    }
}

/// Configuration of a suite run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Run the single-signature benchmark before any batch.
    pub single: bool,
    /// Batch sizes to exercise, in order.
    pub batch_sizes: Vec<usize>,
    /// Driver settings shared by every benchmark.
    pub run: RunConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            single: true,
            batch_sizes: DEFAULT_BATCH_SIZES.to_vec(),
            run: RunConfig::default(),
        }
    }
}

impl Config {
    /// Ensure every benchmark can run at least one iteration.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(size) = self
            .batch_sizes
            .iter()
            .find(|size| !(1..=MAX_BATCH_SIZE).contains(*size))
        {
            return Err(Error::InvalidBatchSize(*size));
        }
        if self.run.samples == 0 {
            return Err(Error::InvalidSamples);
        }
        let largest = self.batch_sizes.iter().copied().max().unwrap_or(1);
        if self.run.operations < largest {
            return Err(Error::InvalidOperations(self.run.operations));
        }
        Ok(())
    }

    /// Expand into the ordered list of benchmarks.
    pub fn benchmarks(&self) -> Vec<Benchmark> {
        let single = self.single.then(|| Benchmark::new(Mode::Single, 1));
        let batches = self
            .batch_sizes
            .iter()
            .map(|&batch_size| Benchmark::new(Mode::Batch, batch_size));
        single.into_iter().chain(batches).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_benchmarks() {
        let names: Vec<_> = Config::default()
            .benchmarks()
            .into_iter()
            .map(|benchmark| benchmark.name)
            .collect();
        assert_eq!(
            names,
            [
                "schnorr_verify",
                "schnorr_verify_batch1",
                "schnorr_verify_batch2",
                "schnorr_verify_batch4",
                "schnorr_verify_batch8",
                "schnorr_verify_batch16",
                "schnorr_verify_batch32",
            ]
        );
    }

    #[test]
    fn test_benchmarks_without_single() {
        let config = Config {
            single: false,
            batch_sizes: vec![64],
            ..Default::default()
        };
        assert_eq!(
            config.benchmarks(),
            vec![Benchmark {
                name: "schnorr_verify_batch64".to_string(),
                mode: Mode::Batch,
                batch_size: 64,
            }]
        );
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let config = Config {
            batch_sizes: vec![1, 65],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidBatchSize(65))
        ));

        let config = Config {
            batch_sizes: vec![0],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidBatchSize(0))));

        let mut config = Config::default();
        config.run.samples = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidSamples)));

        let mut config = Config::default();
        config.run.operations = 16;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidOperations(16))
        ));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Single.to_string(), "single");
        assert_eq!(Mode::Batch.to_string(), "batch");
    }
}
