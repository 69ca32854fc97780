//! Timed verification loops that double as correctness checks.
//!
//! Each iteration corrupts one byte of the first record's signature (see [Perturbation]),
//! verifies, restores the byte, and compares the outcome with [Perturbation::expected]. Any
//! disagreement is returned as [Error::Mismatch] and must end the run.

use crate::{
    config::{self, Mode},
    fixture::BatchFixture,
    perturb::{iterations, Perturbation},
    Error,
};
use sigbench_cryptography::{
    schnorr::{SIGNATURE_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH},
    Context,
};

fn check(
    mode: Mode,
    batch_size: usize,
    iteration: usize,
    perturbation: Perturbation,
    actual: bool,
) -> Result<(), Error> {
    let expected = perturbation.expected();
    if actual != expected {
        return Err(Error::Mismatch {
            name: config::name(mode, batch_size),
            mode,
            batch_size,
            iteration,
            offset: perturbation.offset,
            delta: perturbation.delta,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Refuse loops that would check nothing.
fn checked_iterations(operations: usize, batch_size: usize) -> Result<usize, Error> {
    match iterations(operations, batch_size) {
        0 => Err(Error::InvalidOperations(operations)),
        n => Ok(n),
    }
}

/// Verify the first record of `fixture` `operations / batch_size` times.
///
/// Returns the number of iterations performed, failing with [Error::InvalidOperations] if
/// `operations < batch_size`.
pub fn verify_single(
    context: &Context,
    fixture: &mut BatchFixture,
    operations: usize,
) -> Result<usize, Error> {
    let batch_size = fixture.batch_size();
    let message = *fixture.message();
    let target = fixture.target_mut();
    let iterations = checked_iterations(operations, batch_size)?;
    for iteration in 0..iterations {
        let perturbation = Perturbation::at(iteration);
        perturbation.apply(&mut target.signature);
        let actual = context.verify(
            &message,
            &target.signature,
            &target.public_key,
            target.public_key_len,
        );
        perturbation.apply(&mut target.signature);
        check(Mode::Single, batch_size, iteration, perturbation, actual)?;
    }
    Ok(iterations)
}

/// Parallel arrays over a [BatchFixture], in record order, as taken by
/// [Context::verify_batch].
///
/// Built once per configuration, before timing starts. Slot 0 of `signatures` is the
/// perturbation target in batched mode.
#[derive(Clone, Debug)]
pub struct BatchView {
    signatures: Vec<[u8; SIGNATURE_LENGTH]>,
    public_keys: Vec<[u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH]>,
    public_key_lens: Vec<usize>,
}

impl BatchView {
    pub fn new(fixture: &BatchFixture) -> Self {
        let records = fixture.records();
        Self {
            signatures: records.iter().map(|record| record.signature).collect(),
            public_keys: records.iter().map(|record| record.public_key).collect(),
            public_key_lens: records.iter().map(|record| record.public_key_len).collect(),
        }
    }

    /// Number of entries.
    pub(crate) fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Returns whether the view still mirrors `fixture` exactly.
    pub fn is_consistent(&self, fixture: &BatchFixture) -> bool {
        let records = fixture.records();
        self.len() == records.len()
            && records.iter().enumerate().all(|(i, record)| {
                self.signatures[i] == record.signature
                    && self.public_keys[i] == record.public_key
                    && self.public_key_lens[i] == record.public_key_len
            })
    }
}

/// Verify every record of `fixture` at once, `operations / batch_size` times.
///
/// Only `view`'s copy of the first signature is perturbed. Returns the number of iterations
/// performed, failing with [Error::InvalidOperations] if `operations < batch_size`.
pub fn verify_batch(
    context: &Context,
    fixture: &BatchFixture,
    view: &mut BatchView,
    operations: usize,
) -> Result<usize, Error> {
    let batch_size = view.len();
    let message = fixture.message();
    let iterations = checked_iterations(operations, batch_size)?;
    for iteration in 0..iterations {
        let perturbation = Perturbation::at(iteration);
        perturbation.apply(&mut view.signatures[0]);
        let actual = context.verify_batch(
            message,
            &view.signatures,
            &view.public_keys,
            &view.public_key_lens,
        );
        perturbation.apply(&mut view.signatures[0]);
        check(Mode::Batch, batch_size, iteration, perturbation, actual)?;
    }
    Ok(iterations)
}
