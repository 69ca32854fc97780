//! Deterministic signature fixtures.
//!
//! A [BatchFixture] holds up to [MAX_BATCH_SIZE] records, each signing the same 32-byte message
//! with its own key. Keys and the message are derived from indices rather than an RNG, so every
//! build of the same size is bit-for-bit identical.

use crate::Error;
use sigbench_cryptography::{
    schnorr::{PRIVATE_KEY_LENGTH, SIGNATURE_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH},
    Context, MESSAGE_LENGTH,
};
use std::time::Instant;
use tracing::debug;

/// Largest supported batch.
pub const MAX_BATCH_SIZE: usize = 64;

/// One party's key material and signature over the shared message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureRecord {
    pub private_key: [u8; PRIVATE_KEY_LENGTH],
    pub signature: [u8; SIGNATURE_LENGTH],
    /// SEC1 encoding, valid up to `public_key_len`.
    pub public_key: [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH],
    pub public_key_len: usize,
}

impl SignatureRecord {
    /// The used portion of `public_key`.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key[..self.public_key_len]
    }
}

/// The records exercised together by one benchmark configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchFixture {
    message: [u8; MESSAGE_LENGTH],
    records: Vec<SignatureRecord>,
}

impl BatchFixture {
    /// Build a fixture of `batch_size` records.
    ///
    /// Record `k` uses the private key `[33 + k, 34 + k, .., 64 + k]` and a compressed public key.
    /// Any signing or key derivation failure is returned as [Error::Fixture].
    pub fn build(context: &Context, batch_size: usize) -> Result<Self, Error> {
        if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
            return Err(Error::InvalidBatchSize(batch_size));
        }

        let start = Instant::now();
        let message = message();
        let records = (0..batch_size)
            .map(|index| {
                let private_key = private_key(index);
                let signature = context
                    .sign(&message, &private_key)
                    .map_err(|source| Error::Fixture { index, source })?;
                let (public_key, public_key_len) = context
                    .derive_public_key(&private_key, true)
                    .map_err(|source| Error::Fixture { index, source })?;
                Ok(SignatureRecord {
                    private_key,
                    signature,
                    public_key,
                    public_key_len,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        debug!(batch_size, elapsed = ?start.elapsed(), "built fixture");

        Ok(Self { message, records })
    }

    /// The message every record signs.
    pub fn message(&self) -> &[u8; MESSAGE_LENGTH] {
        &self.message
    }

    /// Records in batch order.
    pub fn records(&self) -> &[SignatureRecord] {
        &self.records
    }

    /// Number of records.
    pub fn batch_size(&self) -> usize {
        self.records.len()
    }

    /// The only record ever perturbed.
    pub(crate) fn target_mut(&mut self) -> &mut SignatureRecord {
        // `build` never produces an empty fixture
        &mut self.records[0]
    }

    /// Returns whether every record still verifies on its own.
    pub fn is_pristine(&self, context: &Context) -> bool {
        self.records.iter().all(|record| {
            context.verify(
                &self.message,
                &record.signature,
                &record.public_key,
                record.public_key_len,
            )
        })
    }
}

fn message() -> [u8; MESSAGE_LENGTH] {
    core::array::from_fn(|i| 1 + i as u8)
}

fn private_key(index: usize) -> [u8; PRIVATE_KEY_LENGTH] {
    core::array::from_fn(|i| (33 + i + index) as u8)
}
