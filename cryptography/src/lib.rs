//! Generate keys, sign 32-byte messages, and verify secp256k1 Schnorr signatures (individually or
//! in batches).
//!
//! Every primitive is reachable through an explicitly owned [Context], which is created once and
//! passed by reference to each call. The typed [schnorr] scheme underneath implements the
//! [Signer], [Verifier], and [BatchVerifier] traits.

use rand::{CryptoRng, Rng, SeedableRng};
use thiserror::Error;

mod context;
pub use context::{Capabilities, Context};
pub mod schnorr;
pub mod utils;

/// Length of a message accepted by [Context] primitives.
pub const MESSAGE_LENGTH: usize = 32;

/// Errors that can occur when creating keys or signatures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("context missing capability: {0}")]
    MissingCapability(&'static str),
}

/// Produces [Signature]s over messages that can be verified with a corresponding [PublicKey].
pub trait Signer: Clone + 'static {
    /// The type of [Signature] produced by this [Signer].
    type Signature: Signature;

    /// The corresponding [PublicKey] type.
    type PublicKey: PublicKey<Signature = Self::Signature>;

    /// Returns the [PublicKey] corresponding to this [Signer].
    fn public_key(&self) -> Self::PublicKey;

    /// Sign a message.
    ///
    /// The message should not be hashed prior to calling this function. If a particular scheme
    /// requires a payload to be hashed before it is signed, it will be done internally.
    fn sign(&self, msg: &[u8]) -> Self::Signature;
}

/// A [Signer] that can be serialized/deserialized.
pub trait PrivateKey: Signer + Sized + PartialEq + AsRef<[u8]> {}

/// A [PrivateKey] that can be generated from a seed or RNG.
pub trait PrivateKeyExt: PrivateKey {
    /// Create a [PrivateKey] from a seed.
    ///
    /// # Warning
    ///
    /// This function is insecure and should only be used for examples
    /// and testing.
    fn from_seed(seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    /// Create a fresh [PrivateKey] using the supplied RNG.
    fn from_rng<R: Rng + CryptoRng>(rng: &mut R) -> Self;
}

/// Verifies [Signature]s over messages.
pub trait Verifier {
    /// The type of [Signature] that this verifier can verify.
    type Signature: Signature;

    /// Verify that a [Signature] is a valid over a given message.
    fn verify(&self, msg: &[u8], sig: &Self::Signature) -> bool;
}

/// A [PublicKey], able to verify [Signature]s.
pub trait PublicKey: Verifier + Sized + Clone + PartialEq + AsRef<[u8]> {}

/// A [Signature] over a message.
pub trait Signature: Sized + Clone + PartialEq + AsRef<[u8]> {}

/// Verifies whether all [Signature]s are correct or that some [Signature] is incorrect.
pub trait BatchVerifier<K: PublicKey> {
    /// Create a new batch verifier.
    fn new() -> Self;

    /// Append item to the batch.
    ///
    /// Returns `false` if the item could not be queued (the batch is left unchanged).
    fn add(&mut self, message: &[u8], public_key: &K, signature: &K::Signature) -> bool;

    /// Verify all items added to the batch.
    ///
    /// Returns `true` if all items are valid, `false` otherwise. Implementations may stop at the
    /// first invalid item.
    fn verify(self) -> bool;
}
