//! Schnorr signatures over secp256k1 (BIP-340).
//!
//! This implementation uses the `k256` crate. Signing is deterministic (BIP-340 with zero
//! auxiliary randomness) so the same key and message always produce the same signature.
//!
//! Public keys are carried in their SEC1 encoding (33 bytes compressed or 65 bytes uncompressed)
//! and verified against their x-only form.
//!
//! # Example
//! ```rust
//! use sigbench_cryptography::{schnorr, PrivateKeyExt as _, Signer as _, Verifier as _};
//!
//! // Generate a new private key
//! let signer = schnorr::PrivateKey::from_seed(0);
//!
//! // Create a message to sign
//! let msg = [1u8; 32];
//!
//! // Sign the message
//! let signature = signer.sign(&msg);
//!
//! // Verify the signature
//! assert!(signer.public_key().verify(&msg, &signature));
//! ```

mod scheme;

pub use scheme::{
    Batch, PrivateKey, PublicKey, Signature, COMPRESSED_PUBLIC_KEY_LENGTH, PRIVATE_KEY_LENGTH,
    SIGNATURE_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};
