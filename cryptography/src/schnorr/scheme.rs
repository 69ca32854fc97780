use crate::{utils::hex, BatchVerifier, Error};
use core::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::Deref,
};
use k256::{
    elliptic_curve::sec1::ToEncodedPoint,
    schnorr::{
        signature::{Signer as K256Signer, Verifier as K256Verifier},
        SigningKey, VerifyingKey,
    },
    SecretKey,
};
use rand::{CryptoRng, Rng};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a serialized private key.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Length of a SEC1 compressed public key (`0x02`/`0x03` prefix followed by x).
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;

/// Length of a SEC1 uncompressed public key (`0x04` prefix followed by x and y).
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Length of a BIP-340 signature.
pub const SIGNATURE_LENGTH: usize = 64;

const X_ONLY_LENGTH: usize = 32;

/// Schnorr Private Key over secp256k1.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    raw: [u8; PRIVATE_KEY_LENGTH],
    #[zeroize(skip)]
    key: SigningKey,
    #[zeroize(skip)]
    secret: SecretKey,
}

impl crate::PrivateKey for PrivateKey {}

impl crate::Signer for PrivateKey {
    type Signature = Signature;
    type PublicKey = PublicKey;

    fn sign(&self, msg: &[u8]) -> Self::Signature {
        let sig: k256::schnorr::Signature = K256Signer::sign(&self.key, msg);
        Signature::from(sig)
    }

    fn public_key(&self) -> Self::PublicKey {
        self.public_key_sec1(true)
    }
}

impl crate::PrivateKeyExt for PrivateKey {
    fn from_rng<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        // Out-of-range scalars are vanishingly rare, so rejection sampling terminates quickly
        loop {
            let mut raw = [0u8; PRIVATE_KEY_LENGTH];
            rng.fill_bytes(&mut raw);
            if let Ok(key) = Self::from_bytes(raw) {
                return key;
            }
        }
    }
}

impl PrivateKey {
    /// Parse a private key from its big-endian scalar encoding.
    ///
    /// Fails with [Error::InvalidPrivateKey] if the scalar is zero or not below the group order.
    pub fn from_bytes(raw: [u8; PRIVATE_KEY_LENGTH]) -> Result<Self, Error> {
        let key = SigningKey::from_bytes(&raw).map_err(|_| Error::InvalidPrivateKey)?;
        let secret = SecretKey::from_slice(&raw).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self { raw, key, secret })
    }

    /// Derive the [PublicKey] in the requested SEC1 form.
    pub fn public_key_sec1(&self, compressed: bool) -> PublicKey {
        let encoded = self.secret.public_key().to_encoded_point(compressed);
        let bytes = encoded.as_bytes();
        let mut raw = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        raw[..bytes.len()].copy_from_slice(bytes);
        PublicKey {
            raw,
            len: bytes.len(),
            key: *self.key.verifying_key(),
        }
    }
}

impl Eq for PrivateKey {}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl AsRef<[u8]> for PrivateKey {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}

/// Schnorr Public Key over secp256k1, kept in its SEC1 encoding.
///
/// Verification only depends on the x-coordinate (BIP-340), so the compressed and uncompressed
/// encodings of the same point verify identically.
#[derive(Clone)]
pub struct PublicKey {
    raw: [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH],
    len: usize,
    key: VerifyingKey,
}

impl crate::PublicKey for PublicKey {}

impl crate::Verifier for PublicKey {
    type Signature = Signature;

    fn verify(&self, msg: &[u8], sig: &Self::Signature) -> bool {
        K256Verifier::verify(&self.key, msg, &sig.signature).is_ok()
    }
}

impl PublicKey {
    /// Parse a SEC1 encoded public key (33 or 65 bytes).
    pub fn from_sec1(bytes: &[u8]) -> Result<Self, Error> {
        match (bytes.len(), bytes.first().copied()) {
            (COMPRESSED_PUBLIC_KEY_LENGTH, Some(0x02 | 0x03)) => {}
            (UNCOMPRESSED_PUBLIC_KEY_LENGTH, Some(0x04)) => {
                // Only check y against the curve equation. The x-only key below lifts x.
                k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| Error::InvalidPublicKey)?;
            }
            _ => return Err(Error::InvalidPublicKey),
        }
        let key = VerifyingKey::from_bytes(&bytes[1..1 + X_ONLY_LENGTH])
            .map_err(|_| Error::InvalidPublicKey)?;

        let mut raw = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        raw[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            raw,
            len: bytes.len(),
            key,
        })
    }

    /// Returns the x-only (BIP-340) form of the key.
    pub fn x_only(&self) -> [u8; X_ONLY_LENGTH] {
        self.key.to_bytes().into()
    }

    /// Returns whether the key is held in compressed form.
    pub fn is_compressed(&self) -> bool {
        self.len == COMPRESSED_PUBLIC_KEY_LENGTH
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ref().hash(state);
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.raw[..self.len]
    }
}

impl Deref for PublicKey {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        self.as_ref()
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(self.as_ref()))
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(self.as_ref()))
    }
}

/// Schnorr Signature over secp256k1 (64 bytes as per BIP-340).
#[derive(Clone, Eq, PartialEq)]
pub struct Signature {
    raw: [u8; SIGNATURE_LENGTH],
    signature: k256::schnorr::Signature,
}

impl crate::Signature for Signature {}

impl TryFrom<&[u8; SIGNATURE_LENGTH]> for Signature {
    type Error = Error;

    fn try_from(raw: &[u8; SIGNATURE_LENGTH]) -> Result<Self, Self::Error> {
        let signature = k256::schnorr::Signature::try_from(raw.as_slice())
            .map_err(|_| Error::InvalidSignature)?;
        Ok(Self {
            raw: *raw,
            signature,
        })
    }
}

impl From<k256::schnorr::Signature> for Signature {
    fn from(value: k256::schnorr::Signature) -> Self {
        let raw = value.to_bytes();
        Self {
            raw,
            signature: value,
        }
    }
}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Deref for Signature {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.raw
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}

/// Schnorr Batch Verifier.
///
/// Every queued item is verified, even after an invalid one has been found, so the work done
/// does not depend on where (or whether) the batch fails. The outcome is `true` iff every item
/// verifies on its own.
///
/// Consecutive items over the same message share one stored copy of it.
#[derive(Default)]
pub struct Batch {
    messages: Vec<Vec<u8>>,
    items: Vec<(usize, PublicKey, Signature)>,
}

impl Batch {
    /// Create a batch with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Vec::new(),
            items: Vec::with_capacity(capacity),
        }
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether no items are queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BatchVerifier<PublicKey> for Batch {
    fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, message: &[u8], public_key: &PublicKey, signature: &Signature) -> bool {
        if self.messages.last().map(Vec::as_slice) != Some(message) {
            self.messages.push(message.to_vec());
        }
        let index = self.messages.len() - 1;
        self.items
            .push((index, public_key.clone(), signature.clone()));
        true
    }

    fn verify(self) -> bool {
        self.items
            .iter()
            .fold(true, |valid, (index, public_key, signature)| {
                crate::Verifier::verify(public_key, &self.messages[*index], signature) & valid
            })
    }
}
