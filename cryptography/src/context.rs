//! Byte-level primitives bound to an owned [Context].

use crate::{
    schnorr::{
        Batch, PrivateKey, PublicKey, Signature, PRIVATE_KEY_LENGTH, SIGNATURE_LENGTH,
        UNCOMPRESSED_PUBLIC_KEY_LENGTH,
    },
    BatchVerifier as _, Error, Signer as _, Verifier as _, MESSAGE_LENGTH,
};

/// Operations a [Context] is allowed to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Allow signing and public key derivation.
    pub sign: bool,
    /// Allow (batch) verification.
    pub verify: bool,
}

/// Handle through which every primitive is invoked.
///
/// A [Context] is created once and passed by reference to each call. A context without the
/// `verify` capability rejects every signature; one without the `sign` capability refuses to
/// sign or derive keys.
#[derive(Clone, Debug)]
pub struct Context {
    capabilities: Capabilities,
}

impl Context {
    /// Create a new [Context] with the given [Capabilities].
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    /// Create a [Context] that can both sign and verify.
    pub fn signing_and_verification() -> Self {
        Self::new(Capabilities {
            sign: true,
            verify: true,
        })
    }

    /// Create a [Context] that can only verify.
    pub fn verification_only() -> Self {
        Self::new(Capabilities {
            sign: false,
            verify: true,
        })
    }

    fn require_sign(&self) -> Result<(), Error> {
        if !self.capabilities.sign {
            return Err(Error::MissingCapability("sign"));
        }
        Ok(())
    }

    /// Sign `message` with `private_key`.
    ///
    /// Signing is deterministic: the same inputs always produce the same signature.
    pub fn sign(
        &self,
        message: &[u8; MESSAGE_LENGTH],
        private_key: &[u8; PRIVATE_KEY_LENGTH],
    ) -> Result<[u8; SIGNATURE_LENGTH], Error> {
        self.require_sign()?;
        let private_key = PrivateKey::from_bytes(*private_key)?;
        let signature = private_key.sign(message);
        let mut raw = [0u8; SIGNATURE_LENGTH];
        raw.copy_from_slice(signature.as_ref());
        Ok(raw)
    }

    /// Derive the SEC1 public key for `private_key`.
    ///
    /// Returns a buffer large enough for either encoding along with the number of bytes used
    /// (33 when `compressed`, 65 otherwise).
    pub fn derive_public_key(
        &self,
        private_key: &[u8; PRIVATE_KEY_LENGTH],
        compressed: bool,
    ) -> Result<([u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH], usize), Error> {
        self.require_sign()?;
        let public_key = PrivateKey::from_bytes(*private_key)?.public_key_sec1(compressed);
        let mut raw = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        raw[..public_key.len()].copy_from_slice(&public_key);
        Ok((raw, public_key.len()))
    }

    /// Verify `signature` over `message` against the first `public_key_len` bytes of
    /// `public_key`.
    ///
    /// Returns `false` for any malformed input.
    pub fn verify(
        &self,
        message: &[u8; MESSAGE_LENGTH],
        signature: &[u8; SIGNATURE_LENGTH],
        public_key: &[u8],
        public_key_len: usize,
    ) -> bool {
        if !self.capabilities.verify {
            return false;
        }
        let Some((public_key, signature)) = parse(signature, public_key, public_key_len) else {
            return false;
        };
        public_key.verify(message, &signature)
    }

    /// Verify a batch of signatures, all over the same `message`.
    ///
    /// Entry `i` pairs `signatures[i]` with the first `public_key_lens[i]` bytes of
    /// `public_keys[i]`. Returns `true` iff every entry verifies on its own. Every well-formed
    /// entry is verified even once the outcome is known; a malformed entry or slices of differing
    /// lengths reject the batch immediately.
    pub fn verify_batch(
        &self,
        message: &[u8; MESSAGE_LENGTH],
        signatures: &[[u8; SIGNATURE_LENGTH]],
        public_keys: &[[u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH]],
        public_key_lens: &[usize],
    ) -> bool {
        if !self.capabilities.verify {
            return false;
        }
        if signatures.len() != public_keys.len() || signatures.len() != public_key_lens.len() {
            return false;
        }

        let mut batch = Batch::with_capacity(signatures.len());
        for ((signature, public_key), public_key_len) in
            signatures.iter().zip(public_keys).zip(public_key_lens)
        {
            let Some((public_key, signature)) = parse(signature, public_key, *public_key_len)
            else {
                return false;
            };
            if !batch.add(message, &public_key, &signature) {
                return false;
            }
        }
        batch.verify()
    }
}

fn parse(
    signature: &[u8; SIGNATURE_LENGTH],
    public_key: &[u8],
    public_key_len: usize,
) -> Option<(PublicKey, Signature)> {
    let public_key = PublicKey::from_sec1(public_key.get(..public_key_len)?).ok()?;
    let signature = Signature::try_from(signature).ok()?;
    Some((public_key, signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schnorr::COMPRESSED_PUBLIC_KEY_LENGTH;

    const MESSAGE: [u8; MESSAGE_LENGTH] = [3u8; MESSAGE_LENGTH];

    fn private_key(seed: u8) -> [u8; PRIVATE_KEY_LENGTH] {
        let mut key = [0u8; PRIVATE_KEY_LENGTH];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = seed.wrapping_add(i as u8);
        }
        key
    }

    fn signed(
        context: &Context,
        seed: u8,
        compressed: bool,
    ) -> (
        [u8; SIGNATURE_LENGTH],
        [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH],
        usize,
    ) {
        let key = private_key(seed);
        let signature = context.sign(&MESSAGE, &key).unwrap();
        let (public_key, len) = context.derive_public_key(&key, compressed).unwrap();
        (signature, public_key, len)
    }

    #[test]
    fn test_sign_and_verify() {
        let context = Context::signing_and_verification();
        for compressed in [true, false] {
            let (signature, public_key, len) = signed(&context, 1, compressed);
            let expected = if compressed {
                COMPRESSED_PUBLIC_KEY_LENGTH
            } else {
                UNCOMPRESSED_PUBLIC_KEY_LENGTH
            };
            assert_eq!(len, expected);
            assert!(context.verify(&MESSAGE, &signature, &public_key, len));
        }
    }

    #[test]
    fn test_sign_deterministic() {
        let context = Context::signing_and_verification();
        let key = private_key(9);
        assert_eq!(
            context.sign(&MESSAGE, &key).unwrap(),
            context.sign(&MESSAGE, &key).unwrap()
        );
    }

    #[test]
    fn test_sign_invalid_key() {
        let context = Context::signing_and_verification();
        let zero = [0u8; PRIVATE_KEY_LENGTH];
        assert_eq!(context.sign(&MESSAGE, &zero), Err(Error::InvalidPrivateKey));
        assert_eq!(
            context.derive_public_key(&zero, true),
            Err(Error::InvalidPrivateKey)
        );
    }

    #[test]
    fn test_missing_capabilities() {
        let signer = Context::signing_and_verification();
        let (signature, public_key, len) = signed(&signer, 1, true);

        let verifier = Context::verification_only();
        assert_eq!(
            verifier.sign(&MESSAGE, &private_key(1)),
            Err(Error::MissingCapability("sign"))
        );
        assert_eq!(
            verifier.derive_public_key(&private_key(1), true),
            Err(Error::MissingCapability("sign"))
        );
        assert!(verifier.verify(&MESSAGE, &signature, &public_key, len));

        let neither = Context::new(Capabilities {
            sign: false,
            verify: false,
        });
        assert!(!neither.verify(&MESSAGE, &signature, &public_key, len));
        assert!(!neither.verify_batch(&MESSAGE, &[signature], &[public_key], &[len]));
    }

    #[test]
    fn test_verify_malformed() {
        let context = Context::signing_and_verification();
        let (signature, public_key, len) = signed(&context, 1, true);

        // Length longer than the buffer
        assert!(!context.verify(&MESSAGE, &signature, &public_key[..len], len + 1));

        // Length that is neither encoding
        assert!(!context.verify(&MESSAGE, &signature, &public_key, len - 1));

        // Corrupted prefix byte
        let mut bad_key = public_key;
        bad_key[0] = 0x05;
        assert!(!context.verify(&MESSAGE, &signature, &bad_key, len));

        // Wrong message
        assert!(!context.verify(&[4u8; MESSAGE_LENGTH], &signature, &public_key, len));
    }

    #[test]
    fn test_verify_batch() {
        let context = Context::signing_and_verification();
        let mut signatures = Vec::new();
        let mut public_keys = Vec::new();
        let mut lens = Vec::new();
        for seed in 1..=8 {
            let (signature, public_key, len) = signed(&context, seed, seed % 2 == 0);
            signatures.push(signature);
            public_keys.push(public_key);
            lens.push(len);
        }
        assert!(context.verify_batch(&MESSAGE, &signatures, &public_keys, &lens));

        // Any invalid entry fails the batch
        for i in 0..signatures.len() {
            let mut corrupted = signatures.clone();
            corrupted[i][SIGNATURE_LENGTH - 1] ^= 0x01;
            assert!(!context.verify_batch(&MESSAGE, &corrupted, &public_keys, &lens));
        }

        // Mismatched lengths are rejected
        assert!(!context.verify_batch(&MESSAGE, &signatures, &public_keys, &lens[1..]));
        assert!(!context.verify_batch(&MESSAGE, &signatures[1..], &public_keys, &lens));
    }

    #[test]
    fn test_verify_batch_swapped_keys() {
        let context = Context::signing_and_verification();
        let (signature_1, public_key_1, len_1) = signed(&context, 1, true);
        let (signature_2, public_key_2, len_2) = signed(&context, 2, true);
        assert!(!context.verify_batch(
            &MESSAGE,
            &[signature_1, signature_2],
            &[public_key_2, public_key_1],
            &[len_2, len_1],
        ));
    }
}
