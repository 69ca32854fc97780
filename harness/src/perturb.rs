//! Reversible single-byte corruption of a signature.
//!
//! Iteration `i` XORs byte `(i >> 8) % 64` with `i & 0xFF`. Consecutive iterations sweep all 256
//! values at one byte before moving to the next, and the zero value (every 256th iteration) leaves
//! the signature untouched. Applying the same [Perturbation] twice restores the original bytes.

use sigbench_cryptography::schnorr::SIGNATURE_LENGTH;

/// Total signatures verified by one run of the exerciser, regardless of batch size.
pub const OPERATIONS: usize = 20_000;

/// Number of loop iterations needed to verify `operations` signatures `batch_size` at a time.
pub fn iterations(operations: usize, batch_size: usize) -> usize {
    operations / batch_size
}

/// A byte offset into a signature and the value XORed into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Perturbation {
    pub offset: usize,
    pub delta: u8,
}

impl Perturbation {
    /// The perturbation applied at `iteration`.
    pub fn at(iteration: usize) -> Self {
        Self {
            offset: (iteration >> 8) % SIGNATURE_LENGTH,
            delta: (iteration & 0xFF) as u8,
        }
    }

    /// XOR `delta` into `signature[offset]`.
    pub fn apply(&self, signature: &mut [u8; SIGNATURE_LENGTH]) {
        signature[self.offset] ^= self.delta;
    }

    /// Whether the signature should verify while this perturbation is applied.
    pub fn expected(&self) -> bool {
        self.delta == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        assert_eq!(
            Perturbation::at(0),
            Perturbation {
                offset: 0,
                delta: 0
            }
        );
        assert_eq!(
            Perturbation::at(1),
            Perturbation {
                offset: 0,
                delta: 1
            }
        );
        assert_eq!(
            Perturbation::at(255),
            Perturbation {
                offset: 0,
                delta: 0xff
            }
        );
        assert_eq!(
            Perturbation::at(256),
            Perturbation {
                offset: 1,
                delta: 0
            }
        );
        assert_eq!(
            Perturbation::at(257),
            Perturbation {
                offset: 1,
                delta: 1
            }
        );

        // Offsets wrap around the signature
        assert_eq!(Perturbation::at(64 << 8).offset, 0);
        assert_eq!(Perturbation::at((65 << 8) + 3).offset, 1);
    }

    #[test]
    fn test_expected() {
        for i in 0..OPERATIONS {
            assert_eq!(Perturbation::at(i).expected(), i % 256 == 0);
        }
    }

    #[test]
    fn test_apply_twice_restores() {
        let original: [u8; SIGNATURE_LENGTH] = core::array::from_fn(|i| (i * 7) as u8);
        for i in 0..OPERATIONS {
            let perturbation = Perturbation::at(i);
            let mut signature = original;
            perturbation.apply(&mut signature);
            assert_eq!(signature != original, perturbation.delta != 0);
            perturbation.apply(&mut signature);
            assert_eq!(signature, original);
        }
    }

    #[test]
    fn test_only_one_byte_changes() {
        let original = [0u8; SIGNATURE_LENGTH];
        let perturbation = Perturbation::at(3 * 256 + 0x5a);
        let mut signature = original;
        perturbation.apply(&mut signature);
        for (i, byte) in signature.iter().enumerate() {
            if i == 3 {
                assert_eq!(*byte, 0x5a);
            } else {
                assert_eq!(*byte, 0);
            }
        }
    }

    #[test]
    fn test_iterations() {
        assert_eq!(iterations(OPERATIONS, 1), 20_000);
        assert_eq!(iterations(OPERATIONS, 2), 10_000);
        assert_eq!(iterations(OPERATIONS, 32), 625);
        assert_eq!(iterations(OPERATIONS, 64), 312);
    }
}
