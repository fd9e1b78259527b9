use std::fmt;

use super::HashAlgorithm;

/// Content digest paired with the algorithm that produced it.
///
/// Invariant: `bytes.len() == algo.digest_size()`.
#[derive(Clone, Eq, PartialEq)]
pub struct DigestBytes {
    algo: HashAlgorithm,
    bytes: Box<[u8]>,
}

impl DigestBytes {
    pub fn new(algo: HashAlgorithm, bytes: Vec<u8>) -> Result<Self, DigestBytesError> {
        if bytes.len() != algo.digest_size() {
            return Err(DigestBytesError::LengthMismatch {
                expected: algo.digest_size(),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            algo,
            bytes: bytes.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algo
    }
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte-for-byte comparison against a digest claimed by a signer.
    #[must_use]
    pub fn matches(&self, claimed: &[u8]) -> bool {
        *self.bytes == *claimed
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for DigestBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestBytes({}:{})", self.algo, self.to_hex())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DigestBytesError {
    #[error("digest length mismatch (expected {expected}, actual {actual})")]
    LengthMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = DigestBytes::new(HashAlgorithm::Sha384, vec![0u8; 32]).unwrap_err();
        assert_eq!(
            err,
            DigestBytesError::LengthMismatch {
                expected: 48,
                actual: 32
            }
        );
    }

    #[test]
    fn matches_only_identical_bytes() {
        let digest = DigestBytes::new(HashAlgorithm::Sha256, vec![0xAB; 32]).unwrap();
        assert!(digest.matches(&[0xAB; 32]));
        assert!(!digest.matches(&[0xAB; 31]));

        let mut flipped = [0xAB; 32];
        flipped[31] ^= 0x01;
        assert!(!digest.matches(&flipped));
    }
}
