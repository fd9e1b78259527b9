use std::fmt;

use der::asn1::ObjectIdentifier;

use super::{HashAlgorithm, KeyType};
use crate::domain::constants;

/// Signature verification scheme selected from a `SignerInfo`'s digest and
/// signature algorithm identifiers.
///
/// Only PKCS#1 v1.5 RSA ("digest encryption") is supported. The plain
/// `rsaEncryption` identifier combines with any supported digest; the
/// combined `shaNNNWithRSAEncryption` identifiers are accepted only when
/// their hash agrees with the declared digest algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    RsaPkcs1(HashAlgorithm),
}

impl SignatureScheme {
    #[must_use]
    pub fn select(digest: HashAlgorithm, signature_algorithm: &ObjectIdentifier) -> Option<Self> {
        if *signature_algorithm == constants::RSA_ENCRYPTION {
            return Some(SignatureScheme::RsaPkcs1(digest));
        }
        let combined = match digest {
            HashAlgorithm::Sha256 => constants::SHA256_WITH_RSA_ENCRYPTION,
            HashAlgorithm::Sha384 => constants::SHA384_WITH_RSA_ENCRYPTION,
            HashAlgorithm::Sha512 => constants::SHA512_WITH_RSA_ENCRYPTION,
        };
        (*signature_algorithm == combined).then_some(SignatureScheme::RsaPkcs1(digest))
    }

    /// True if `oid` names a member of the supported signature family,
    /// independent of the digest it is paired with.
    #[must_use]
    pub fn is_supported_algorithm(oid: &ObjectIdentifier) -> bool {
        [
            constants::RSA_ENCRYPTION,
            constants::SHA256_WITH_RSA_ENCRYPTION,
            constants::SHA384_WITH_RSA_ENCRYPTION,
            constants::SHA512_WITH_RSA_ENCRYPTION,
        ]
        .contains(oid)
    }

    #[must_use]
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        match self {
            SignatureScheme::RsaPkcs1(hash) => *hash,
        }
    }

    #[must_use]
    pub fn key_type(&self) -> KeyType {
        match self {
            SignatureScheme::RsaPkcs1(_) => KeyType::Rsa,
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureScheme::RsaPkcs1(hash) => write!(f, "RSA_EMSA_PKCS1_{hash}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsa_encryption_combines_with_any_digest() {
        for digest in [
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ] {
            assert_eq!(
                SignatureScheme::select(digest, &constants::RSA_ENCRYPTION),
                Some(SignatureScheme::RsaPkcs1(digest))
            );
        }
    }

    #[test]
    fn combined_identifier_must_agree_with_digest() {
        assert_eq!(
            SignatureScheme::select(HashAlgorithm::Sha256, &constants::SHA256_WITH_RSA_ENCRYPTION),
            Some(SignatureScheme::RsaPkcs1(HashAlgorithm::Sha256))
        );
        assert_eq!(
            SignatureScheme::select(HashAlgorithm::Sha384, &constants::SHA256_WITH_RSA_ENCRYPTION),
            None
        );
    }

    #[test]
    fn ecdsa_is_not_supported() {
        assert!(!SignatureScheme::is_supported_algorithm(&constants::ECDSA_WITH_SHA256));
        assert_eq!(
            SignatureScheme::select(HashAlgorithm::Sha256, &constants::ECDSA_WITH_SHA256),
            None
        );
    }

    #[test]
    fn scheme_targets_rsa_keys() {
        let scheme = SignatureScheme::RsaPkcs1(HashAlgorithm::Sha512);
        assert_eq!(scheme.key_type(), KeyType::Rsa);
        assert_eq!(scheme.hash_algorithm(), HashAlgorithm::Sha512);
        assert_eq!(scheme.to_string(), "RSA_EMSA_PKCS1_sha512");
    }
}
