//! Binds a verified signature to the container content through the
//! messageDigest signed attribute.

use der::asn1::ObjectIdentifier;

use crate::adapters::crypto;
use crate::domain::pkcs7::SignerView;
use crate::infra::error::{Pkcs7Error, Pkcs7Result};
use crate::services::container::Pkcs7Container;
use crate::HashAlgorithm;

pub struct DigestBinder;

impl DigestBinder {
    /// Check that the signer's messageDigest equals the hash of the
    /// container content under `digest_algorithm`.
    pub fn verify(
        container: &Pkcs7Container,
        signer: &SignerView<'_>,
        digest_algorithm: &ObjectIdentifier,
    ) -> Pkcs7Result<()> {
        let claimed = signer.message_digest()?;
        let content = container.content_bytes().ok_or_else(|| {
            Pkcs7Error::DigestMismatch("container has no content to digest".into())
        })?;

        let Some(algo) = HashAlgorithm::from_oid(digest_algorithm) else {
            let name = crate::algorithm_name(digest_algorithm);
            log::warn!("hash algorithm {name} not supported");
            return Err(Pkcs7Error::UnsupportedAlgorithm(format!(
                "hash algorithm {name} not supported"
            )));
        };

        let actual = crypto::hash(algo, content)?;
        if !actual.matches(claimed) {
            log::warn!("invalid messageDigest");
            return Err(Pkcs7Error::DigestMismatch(format!(
                "expected {}, content hashes to {}",
                hex::encode(claimed),
                actual.to_hex()
            )));
        }
        log::debug!("messageDigest matches {actual:?}");
        Ok(())
    }
}
