//! Signer resolution: find the trusted certificate whose key verifies a
//! signer's signature over its signed attributes.

use crate::adapters::crypto;
use crate::adapters::trust_store::TrustStore;
use crate::domain::auth::AuthConfig;
use crate::domain::crypto::SignatureScheme;
use crate::domain::pkcs7::{SignedAttributesCanonical, SignerView};
use crate::infra::error::{Pkcs7Error, Pkcs7Result};
use crate::HashAlgorithm;

/// Resolves signers against a trust store. Candidates are tried in store
/// order and the first one that verifies wins.
pub struct SignerResolver<'a, S: TrustStore + ?Sized> {
    trust: &'a S,
}

impl<'a, S: TrustStore + ?Sized> SignerResolver<'a, S> {
    #[must_use]
    pub fn new(trust: &'a S) -> Self {
        Self { trust }
    }

    /// Verify `signer` and return a clone of the matching candidate's
    /// authorization context.
    pub fn resolve(&self, signer: &SignerView<'_>, digest: HashAlgorithm) -> Pkcs7Result<AuthConfig> {
        let identity = signer.identity()?;
        let scheme = SignatureScheme::select(digest, signer.signature_algorithm()).ok_or_else(|| {
            Pkcs7Error::UnsupportedAlgorithm(format!(
                "{} cannot be combined with {digest}",
                crate::algorithm_name(signer.signature_algorithm())
            ))
        })?;

        let attrs = signer.signed_attributes().ok_or_else(|| {
            Pkcs7Error::TrustResolutionFailed("signer has no signed attributes".into())
        })?;
        let signed_bytes = SignedAttributesCanonical::from_attributes(attrs)?.to_set_der()?;

        let candidates = self.trust.find_trusted(scheme.key_type(), identity.serial());
        log::debug!(
            "{} trusted candidate(s) for {identity}, scheme {scheme}",
            candidates.len()
        );

        for candidate in candidates {
            let tbs = &candidate.certificate.tbs_certificate;
            if !identity.issued_by(&tbs.issuer) {
                log::debug!("skipping \"{}\": issuer \"{}\" differs", tbs.subject, tbs.issuer);
                continue;
            }
            if crypto::verify_signature(
                scheme,
                &signed_bytes,
                signer.signature(),
                &tbs.subject_public_key_info,
            ) {
                log::debug!("signature verified with \"{}\"", tbs.subject);
                return Ok(candidate.auth.clone());
            }
        }

        Err(Pkcs7Error::TrustResolutionFailed(format!(
            "no trusted certificate for {identity} verifies the signature"
        )))
    }
}
