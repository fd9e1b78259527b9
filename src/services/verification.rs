//! Verification service: loads a container and runs its signers through the
//! signature enumerator, collecting the outcome into a
//! `VerificationReport`.

use crate::adapters::trust_store::TrustStore;
use crate::domain::verification::{VerificationReport, VerifiedSigner};
use crate::infra::error::Pkcs7Result;
use crate::services::container::Pkcs7Container;

/// Stateless service verifying a DER PKCS#7 blob against a trust store.
pub struct VerificationService;

impl Default for VerificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Load `blob` and verify every signer against `trust`.
    ///
    /// Load failures are returned as errors. Signer failures are not: they
    /// appear as rejections in the report.
    pub fn verify<S>(&self, blob: &[u8], trust: &S) -> Pkcs7Result<VerificationReport>
    where
        S: TrustStore + ?Sized,
    {
        let container = Pkcs7Container::load(blob)?;
        let mut report = VerificationReport::new(
            container.content_type(),
            container.signer_count(),
            container.content_bytes().map(<[u8]>::len),
        );

        let mut enumerator = container.signature_enumerator(trust);
        while enumerator.advance().is_some() {
            if let (Some(index), Some(auth)) = (enumerator.current_index(), enumerator.current()) {
                report.verified.push(VerifiedSigner {
                    index,
                    auth: auth.clone(),
                });
            }
        }
        report.rejections = enumerator.rejections().to_vec();

        log::info!(
            "{} of {} signer(s) verified",
            report.verified.len(),
            report.signer_count
        );
        Ok(report)
    }
}
