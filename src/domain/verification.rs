//! Verification domain types for PKCS#7 signed-data containers.
//!
//! Aggregates the outcome of enumerating a container's signers; the
//! cryptographic work itself happens in the services layer. This keeps the
//! domain layer free of direct crypto dependencies while providing a stable
//! reporting contract to higher level workflows.

use super::auth::AuthConfig;
use super::pkcs7::ContentType;
use crate::infra::error::Pkcs7Error;

/// A signer that verified, with the index it occupies in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSigner {
    pub index: usize,
    pub auth: AuthConfig,
}

/// A signer that was skipped during enumeration and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerRejection {
    pub index: usize,
    pub reason: Pkcs7Error,
}

/// Result of verifying a PKCS#7 container.
///
/// Each field represents a specific aspect of the verification process:
/// - `content_type`: outer content type of the container
/// - `signer_count`: number of `SignerInfo` entries present
/// - `verified`: signers whose signature and messageDigest both verified
/// - `rejections`: signers skipped, with the failure that disqualified them
/// - `content_len`: length of the embedded content, when available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub content_type: ContentType,
    pub signer_count: usize,
    pub verified: Vec<VerifiedSigner>,
    pub rejections: Vec<SignerRejection>,
    pub content_len: Option<usize>,
}

impl VerificationReport {
    #[must_use]
    pub fn new(content_type: ContentType, signer_count: usize, content_len: Option<usize>) -> Self {
        Self {
            content_type,
            signer_count,
            verified: Vec::new(),
            rejections: Vec::new(),
            content_len,
        }
    }

    /// At least one signer verified.
    #[must_use]
    pub fn success(&self) -> bool {
        !self.verified.is_empty()
    }

    /// Every signer present verified (and there was at least one).
    #[must_use]
    pub fn all_signers_valid(&self) -> bool {
        self.success() && self.verified.len() == self.signer_count
    }
}
