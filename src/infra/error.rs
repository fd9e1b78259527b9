//! Error types for PKCS#7 container loading and signature verification.
//!
//! Load-time variants (`MalformedEncoding`, `UnsupportedContentType`) abort
//! the operation. Per-signer variants are absorbed by the signature
//! enumerator and recorded as rejections.

use thiserror::Error;

/// Result type for PKCS#7 operations
pub type Pkcs7Result<T> = Result<T, Pkcs7Error>;

/// Error types for container parsing, signer verification and the ambient
/// configuration / trust store layers.
#[derive(Error, Debug, Clone, PartialEq, Eq, miette::Diagnostic)]
pub enum Pkcs7Error {
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Malformed signer identity: {0}")]
    MalformedSignerIdentity(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Trust resolution failed: {0}")]
    TrustResolutionFailed(String),

    #[error("Invalid messageDigest: {0}")]
    DigestMismatch(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Certificate error: {0}")]
    CertificateError(String),

    #[error("Cryptographic error: {0}")]
    CryptographicError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Pkcs7Error {
    /// True for failures that only disqualify a single signer.
    #[must_use]
    pub fn is_signer_local(&self) -> bool {
        matches!(
            self,
            Pkcs7Error::MalformedSignerIdentity(_)
                | Pkcs7Error::UnsupportedAlgorithm(_)
                | Pkcs7Error::TrustResolutionFailed(_)
                | Pkcs7Error::DigestMismatch(_)
        )
    }
}

impl From<der::Error> for Pkcs7Error {
    fn from(error: der::Error) -> Self {
        Pkcs7Error::MalformedEncoding(error.to_string())
    }
}

impl From<openssl::error::ErrorStack> for Pkcs7Error {
    fn from(error: openssl::error::ErrorStack) -> Self {
        Pkcs7Error::CryptographicError(error.to_string())
    }
}

impl From<std::io::Error> for Pkcs7Error {
    fn from(error: std::io::Error) -> Self {
        Pkcs7Error::IoError(error.to_string())
    }
}
