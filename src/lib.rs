//! PKCS#7 / CMS Verifier Library
//!
//! Parses DER-encoded CMS `ContentInfo` containers, classifies their content
//! type and, for signed-data, verifies each embedded signer against a trust
//! store. A signer is only reported when its signature over the signed
//! attributes verifies with a trusted certificate *and* its messageDigest
//! attribute matches the hash of the embedded content.
//!
//! ```no_run
//! use pkcs7_verifier::{MemoryTrustStore, Pkcs7Container};
//!
//! # fn run(blob: &[u8], store: MemoryTrustStore) -> pkcs7_verifier::Pkcs7Result<()> {
//! let container = Pkcs7Container::load(blob)?;
//! for auth in container.signature_enumerator(&store) {
//!     println!("verified signer: {:?}", auth.identity());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod infra;
pub mod pipelines;
pub mod services;

use std::fmt;
use std::str::FromStr;

use der::asn1::ObjectIdentifier;

pub use adapters::trust_store::{MemoryTrustStore, TrustCandidate, TrustStore};
pub use domain::auth::{AuthConfig, AuthRule};
pub use domain::crypto::{DigestBytes, KeyType, SignatureScheme};
pub use domain::pkcs7::{ContentType, IssuerSerial, SignerView};
pub use domain::verification::{SignerRejection, VerificationReport, VerifiedSigner};
pub use infra::config::{ConfigManager, TrustedCertificateConfig, VerifierConfiguration};
pub use infra::error::{Pkcs7Error, Pkcs7Result};
pub use pipelines::verify::VerifyWorkflow;
pub use services::container::Pkcs7Container;
pub use services::signature_enumerator::{EnumeratorState, SignatureEnumerator};

use domain::constants;

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Map a digest `AlgorithmIdentifier` OID to a supported algorithm.
    #[must_use]
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        HASH_ALGORITHM_OIDS
            .iter()
            .find(|(known, _)| known == oid)
            .map(|(_, algo)| *algo)
    }

    #[must_use]
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            HashAlgorithm::Sha256 => constants::ID_SHA256,
            HashAlgorithm::Sha384 => constants::ID_SHA384,
            HashAlgorithm::Sha512 => constants::ID_SHA512,
        }
    }
}

const HASH_ALGORITHM_OIDS: [(ObjectIdentifier, HashAlgorithm); 3] = [
    (constants::ID_SHA256, HashAlgorithm::Sha256),
    (constants::ID_SHA384, HashAlgorithm::Sha384),
    (constants::ID_SHA512, HashAlgorithm::Sha512),
];

const ALGORITHM_NAMES: [(ObjectIdentifier, &str); 10] = [
    (constants::ID_SHA1, "sha1"),
    (constants::ID_SHA256, "sha256"),
    (constants::ID_SHA384, "sha384"),
    (constants::ID_SHA512, "sha512"),
    (constants::RSA_ENCRYPTION, "rsaEncryption"),
    (constants::SHA256_WITH_RSA_ENCRYPTION, "sha256WithRSAEncryption"),
    (constants::SHA384_WITH_RSA_ENCRYPTION, "sha384WithRSAEncryption"),
    (constants::SHA512_WITH_RSA_ENCRYPTION, "sha512WithRSAEncryption"),
    (constants::ID_EC_PUBLIC_KEY, "id-ecPublicKey"),
    (constants::ECDSA_WITH_SHA256, "ecdsa-with-SHA256"),
];

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Pkcs7Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(Pkcs7Error::UnsupportedAlgorithm(format!(
                "hash algorithm {other} not supported"
            ))),
        }
    }
}

/// Human readable name for an algorithm OID, used in diagnostics.
#[must_use]
pub fn algorithm_name(oid: &ObjectIdentifier) -> String {
    ALGORITHM_NAMES
        .iter()
        .find(|(known, _)| known == oid)
        .map_or_else(|| oid.to_string(), |(_, name)| (*name).to_string())
}
