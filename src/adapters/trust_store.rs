//! Trust store lookups of candidate signer certificates.
//!
//! The verification services only see the [`TrustStore`] trait. The bundled
//! [`MemoryTrustStore`] holds certificates loaded from PEM/DER files or
//! added programmatically, each with the authorization rules handed back
//! when a signature verifies against it.

use std::fs;
use std::path::Path;

use der::Decode;
use openssl::x509::X509;
use x509_cert::serial_number::SerialNumber;
use x509_cert::Certificate;

use crate::domain::auth::{AuthConfig, AuthRule};
use crate::domain::crypto::KeyType;
use crate::infra::config::VerifierConfiguration;
use crate::infra::error::{Pkcs7Error, Pkcs7Result};

/// A trusted certificate and its authorization context, borrowed from the
/// store for the duration of one resolution attempt.
#[derive(Debug, Clone, Copy)]
pub struct TrustCandidate<'a> {
    pub certificate: &'a Certificate,
    pub auth: &'a AuthConfig,
}

/// Source of trusted certificates.
pub trait TrustStore {
    /// Candidates whose public key belongs to `key_type` and whose serial
    /// number equals `serial`, in store order.
    fn find_trusted(&self, key_type: KeyType, serial: &SerialNumber) -> Vec<TrustCandidate<'_>>;
}

impl<T: TrustStore + ?Sized> TrustStore for &T {
    fn find_trusted(&self, key_type: KeyType, serial: &SerialNumber) -> Vec<TrustCandidate<'_>> {
        (**self).find_trusted(key_type, serial)
    }
}

#[derive(Debug, Clone)]
struct TrustEntry {
    certificate: Certificate,
    key_type: Option<KeyType>,
    auth: AuthConfig,
}

impl TrustEntry {
    fn matches(&self, key_type: KeyType, serial: &SerialNumber) -> bool {
        let family_ok = self
            .key_type
            .map_or(key_type == KeyType::Any, |kt| key_type.accepts(kt));
        family_ok && self.certificate.tbs_certificate.serial_number == *serial
    }
}

/// In-memory trust store preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrustStore {
    entries: Vec<TrustEntry>,
}

impl MemoryTrustStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust `certificate` with an explicit authorization context.
    pub fn add(&mut self, certificate: Certificate, auth: AuthConfig) {
        let spki_oid = &certificate.tbs_certificate.subject_public_key_info.algorithm.oid;
        let key_type = KeyType::from_spki_oid(spki_oid);
        if key_type.is_none() {
            log::debug!(
                "trusted certificate \"{}\" has unsupported key algorithm {}",
                certificate.tbs_certificate.subject,
                crate::algorithm_name(spki_oid)
            );
        }
        self.entries.push(TrustEntry {
            certificate,
            key_type,
            auth,
        });
    }

    /// Trust `certificate`, deriving its authorization context from the
    /// certificate itself.
    pub fn add_certificate(&mut self, certificate: Certificate) {
        let auth = AuthConfig::for_certificate(&certificate);
        self.add(certificate, auth);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every certificate in `path` (a PEM bundle or one DER
    /// certificate), granting each the given groups. Returns the number of
    /// certificates added.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P, groups: &[String]) -> Pkcs7Result<usize> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            Pkcs7Error::IoError(format!("Failed to read {}: {e}", path.display()))
        })?;

        let certificates = parse_certificates(&bytes).map_err(|e| {
            Pkcs7Error::CertificateError(format!("{}: {e}", path.display()))
        })?;
        if certificates.is_empty() {
            return Err(Pkcs7Error::CertificateError(format!(
                "{}: no certificates found",
                path.display()
            )));
        }

        let count = certificates.len();
        for certificate in certificates {
            let mut auth = AuthConfig::for_certificate(&certificate);
            for group in groups {
                auth.add(AuthRule::Group(group.clone()));
            }
            self.add(certificate, auth);
        }
        log::info!("Loaded {count} trusted certificate(s) from {}", path.display());
        Ok(count)
    }

    /// Build a store from the configured trusted certificate files.
    pub fn from_config(config: &VerifierConfiguration) -> Pkcs7Result<Self> {
        let mut store = Self::new();
        for entry in &config.trusted_certificates {
            store.load_file(&entry.path, &entry.groups)?;
        }
        Ok(store)
    }
}

impl TrustStore for MemoryTrustStore {
    fn find_trusted(&self, key_type: KeyType, serial: &SerialNumber) -> Vec<TrustCandidate<'_>> {
        self.entries
            .iter()
            .filter(|entry| entry.matches(key_type, serial))
            .map(|entry| TrustCandidate {
                certificate: &entry.certificate,
                auth: &entry.auth,
            })
            .collect()
    }
}

fn parse_certificates(bytes: &[u8]) -> Pkcs7Result<Vec<Certificate>> {
    let is_pem = bytes
        .windows(b"-----BEGIN".len())
        .any(|w| w == b"-----BEGIN");

    if is_pem {
        X509::stack_from_pem(bytes)?
            .iter()
            .map(|x509| -> Pkcs7Result<Certificate> {
                Ok(Certificate::from_der(&x509.to_der()?)?)
            })
            .collect()
    } else {
        Ok(vec![Certificate::from_der(bytes)?])
    }
}
