//! Pull-based enumeration of the verified signers of a signed-data
//! container.
//!
//! Each step examines one `SignerInfo`: algorithm check, trust resolution,
//! then messageDigest binding. A signer failing any stage is logged,
//! recorded as a [`SignerRejection`] and skipped; enumeration itself never
//! fails. At most one result is in flight and it is released when the
//! enumerator advances.

use cms::signed_data::SignerInfo;
use der::asn1::ObjectIdentifier;

use crate::adapters::trust_store::TrustStore;
use crate::domain::auth::AuthConfig;
use crate::domain::crypto::SignatureScheme;
use crate::domain::pkcs7::SignerView;
use crate::domain::verification::SignerRejection;
use crate::infra::error::{Pkcs7Error, Pkcs7Result};
use crate::services::container::Pkcs7Container;
use crate::services::digest_binder::DigestBinder;
use crate::services::signer_resolver::SignerResolver;
use crate::HashAlgorithm;

/// Enumerator cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumeratorState {
    /// Next signer to examine.
    Positioned(usize),
    Exhausted,
}

pub struct SignatureEnumerator<'a, S: TrustStore + ?Sized> {
    container: &'a Pkcs7Container,
    signers: &'a [SignerInfo],
    resolver: SignerResolver<'a, S>,
    state: EnumeratorState,
    current: Option<AuthConfig>,
    current_index: Option<usize>,
    rejections: Vec<SignerRejection>,
}

impl<'a, S: TrustStore + ?Sized> SignatureEnumerator<'a, S> {
    pub(crate) fn new(
        container: &'a Pkcs7Container,
        signers: &'a [SignerInfo],
        trust: &'a S,
    ) -> Self {
        Self {
            container,
            signers,
            resolver: SignerResolver::new(trust),
            state: EnumeratorState::Positioned(0),
            current: None,
            current_index: None,
            rejections: Vec::new(),
        }
    }

    /// An enumerator with nothing to yield.
    pub(crate) fn empty(container: &'a Pkcs7Container, trust: &'a S) -> Self {
        Self {
            state: EnumeratorState::Exhausted,
            ..Self::new(container, &[], trust)
        }
    }

    /// Move to the next verified signer and lend its authorization context.
    ///
    /// Returns `None` once every signer has been examined, and on every
    /// call after that.
    pub fn advance(&mut self) -> Option<&AuthConfig> {
        if self.step() {
            self.current.as_ref()
        } else {
            None
        }
    }

    /// The in-flight result of the last successful [`advance`](Self::advance).
    #[must_use]
    pub fn current(&self) -> Option<&AuthConfig> {
        self.current.as_ref()
    }

    /// Container index of the signer whose result is in flight.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Raw value of signed attribute `oid` of the signer whose result is in
    /// flight.
    #[must_use]
    pub fn attribute(&self, oid: &ObjectIdentifier) -> Option<&'a [u8]> {
        let signers: &'a [SignerInfo] = self.signers;
        let info = signers.get(self.current_index?)?;
        SignerView::new(info).attribute_value(oid)
    }

    /// Signers skipped so far and why.
    #[must_use]
    pub fn rejections(&self) -> &[SignerRejection] {
        &self.rejections
    }

    #[must_use]
    pub fn state(&self) -> EnumeratorState {
        self.state
    }

    fn step(&mut self) -> bool {
        self.current = None;
        self.current_index = None;

        loop {
            let index = match self.state {
                EnumeratorState::Positioned(i) if i < self.signers.len() => i,
                _ => {
                    self.state = EnumeratorState::Exhausted;
                    return false;
                }
            };
            self.state = EnumeratorState::Positioned(index + 1);

            let signers = self.signers;
            let signer = SignerView::new(&signers[index]);
            match self.verify_signer(&signer) {
                Ok(auth) => {
                    log::info!(
                        "signer {index} verified: {}",
                        auth.identity().unwrap_or("<unnamed>")
                    );
                    self.current = Some(auth);
                    self.current_index = Some(index);
                    return true;
                }
                Err(reason) => {
                    if reason.is_signer_local() {
                        log::warn!("signer {index} skipped: {reason}");
                    } else {
                        log::error!("signer {index} skipped after internal failure: {reason}");
                    }
                    self.rejections.push(SignerRejection { index, reason });
                }
            }
        }
    }

    fn verify_signer(&self, signer: &SignerView<'a>) -> Pkcs7Result<AuthConfig> {
        let digest = check_algorithms(signer)?;
        let auth = self.resolver.resolve(signer, digest).map_err(|e| {
            log::warn!("unable to verify pkcs7 attributes signature");
            e
        })?;
        DigestBinder::verify(self.container, signer, signer.digest_algorithm())?;
        Ok(auth)
    }
}

fn check_algorithms(signer: &SignerView<'_>) -> Pkcs7Result<HashAlgorithm> {
    let digest_oid = signer.digest_algorithm();
    let digest = HashAlgorithm::from_oid(digest_oid).ok_or_else(|| {
        Pkcs7Error::UnsupportedAlgorithm(format!(
            "hash algorithm {} not supported",
            crate::algorithm_name(digest_oid)
        ))
    })?;

    let signature_oid = signer.signature_algorithm();
    if !SignatureScheme::is_supported_algorithm(signature_oid) {
        return Err(Pkcs7Error::UnsupportedAlgorithm(format!(
            "only RSA digest encryption supported, got {}",
            crate::algorithm_name(signature_oid)
        )));
    }
    Ok(digest)
}

impl<S: TrustStore + ?Sized> Iterator for SignatureEnumerator<'_, S> {
    type Item = AuthConfig;

    /// Owning variant of [`advance`](SignatureEnumerator::advance): the
    /// caller receives its own copy of the authorization context.
    fn next(&mut self) -> Option<AuthConfig> {
        self.advance().cloned()
    }
}

impl<S: TrustStore + ?Sized> std::iter::FusedIterator for SignatureEnumerator<'_, S> {}
