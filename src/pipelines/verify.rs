//! `VerifyWorkflow`: high-level facade for verifying PKCS#7 containers.
//!
//! Pairs a trust store with `VerificationService` and applies the
//! acceptance policy from the configuration.

use crate::{
    adapters::trust_store::{MemoryTrustStore, TrustStore},
    domain::verification::VerificationReport,
    infra::config::VerifierConfiguration,
    services::verification::VerificationService,
    Pkcs7Result,
};

/// Orchestrates verification of PKCS#7 blobs against one trust store.
pub struct VerifyWorkflow<S: TrustStore = MemoryTrustStore> {
    svc: VerificationService,
    trust: S,
    require_all_signers: bool,
}

impl VerifyWorkflow<MemoryTrustStore> {
    /// Build the trust store and policy from a configuration.
    pub fn from_config(config: &VerifierConfiguration) -> Pkcs7Result<Self> {
        let trust = MemoryTrustStore::from_config(config)?;
        Ok(Self::new(trust).require_all_signers(config.require_all_signers))
    }
}

impl<S: TrustStore> VerifyWorkflow<S> {
    #[must_use]
    pub fn new(trust: S) -> Self {
        Self {
            svc: VerificationService::new(),
            trust,
            require_all_signers: false,
        }
    }

    /// Accept a container only if every signer verifies.
    #[must_use]
    pub fn require_all_signers(mut self, require: bool) -> Self {
        self.require_all_signers = require;
        self
    }

    #[must_use]
    pub fn trust_store(&self) -> &S {
        &self.trust
    }

    /// Run verification over provided DER bytes.
    pub fn run(&self, blob: &[u8]) -> Pkcs7Result<VerificationReport> {
        self.svc.verify(blob, &self.trust)
    }

    /// Whether `report` satisfies this workflow's acceptance policy.
    #[must_use]
    pub fn accepts(&self, report: &VerificationReport) -> bool {
        if self.require_all_signers {
            report.all_signers_valid()
        } else {
            report.success()
        }
    }
}
