//! Service layer module root.
//! Contains the container, the per-signer verification stages and the
//! enumerator sequencing them.

pub mod container;
pub mod digest_binder;
pub mod signature_enumerator;
pub mod signer_resolver;
pub mod verification;

pub use container::Pkcs7Container;
pub use digest_binder::DigestBinder;
pub use signature_enumerator::{EnumeratorState, SignatureEnumerator};
pub use signer_resolver::SignerResolver;
pub use verification::VerificationService;
