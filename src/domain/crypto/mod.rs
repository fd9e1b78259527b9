//! Foundational cryptographic domain types.
//!
//! Provides strongly-typed wrappers for cryptographic artifacts including:
//! - Hash algorithms and digest values with size validation
//! - Public key families used to restrict trust store queries
//! - Signature schemes selected from CMS algorithm identifiers
//!
//! These types carry no crypto implementation; hashing and signature checks
//! live in `adapters::crypto`.

mod digest_bytes;
mod hash;
mod key;
mod signature;

pub use digest_bytes::{DigestBytes, DigestBytesError};
pub use hash::HashAlgorithm;
pub use key::KeyType;
pub use signature::SignatureScheme;
