//! Adapter layer modules for external system integration.
//!
//! Provides adapters for:
//! - Hashing (`sha2`) and RSA signature verification (OpenSSL)
//! - Trust store lookups of candidate signer certificates
//! - Loading trusted certificates from PEM/DER files

pub mod crypto;
pub mod trust_store;
