//! Hash and signature primitives.
//!
//! Hashing uses the `sha2` crate; public key operations are delegated to
//! OpenSSL. Both are exposed as plain functions so the verification services
//! stay independent of the crypto backend.

use der::Encode;
use openssl::hash::MessageDigest;
use openssl::pkey::{Id, PKey};
use openssl::rsa::Padding;
use openssl::sign::Verifier;
use sha2::{Digest, Sha256, Sha384, Sha512};
use spki::SubjectPublicKeyInfoOwned;

use crate::domain::crypto::{DigestBytes, SignatureScheme};
use crate::infra::error::{Pkcs7Error, Pkcs7Result};
use crate::HashAlgorithm;

/// Hash `data` with `algo`.
pub fn hash(algo: HashAlgorithm, data: &[u8]) -> Pkcs7Result<DigestBytes> {
    let bytes = match algo {
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    };
    DigestBytes::new(algo, bytes).map_err(|e| Pkcs7Error::CryptographicError(e.to_string()))
}

fn message_digest(algo: HashAlgorithm) -> MessageDigest {
    match algo {
        HashAlgorithm::Sha256 => MessageDigest::sha256(),
        HashAlgorithm::Sha384 => MessageDigest::sha384(),
        HashAlgorithm::Sha512 => MessageDigest::sha512(),
    }
}

/// Verify `signature` over `data` with `public_key` under `scheme`.
///
/// Any failure to load the key or run the verifier counts as a failed
/// verification; the cause is logged at debug level.
#[must_use]
pub fn verify_signature(
    scheme: SignatureScheme,
    data: &[u8],
    signature: &[u8],
    public_key: &SubjectPublicKeyInfoOwned,
) -> bool {
    match try_verify_signature(scheme, data, signature, public_key) {
        Ok(valid) => valid,
        Err(e) => {
            log::debug!("{scheme} verification error: {e}");
            false
        }
    }
}

fn try_verify_signature(
    scheme: SignatureScheme,
    data: &[u8],
    signature: &[u8],
    public_key: &SubjectPublicKeyInfoOwned,
) -> Pkcs7Result<bool> {
    let spki_der = public_key.to_der()?;
    let pkey = PKey::public_key_from_der(&spki_der)?;

    match scheme {
        SignatureScheme::RsaPkcs1(hash) => {
            if pkey.id() != Id::RSA {
                log::debug!("{scheme} requires an RSA key, got {:?}", pkey.id());
                return Ok(false);
            }
            let mut verifier = Verifier::new(message_digest(hash), &pkey)?;
            verifier.set_rsa_padding(Padding::PKCS1)?;
            verifier.update(data)?;
            Ok(verifier.verify(signature)?)
        }
    }
}
