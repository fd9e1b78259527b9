//! PKCS#7 / CMS domain types.
//!
//! Content type classification, canonical signed-attribute encoding and the
//! borrowed `SignerInfo` view consumed by the verification services.

use std::fmt;

use der::asn1::ObjectIdentifier;

use super::constants;

pub mod attributes;
pub mod signer;

pub use attributes::{SignedAttributeLogical, SignedAttributesCanonical};
pub use signer::{IssuerSerial, SignerView};

/// Outer `ContentInfo` content type, fixed when a container is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Data,
    SignedData,
    EnvelopedData,
}

impl ContentType {
    /// Classify a `ContentInfo.contentType` OID; `None` for anything unhandled.
    #[must_use]
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        if *oid == constants::ID_DATA {
            Some(ContentType::Data)
        } else if *oid == constants::ID_SIGNED_DATA {
            Some(ContentType::SignedData)
        } else if *oid == constants::ID_ENVELOPED_DATA {
            Some(ContentType::EnvelopedData)
        } else {
            None
        }
    }

    #[must_use]
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            ContentType::Data => constants::ID_DATA,
            ContentType::SignedData => constants::ID_SIGNED_DATA,
            ContentType::EnvelopedData => constants::ID_ENVELOPED_DATA,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Data => "data",
            ContentType::SignedData => "signed-data",
            ContentType::EnvelopedData => "enveloped-data",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
