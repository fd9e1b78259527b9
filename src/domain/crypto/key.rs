use std::fmt;

use der::asn1::ObjectIdentifier;

use crate::domain::constants;

/// Public key family used to restrict trust store lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Matches any key family.
    Any,
    Rsa,
    Ecdsa,
}

impl KeyType {
    /// Classify a `SubjectPublicKeyInfo` algorithm OID.
    #[must_use]
    pub fn from_spki_oid(oid: &ObjectIdentifier) -> Option<Self> {
        if *oid == constants::RSA_ENCRYPTION {
            Some(KeyType::Rsa)
        } else if *oid == constants::ID_EC_PUBLIC_KEY {
            Some(KeyType::Ecdsa)
        } else {
            None
        }
    }

    /// True if a key of family `other` satisfies a query for `self`.
    #[must_use]
    pub fn accepts(&self, other: KeyType) -> bool {
        *self == KeyType::Any || *self == other
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Any => write!(f, "ANY"),
            KeyType::Rsa => write!(f, "RSA"),
            KeyType::Ecdsa => write!(f, "ECDSA"),
        }
    }
}
