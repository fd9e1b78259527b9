//! Signed attributes re-encoding.
//!
//! A CMS signature with signed attributes is computed over the DER encoding
//! of the complete `SET OF Attribute` (with a universal SET tag, not the
//! `[0] IMPLICIT` tag it carries inside `SignerInfo`). This module rebuilds
//! that exact byte sequence from decoded attribute records.

use std::fmt;

use der::asn1::ObjectIdentifier;
use der::{Encode, Header, Tag};
use x509_cert::attr::Attribute;

use crate::infra::error::Pkcs7Result;

#[derive(Clone)]
pub struct SignedAttributeLogical {
    pub oid: ObjectIdentifier,
    pub der: Vec<u8>, // Complete Attribute SEQUENCE bytes
}

impl fmt::Debug for SignedAttributeLogical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SignedAttributeLogical(oid={}, len={})",
            self.oid,
            self.der.len()
        )
    }
}

/// Canonically ordered, concatenated DER of all attributes.
pub struct SignedAttributesCanonical {
    ordered: Vec<SignedAttributeLogical>,
    concatenated_der: Vec<u8>, // concatenation of attribute DER sequences
}

impl SignedAttributesCanonical {
    #[must_use]
    pub fn new(mut attrs: Vec<SignedAttributeLogical>) -> Self {
        attrs.sort_by(|a, b| a.der.cmp(&b.der)); // DER SET ordering
        let mut concatenated = Vec::new();
        for a in &attrs {
            concatenated.extend_from_slice(&a.der);
        }
        Self {
            ordered: attrs,
            concatenated_der: concatenated,
        }
    }

    /// Encode each decoded attribute and order them for a DER SET.
    pub fn from_attributes<'a, I>(attrs: I) -> Pkcs7Result<Self>
    where
        I: IntoIterator<Item = &'a Attribute>,
    {
        let logical = attrs
            .into_iter()
            .map(|attr| {
                Ok(SignedAttributeLogical {
                    oid: attr.oid,
                    der: attr.to_der()?,
                })
            })
            .collect::<Pkcs7Result<Vec<_>>>()?;
        Ok(Self::new(logical))
    }

    #[cfg(test)]
    fn concatenated_der(&self) -> &[u8] {
        &self.concatenated_der
    }

    #[cfg(test)]
    fn ordered(&self) -> &[SignedAttributeLogical] {
        &self.ordered
    }

    /// The signed byte sequence: the attributes wrapped in a universal SET.
    pub fn to_set_der(&self) -> Pkcs7Result<Vec<u8>> {
        let header = Header::new(Tag::Set, self.concatenated_der.len())?;
        let mut out = header.to_der()?;
        out.extend_from_slice(&self.concatenated_der);
        Ok(out)
    }
}

impl fmt::Debug for SignedAttributesCanonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SignedAttributesCanonical(count={}, total_len={})",
            self.ordered.len(),
            self.concatenated_der.len()
        )
    }
}
