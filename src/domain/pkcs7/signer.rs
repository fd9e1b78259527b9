//! Borrowed view over a decoded CMS `SignerInfo`.

use std::fmt;

use cms::signed_data::{SignerIdentifier, SignerInfo};
use der::asn1::ObjectIdentifier;
use der::{Any, Tag, Tagged};
use x509_cert::attr::Attribute;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::domain::constants;
use crate::infra::error::{Pkcs7Error, Pkcs7Result};

/// Read-only view of one signer, borrowed from the container's decoded
/// structure. Never outlives the container.
#[derive(Clone, Copy)]
pub struct SignerView<'a> {
    info: &'a SignerInfo,
}

impl<'a> SignerView<'a> {
    #[must_use]
    pub fn new(info: &'a SignerInfo) -> Self {
        Self { info }
    }

    /// Issuer and serial number identifying the signer's certificate.
    ///
    /// Only the `issuerAndSerialNumber` form is handled; a subject key
    /// identifier or an empty issuer name is a malformed identity.
    pub fn identity(&self) -> Pkcs7Result<IssuerSerial<'a>> {
        match &self.info.sid {
            SignerIdentifier::IssuerAndSerialNumber(isn) => {
                if isn.issuer.0.is_empty() {
                    return Err(Pkcs7Error::MalformedSignerIdentity(
                        "signer issuer name is empty".into(),
                    ));
                }
                if isn.serial_number.as_bytes().is_empty() {
                    return Err(Pkcs7Error::MalformedSignerIdentity(
                        "signer serial number is empty".into(),
                    ));
                }
                Ok(IssuerSerial {
                    issuer: &isn.issuer,
                    serial: &isn.serial_number,
                })
            }
            SignerIdentifier::SubjectKeyIdentifier(_) => Err(Pkcs7Error::MalformedSignerIdentity(
                "subjectKeyIdentifier signer identities are not supported".into(),
            )),
        }
    }

    #[must_use]
    pub fn digest_algorithm(&self) -> &'a ObjectIdentifier {
        &self.info.digest_alg.oid
    }

    #[must_use]
    pub fn signature_algorithm(&self) -> &'a ObjectIdentifier {
        &self.info.signature_algorithm.oid
    }

    /// Signed attributes in decoded order, `None` if the signer has none.
    #[must_use]
    pub fn signed_attributes(&self) -> Option<&'a [Attribute]> {
        self.info.signed_attrs.as_ref().map(|attrs| attrs.as_slice())
    }

    /// All signed attributes of type `oid`.
    pub fn attributes(&self, oid: &ObjectIdentifier) -> impl Iterator<Item = &'a Attribute> {
        let oid = *oid;
        self.signed_attributes()
            .unwrap_or_default()
            .iter()
            .filter(move |attr| attr.oid == oid)
    }

    /// Raw value bytes of the first value of the first signed attribute `oid`.
    #[must_use]
    pub fn attribute_value(&self, oid: &ObjectIdentifier) -> Option<&'a [u8]> {
        self.attributes(oid)
            .next()
            .and_then(|attr| attr.values.iter().next())
            .map(Any::value)
    }

    /// The declared messageDigest: exactly one attribute holding exactly one
    /// OCTET STRING value.
    pub fn message_digest(&self) -> Pkcs7Result<&'a [u8]> {
        let mut found = self.attributes(&constants::ID_MESSAGE_DIGEST);
        let attr = found.next().ok_or_else(|| {
            Pkcs7Error::DigestMismatch("messageDigest attribute missing".into())
        })?;
        if found.next().is_some() {
            return Err(Pkcs7Error::DigestMismatch(
                "multiple messageDigest attributes".into(),
            ));
        }
        let mut values = attr.values.iter();
        match (values.next(), values.next()) {
            (Some(value), None) if value.tag() == Tag::OctetString => Ok(value.value()),
            _ => Err(Pkcs7Error::DigestMismatch(
                "messageDigest must hold a single OCTET STRING".into(),
            )),
        }
    }

    #[must_use]
    pub fn signature(&self) -> &'a [u8] {
        self.info.signature.as_bytes()
    }
}

impl fmt::Debug for SignerView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SignerView(digest={}, signature_alg={}, attrs={}, sig_len={})",
            crate::algorithm_name(self.digest_algorithm()),
            crate::algorithm_name(self.signature_algorithm()),
            self.signed_attributes().map_or(0, <[Attribute]>::len),
            self.signature().len()
        )
    }
}

/// Canonical issuer+serial identity matcher: the serial number is the trust
/// store lookup key, the issuer name is compared for equality.
#[derive(Debug, Clone, Copy)]
pub struct IssuerSerial<'a> {
    issuer: &'a Name,
    serial: &'a SerialNumber,
}

impl<'a> IssuerSerial<'a> {
    #[must_use]
    pub fn new(issuer: &'a Name, serial: &'a SerialNumber) -> Self {
        Self { issuer, serial }
    }
    #[must_use]
    pub fn issuer(&self) -> &'a Name {
        self.issuer
    }
    #[must_use]
    pub fn serial(&self) -> &'a SerialNumber {
        self.serial
    }
    #[must_use]
    pub fn lookup_key(&self) -> &'a [u8] {
        self.serial.as_bytes()
    }

    /// True if a candidate certificate's issuer equals the claimed issuer.
    #[must_use]
    pub fn issued_by(&self, issuer: &Name) -> bool {
        self.issuer == issuer
    }
}

impl fmt::Display for IssuerSerial<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "issuer \"{}\", serial {}",
            self.issuer,
            hex::encode(self.lookup_key())
        )
    }
}
