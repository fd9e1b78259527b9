//! PKCS#7 container: decodes a DER `ContentInfo` and exposes its content.
//!
//! The container owns the decoded structure; signer views and signature
//! enumerators borrow from it.

use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::enveloped_data::EnvelopedData;
use cms::signed_data::{SignedData, SignerInfo};
use der::asn1::OctetString;
use der::Decode;
use x509_cert::Certificate;

use crate::adapters::trust_store::TrustStore;
use crate::domain::pkcs7::{ContentType, SignerView};
use crate::infra::error::{Pkcs7Error, Pkcs7Result};
use crate::services::signature_enumerator::SignatureEnumerator;

enum Pkcs7Content {
    Data(OctetString),
    SignedData(Box<SignedData>),
    EnvelopedData,
}

/// A loaded PKCS#7 / CMS container.
pub struct Pkcs7Container {
    content: Pkcs7Content,
}

impl Pkcs7Container {
    /// Decode `blob` as a DER `ContentInfo`.
    ///
    /// The inner content is decoded according to its declared type, so a
    /// signed-data container whose body is not a `SignedData` is rejected
    /// here rather than during enumeration.
    pub fn load(blob: &[u8]) -> Pkcs7Result<Self> {
        if blob.is_empty() {
            return Err(Pkcs7Error::MalformedEncoding("empty input".into()));
        }

        let info = ContentInfo::from_der(blob)?;
        let content_type = ContentType::from_oid(&info.content_type).ok_or_else(|| {
            Pkcs7Error::UnsupportedContentType(crate::algorithm_name(&info.content_type))
        })?;

        let content = match content_type {
            ContentType::Data => Pkcs7Content::Data(info.content.decode_as::<OctetString>()?),
            ContentType::SignedData => {
                Pkcs7Content::SignedData(Box::new(info.content.decode_as::<SignedData>()?))
            }
            ContentType::EnvelopedData => {
                info.content.decode_as::<EnvelopedData>()?;
                Pkcs7Content::EnvelopedData
            }
        };

        let container = Self { content };
        log::info!(
            "Loaded PKCS#7 {} container ({} bytes, {} signer(s))",
            content_type,
            blob.len(),
            container.signer_count()
        );
        Ok(container)
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        match &self.content {
            Pkcs7Content::Data(_) => ContentType::Data,
            Pkcs7Content::SignedData(_) => ContentType::SignedData,
            Pkcs7Content::EnvelopedData => ContentType::EnvelopedData,
        }
    }

    /// Copy of the embedded content.
    ///
    /// `None` for enveloped-data (decryption is not supported) and for
    /// detached signed-data.
    #[must_use]
    pub fn content(&self) -> Option<Vec<u8>> {
        if matches!(self.content, Pkcs7Content::EnvelopedData) {
            log::debug!("content of enveloped-data is not available");
        }
        self.content_bytes().map(<[u8]>::to_vec)
    }

    /// Borrowed content bytes: the data OCTET STRING payload, or the value
    /// of a signed-data `eContent`.
    pub(crate) fn content_bytes(&self) -> Option<&[u8]> {
        match &self.content {
            Pkcs7Content::Data(octets) => Some(octets.as_bytes()),
            Pkcs7Content::SignedData(signed) => signed
                .encap_content_info
                .econtent
                .as_ref()
                .map(|econtent| econtent.value()),
            Pkcs7Content::EnvelopedData => None,
        }
    }

    /// DER re-encoding of the container. Not supported; always `None`.
    #[must_use]
    pub fn encoding(&self) -> Option<Vec<u8>> {
        log::debug!(
            "{}",
            Pkcs7Error::UnsupportedOperation("PKCS#7 re-encoding".into())
        );
        None
    }

    /// Enumerate the signers that verify against `trust`.
    ///
    /// For anything other than signed-data the enumerator is already
    /// exhausted.
    pub fn signature_enumerator<'a, S>(&'a self, trust: &'a S) -> SignatureEnumerator<'a, S>
    where
        S: TrustStore + ?Sized,
    {
        match &self.content {
            Pkcs7Content::SignedData(_) => {
                SignatureEnumerator::new(self, self.signer_infos(), trust)
            }
            _ => SignatureEnumerator::empty(self, trust),
        }
    }

    /// Certificates embedded in a signed-data `certificates` field.
    #[must_use]
    pub fn certificates(&self) -> Vec<&Certificate> {
        let Pkcs7Content::SignedData(signed) = &self.content else {
            return Vec::new();
        };
        signed
            .certificates
            .as_ref()
            .map(|set| {
                set.0
                    .iter()
                    .filter_map(|choice| match choice {
                        CertificateChoices::Certificate(cert) => Some(cert),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn signer_count(&self) -> usize {
        self.signer_infos().len()
    }

    /// Views of every `SignerInfo`, verified or not, in container order.
    pub fn signers(&self) -> impl Iterator<Item = SignerView<'_>> {
        self.signer_infos().iter().map(SignerView::new)
    }

    fn signer_infos(&self) -> &[SignerInfo] {
        match &self.content {
            Pkcs7Content::SignedData(signed) => signed.signer_infos.0.as_slice(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants;
    use cms::content_info::CmsVersion;
    use cms::signed_data::{EncapsulatedContentInfo, SignerInfos};
    use der::asn1::SetOfVec;
    use der::{Any, Encode};

    fn content_info(content_type: der::asn1::ObjectIdentifier, content: Any) -> Vec<u8> {
        ContentInfo {
            content_type,
            content,
        }
        .to_der()
        .unwrap()
    }

    fn signed_data(econtent: Option<&[u8]>) -> Vec<u8> {
        let signed = SignedData {
            version: CmsVersion::V1,
            digest_algorithms: SetOfVec::new(),
            encap_content_info: EncapsulatedContentInfo {
                econtent_type: constants::ID_DATA,
                econtent: econtent
                    .map(|bytes| Any::encode_from(&OctetString::new(bytes).unwrap()).unwrap()),
            },
            certificates: None,
            crls: None,
            signer_infos: SignerInfos(SetOfVec::new()),
        };
        content_info(constants::ID_SIGNED_DATA, Any::encode_from(&signed).unwrap())
    }

    #[test]
    fn loads_data_content() {
        let octets = OctetString::new(b"hello".to_vec()).unwrap();
        let blob = content_info(constants::ID_DATA, Any::encode_from(&octets).unwrap());

        let container = Pkcs7Container::load(&blob).unwrap();
        assert_eq!(container.content_type(), ContentType::Data);
        assert_eq!(container.content(), Some(b"hello".to_vec()));
        assert_eq!(container.signer_count(), 0);
        assert!(container.certificates().is_empty());
        assert!(container.encoding().is_none());
    }

    #[test]
    fn loads_signed_data_without_signers() {
        let container = Pkcs7Container::load(&signed_data(Some(b"payload".as_slice()))).unwrap();
        assert_eq!(container.content_type(), ContentType::SignedData);
        assert_eq!(container.content(), Some(b"payload".to_vec()));
        assert_eq!(container.signers().count(), 0);
    }

    #[test]
    fn detached_signed_data_has_no_content() {
        let container = Pkcs7Container::load(&signed_data(None)).unwrap();
        assert!(container.content().is_none());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            Pkcs7Container::load(&[]),
            Err(Pkcs7Error::MalformedEncoding(_))
        ));
        assert!(matches!(
            Pkcs7Container::load(&[0x30, 0x03, 0x01]),
            Err(Pkcs7Error::MalformedEncoding(_))
        ));

        let mut trailing = signed_data(Some(b"x".as_slice()));
        trailing.push(0x00);
        assert!(matches!(
            Pkcs7Container::load(&trailing),
            Err(Pkcs7Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn rejects_content_not_matching_declared_type() {
        let octets = OctetString::new(b"not signed data".to_vec()).unwrap();
        let blob = content_info(constants::ID_SIGNED_DATA, Any::encode_from(&octets).unwrap());
        assert!(matches!(
            Pkcs7Container::load(&blob),
            Err(Pkcs7Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn rejects_unknown_content_type() {
        let octets = OctetString::new(b"digest".to_vec()).unwrap();
        // id-digestedData
        let oid = der::asn1::ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.5");
        let blob = content_info(oid, Any::encode_from(&octets).unwrap());
        assert!(matches!(
            Pkcs7Container::load(&blob),
            Err(Pkcs7Error::UnsupportedContentType(_))
        ));
    }
}
