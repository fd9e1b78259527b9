//! Shared fixtures for integration tests.
//!
//! Generates throwaway RSA / EC keys with self-signed certificates via
//! OpenSSL and assembles CMS signed-data containers with the `cms` crate,
//! with knobs for producing the malformed or tampered signers the
//! verification tests need.

#![allow(dead_code)]

use cms::cert::{CertificateChoices, IssuerAndSerialNumber};
use cms::content_info::{CmsVersion, ContentInfo};
use cms::signed_data::{
    CertificateSet, EncapsulatedContentInfo, SignedData, SignerIdentifier, SignerInfo,
    SignerInfos,
};
use der::asn1::{ObjectIdentifier, OctetString, SetOfVec};
use der::{Any, Decode, Encode};
use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::sign::Signer;
use openssl::x509::{X509Builder, X509NameBuilder, X509};
use pkcs7_verifier::domain::constants;
use pkcs7_verifier::HashAlgorithm;
use spki::AlgorithmIdentifierOwned;
use x509_cert::attr::Attribute;
use x509_cert::ext::pkix::SubjectKeyIdentifier;
use x509_cert::Certificate;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A private key and the self-signed certificate for it.
pub struct TestSigner {
    pub key: PKey<Private>,
    pub x509: X509,
    pub certificate: Certificate,
}

impl TestSigner {
    pub fn rsa(cn: &str, serial: u32) -> Self {
        let rsa = Rsa::generate(2048).expect("Should generate RSA key");
        let key = PKey::from_rsa(rsa).expect("Should create PKey");
        Self::self_signed(cn, serial, key)
    }

    pub fn ec(cn: &str, serial: u32) -> Self {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).expect("Should create group");
        let ec = EcKey::generate(&group).expect("Should generate EC key");
        let key = PKey::from_ec_key(ec).expect("Should create PKey");
        Self::self_signed(cn, serial, key)
    }

    pub fn self_signed(cn: &str, serial: u32, key: PKey<Private>) -> Self {
        let mut name = X509NameBuilder::new().expect("Should create name builder");
        name.append_entry_by_text("CN", cn).expect("Should add CN");
        let name = name.build();

        let mut builder = X509Builder::new().expect("Should create X509 builder");
        builder.set_version(2).expect("Should set version");
        let serial = BigNum::from_u32(serial)
            .expect("Should create serial")
            .to_asn1_integer()
            .expect("Should convert serial");
        builder.set_serial_number(&serial).expect("Should set serial");
        builder.set_subject_name(&name).expect("Should set subject");
        builder.set_issuer_name(&name).expect("Should set issuer");
        let not_before = Asn1Time::days_from_now(0).expect("Should create not_before");
        let not_after = Asn1Time::days_from_now(1).expect("Should create not_after");
        builder.set_not_before(&not_before).expect("Should set not_before");
        builder.set_not_after(&not_after).expect("Should set not_after");
        builder.set_pubkey(&key).expect("Should set pubkey");
        builder
            .sign(&key, MessageDigest::sha256())
            .expect("Should sign");
        let x509 = builder.build();

        let der = x509.to_der().expect("Should convert to DER");
        let certificate = Certificate::from_der(&der).expect("Should parse certificate");
        Self {
            key,
            x509,
            certificate,
        }
    }

    pub fn identity(&self) -> String {
        self.certificate.tbs_certificate.subject.to_string()
    }

    fn issuer_and_serial(&self) -> IssuerAndSerialNumber {
        IssuerAndSerialNumber {
            issuer: self.certificate.tbs_certificate.issuer.clone(),
            serial_number: self.certificate.tbs_certificate.serial_number.clone(),
        }
    }
}

fn message_digest(algo: HashAlgorithm) -> MessageDigest {
    match algo {
        HashAlgorithm::Sha256 => MessageDigest::sha256(),
        HashAlgorithm::Sha384 => MessageDigest::sha384(),
        HashAlgorithm::Sha512 => MessageDigest::sha512(),
    }
}

fn attribute(oid: ObjectIdentifier, value: Any) -> Attribute {
    Attribute {
        oid,
        values: SetOfVec::try_from(vec![value]).expect("Should build attribute values"),
    }
}

/// Builds one `SignerInfo` over some content.
pub struct SignerBuilder<'a> {
    signer: &'a TestSigner,
    digest: HashAlgorithm,
    signature_algorithm: ObjectIdentifier,
    declared_digest: Option<ObjectIdentifier>,
    claimed_digest: Option<Vec<u8>>,
    garbage_signature: bool,
    signed_attributes: bool,
    subject_key_identifier: bool,
}

impl<'a> SignerBuilder<'a> {
    pub fn new(signer: &'a TestSigner) -> Self {
        Self {
            signer,
            digest: HashAlgorithm::Sha256,
            signature_algorithm: constants::RSA_ENCRYPTION,
            declared_digest: None,
            claimed_digest: None,
            garbage_signature: false,
            signed_attributes: true,
            subject_key_identifier: false,
        }
    }

    pub fn digest(mut self, digest: HashAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    pub fn signature_algorithm(mut self, oid: ObjectIdentifier) -> Self {
        self.signature_algorithm = oid;
        self
    }

    /// Declare a digest algorithm OID other than the one actually used.
    pub fn declared_digest(mut self, oid: ObjectIdentifier) -> Self {
        self.declared_digest = Some(oid);
        self
    }

    /// Put `digest` in the messageDigest attribute instead of the real hash.
    pub fn claimed_digest(mut self, digest: Vec<u8>) -> Self {
        self.claimed_digest = Some(digest);
        self
    }

    /// Replace the signature with same-length garbage.
    pub fn garbage_signature(mut self) -> Self {
        self.garbage_signature = true;
        self
    }

    /// Sign the content directly without signed attributes.
    pub fn without_signed_attributes(mut self) -> Self {
        self.signed_attributes = false;
        self
    }

    /// Identify the signer by subject key identifier instead of
    /// issuer and serial.
    pub fn subject_key_identifier(mut self) -> Self {
        self.subject_key_identifier = true;
        self
    }

    pub fn build(self, content: &[u8]) -> SignerInfo {
        let md = message_digest(self.digest);
        let content_digest = openssl::hash::hash(md, content).expect("Should hash content");
        let claimed = self
            .claimed_digest
            .unwrap_or_else(|| content_digest.to_vec());

        let signed_attrs = self.signed_attributes.then(|| {
            let content_type = Any::encode_from(&constants::ID_DATA).expect("Should encode OID");
            let digest_value = Any::encode_from(&OctetString::new(claimed).expect("octets"))
                .expect("Should encode digest");
            SetOfVec::try_from(vec![
                attribute(constants::ID_CONTENT_TYPE, content_type),
                attribute(constants::ID_MESSAGE_DIGEST, digest_value),
            ])
            .expect("Should build signed attributes")
        });

        let to_sign = match &signed_attrs {
            Some(attrs) => attrs.to_der().expect("Should encode signed attributes"),
            None => content.to_vec(),
        };
        let mut signer = Signer::new(md, &self.signer.key).expect("Should create signer");
        signer.update(&to_sign).expect("Should update signer");
        let mut signature = signer.sign_to_vec().expect("Should sign");
        if self.garbage_signature {
            signature = vec![0x5A; signature.len()];
        }

        let sid = if self.subject_key_identifier {
            let public_key = self
                .signer
                .key
                .public_key_to_der()
                .expect("Should encode public key");
            let key_id = openssl::hash::hash(MessageDigest::sha1(), &public_key)
                .expect("Should hash public key");
            SignerIdentifier::SubjectKeyIdentifier(SubjectKeyIdentifier(
                OctetString::new(key_id.to_vec()).expect("Should wrap key id"),
            ))
        } else {
            SignerIdentifier::IssuerAndSerialNumber(self.signer.issuer_and_serial())
        };

        SignerInfo {
            version: if self.subject_key_identifier {
                CmsVersion::V3
            } else {
                CmsVersion::V1
            },
            sid,
            digest_alg: AlgorithmIdentifierOwned {
                oid: self.declared_digest.unwrap_or_else(|| self.digest.oid()),
                parameters: None,
            },
            signed_attrs,
            signature_algorithm: AlgorithmIdentifierOwned {
                oid: self.signature_algorithm,
                parameters: None,
            },
            signature: OctetString::new(signature).expect("Should wrap signature"),
            unsigned_attrs: None,
        }
    }
}

/// Assembles a DER signed-data `ContentInfo`.
pub struct SignedDataBuilder<'a> {
    content: Vec<u8>,
    detached: bool,
    signers: Vec<SignerBuilder<'a>>,
    certificates: Vec<Certificate>,
}

impl<'a> SignedDataBuilder<'a> {
    pub fn new(content: &[u8]) -> Self {
        Self {
            content: content.to_vec(),
            detached: false,
            signers: Vec::new(),
            certificates: Vec::new(),
        }
    }

    pub fn signer(mut self, signer: SignerBuilder<'a>) -> Self {
        self.signers.push(signer);
        self
    }

    pub fn certificate(mut self, signer: &TestSigner) -> Self {
        self.certificates.push(signer.certificate.clone());
        self
    }

    /// Leave `eContent` out while still signing the content.
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let content = self.content;
        let signer_infos: Vec<SignerInfo> = self
            .signers
            .into_iter()
            .map(|builder| builder.build(&content))
            .collect();

        let mut digest_algorithms = SetOfVec::new();
        for info in &signer_infos {
            if !digest_algorithms.iter().any(|alg| *alg == info.digest_alg) {
                digest_algorithms
                    .insert(info.digest_alg.clone())
                    .expect("Should add digest algorithm");
            }
        }

        let certificates = (!self.certificates.is_empty()).then(|| {
            let choices: Vec<_> = self
                .certificates
                .into_iter()
                .map(CertificateChoices::Certificate)
                .collect();
            CertificateSet(SetOfVec::try_from(choices).expect("Should build certificate set"))
        });

        let econtent = (!self.detached).then(|| {
            Any::encode_from(&OctetString::new(content.clone()).expect("octets"))
                .expect("Should encode content")
        });

        let signed_data = SignedData {
            version: CmsVersion::V1,
            digest_algorithms,
            encap_content_info: EncapsulatedContentInfo {
                econtent_type: constants::ID_DATA,
                econtent,
            },
            certificates,
            crls: None,
            signer_infos: SignerInfos(
                SetOfVec::try_from(signer_infos).expect("Should build signer infos"),
            ),
        };

        ContentInfo {
            content_type: constants::ID_SIGNED_DATA,
            content: Any::encode_from(&signed_data).expect("Should encode signed data"),
        }
        .to_der()
        .expect("Should encode content info")
    }
}

/// DER `ContentInfo` of type data.
pub fn data_container(content: &[u8]) -> Vec<u8> {
    let octets = OctetString::new(content.to_vec()).expect("octets");
    ContentInfo {
        content_type: constants::ID_DATA,
        content: Any::encode_from(&octets).expect("Should encode data"),
    }
    .to_der()
    .expect("Should encode content info")
}

/// DER enveloped-data for `recipient`, produced by OpenSSL.
pub fn enveloped_container(content: &[u8], recipient: &TestSigner) -> Vec<u8> {
    use openssl::cms::{CMSOptions, CmsContentInfo};
    use openssl::stack::Stack;
    use openssl::symm::Cipher;

    let mut recipients = Stack::new().expect("Should create stack");
    recipients
        .push(recipient.x509.clone())
        .expect("Should add recipient");
    CmsContentInfo::encrypt(&recipients, content, Cipher::aes_256_cbc(), CMSOptions::BINARY)
        .expect("Should encrypt")
        .to_der()
        .expect("Should encode enveloped data")
}

/// DER signed-data produced by OpenSSL's own CMS signer.
pub fn openssl_signed_container(content: &[u8], signer: &TestSigner) -> Vec<u8> {
    use openssl::cms::{CMSOptions, CmsContentInfo};

    CmsContentInfo::sign(
        Some(&*signer.x509),
        Some(&*signer.key),
        None,
        Some(content),
        CMSOptions::BINARY,
    )
    .expect("Should sign with OpenSSL")
    .to_der()
    .expect("Should encode signed data")
}
