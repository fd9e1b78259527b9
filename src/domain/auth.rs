//! Authorization context produced by the trust store for a verified signer.

use std::fmt;

use x509_cert::Certificate;

/// A single verified claim about a signer.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthRule {
    /// Subject distinguished name of the signer certificate (RFC 4514 form).
    Identity(String),
    /// The trusted certificate the signature verified against.
    SubjectCert(Box<Certificate>),
    /// Group membership assigned by the trust store configuration.
    Group(String),
}

impl fmt::Debug for AuthRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthRule::Identity(id) => write!(f, "Identity({id})"),
            AuthRule::SubjectCert(cert) => {
                write!(f, "SubjectCert({})", cert.tbs_certificate.subject)
            }
            AuthRule::Group(group) => write!(f, "Group({group})"),
        }
    }
}

/// Ordered bundle of authorization rules. The trust store owns one per
/// trusted certificate; verification hands the caller an independent clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    rules: Vec<AuthRule>,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules describing a trusted end-entity certificate: its identity and
    /// the certificate itself.
    #[must_use]
    pub fn for_certificate(cert: &Certificate) -> Self {
        Self::new()
            .with_rule(AuthRule::Identity(
                cert.tbs_certificate.subject.to_string(),
            ))
            .with_rule(AuthRule::SubjectCert(Box::new(cert.clone())))
    }

    #[must_use]
    pub fn with_rule(mut self, rule: AuthRule) -> Self {
        self.add(rule);
        self
    }

    pub fn add(&mut self, rule: AuthRule) {
        self.rules.push(rule);
    }

    #[must_use]
    pub fn rules(&self) -> &[AuthRule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First identity rule, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.rules.iter().find_map(|rule| match rule {
            AuthRule::Identity(id) => Some(id.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn subject_cert(&self) -> Option<&Certificate> {
        self.rules.iter().find_map(|rule| match rule {
            AuthRule::SubjectCert(cert) => Some(cert.as_ref()),
            _ => None,
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().filter_map(|rule| match rule {
            AuthRule::Group(group) => Some(group.as_str()),
            _ => None,
        })
    }
}
