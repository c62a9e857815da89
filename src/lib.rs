//! eToken Signer Library
//!
//! Authenticode signing with keys held on a hardware token. The token is
//! unlocked through its cryptographic service provider and the signature
//! itself is produced by the platform signing wizard, so this crate only
//! validates inputs, logs into the provider and marshals one signing call.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod pipelines;

use std::fmt;
use std::str::FromStr;

pub use adapters::backend::{connect_platform_provider, CryptoProvider, ProviderSession};
pub use domain::request::{ProviderInfo, SignRequest};
pub use domain::types::{ContainerName, InputFile, TimestampUrl, TokenPin};
pub use infra::config::{ConfigManager, SignerConfiguration};
pub use infra::error::{SigningError, SigningResult};
pub use pipelines::logon::token_logon;
pub use pipelines::sign::{SignOutcome, SignWorkflow};

/// Digest algorithms the signing wizard accepts for Authenticode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Dotted OID handed to the wizard as `pszHashAlg`.
    pub fn oid(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => domain::constants::OID_NIST_SHA256,
            HashAlgorithm::Sha384 => domain::constants::OID_NIST_SHA384,
            HashAlgorithm::Sha512 => domain::constants::OID_NIST_SHA512,
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha384" | "sha-384" => Ok(HashAlgorithm::Sha384),
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            other => Err(SigningError::ValidationError(format!(
                "Unsupported hash algorithm: {other}"
            ))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
