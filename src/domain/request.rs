//! The signing request handed to the platform wizard.

use crate::domain::types::{ContainerName, InputFile, TimestampUrl};
use crate::infra::config::SignerConfiguration;
use crate::infra::error::SigningResult;
use crate::HashAlgorithm;

/// Cryptographic service provider identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Registered provider name
    pub name: String,
    /// CryptoAPI provider type
    pub provider_type: u32,
    /// Acquire the context with `CRYPT_SILENT`
    pub silent: bool,
}

impl ProviderInfo {
    pub fn from_config(config: &SignerConfiguration) -> Self {
        Self {
            name: config.provider_name.clone(),
            provider_type: config.provider_type,
            silent: config.silent,
        }
    }
}

impl Default for ProviderInfo {
    fn default() -> Self {
        Self::from_config(&SignerConfiguration::default())
    }
}

/// Everything the signing call needs apart from the PIN
///
/// Built once from validated arguments and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest {
    pub certificate_file: InputFile,
    pub container: ContainerName,
    pub provider: ProviderInfo,
    pub file_to_sign: InputFile,
    pub timestamp_url: Option<TimestampUrl>,
    pub hash_algorithm: HashAlgorithm,
}

impl SignRequest {
    /// Assemble a request, taking provider and digest settings from `config`.
    pub fn new(
        certificate_file: InputFile,
        container: ContainerName,
        file_to_sign: InputFile,
        timestamp_url: Option<TimestampUrl>,
        config: &SignerConfiguration,
    ) -> SigningResult<Self> {
        Ok(Self {
            certificate_file,
            container,
            provider: ProviderInfo::from_config(config),
            file_to_sign,
            timestamp_url,
            hash_algorithm: config.hash_algorithm()?,
        })
    }
}
