//! `SignWorkflow` runs token login followed by the signing wizard call.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::adapters::backend::CryptoProvider;
use crate::domain::request::SignRequest;
use crate::domain::types::TokenPin;
use crate::infra::error::SigningResult;
use crate::pipelines::logon::token_logon;

/// Result of a successful signing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutcome {
    /// File that now carries the signature
    pub signed_file: PathBuf,
    /// Timestamp authority used, if any
    pub timestamp_url: Option<String>,
    /// Wall-clock time spent in login and signing
    pub duration: Duration,
}

pub struct SignWorkflow<'a> {
    provider: &'a dyn CryptoProvider,
}

impl<'a> SignWorkflow<'a> {
    #[must_use]
    pub fn new(provider: &'a dyn CryptoProvider) -> Self {
        Self { provider }
    }

    /// Log into the token and sign `request.file_to_sign` in place.
    ///
    /// Login failure returns before the wizard is invoked. The provider
    /// session is released once the call returns, whatever its outcome.
    pub fn run(&self, request: &SignRequest, pin: &TokenPin) -> SigningResult<SignOutcome> {
        let started = Instant::now();

        let session = token_logon(self.provider, &request.container, pin, &request.provider)?;

        log::info!(
            "Signing {} with {} using {}",
            request.file_to_sign,
            request.certificate_file,
            request.hash_algorithm
        );
        match &request.timestamp_url {
            Some(url) => log::info!("Timestamp authority: {url}"),
            None => log::warn!("No timestamp URL given, signature will not be timestamped"),
        }

        session.digital_sign(request)?;
        drop(session);

        Ok(SignOutcome {
            signed_file: request.file_to_sign.as_path().to_path_buf(),
            timestamp_url: request.timestamp_url.as_ref().map(|u| u.as_str().to_string()),
            duration: started.elapsed(),
        })
    }
}
