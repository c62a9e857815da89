//! Provider backend trait and the scoped provider session.
//!
//! The platform calls (acquire context, set PIN, release context, sign) sit
//! behind [`CryptoProvider`] so the login and signing flow can run against
//! the Windows CryptoAPI or a test double alike.

use crate::domain::request::{ProviderInfo, SignRequest};
use crate::domain::types::{ContainerName, TokenPin};
use crate::infra::error::SigningResult;

#[cfg(not(windows))]
use crate::infra::error::SigningError;

/// Opaque provider handle (`HCRYPTPROV`)
pub type RawProviderHandle = usize;

/// Platform cryptographic provider operations.
pub trait CryptoProvider {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Open the key container in the given provider.
    ///
    /// # Errors
    ///
    /// Returns a platform error if the provider or container can't be opened.
    fn acquire_context(
        &self,
        container: &ContainerName,
        provider: &ProviderInfo,
    ) -> SigningResult<RawProviderHandle>;

    /// Set the signature PIN on an acquired handle.
    ///
    /// # Errors
    ///
    /// Returns a platform error if the provider rejects the PIN.
    fn set_signature_pin(&self, handle: RawProviderHandle, pin: &TokenPin) -> SigningResult<()>;

    /// Release a handle obtained from [`CryptoProvider::acquire_context`].
    ///
    /// # Errors
    ///
    /// Returns a platform error if the provider refuses the release.
    fn release_context(&self, handle: RawProviderHandle) -> SigningResult<()>;

    /// Run the non-interactive signing wizard for `request`.
    ///
    /// `session` must stay alive for the call: the provider keeps the PIN
    /// only while the logged-in handle is open.
    ///
    /// # Errors
    ///
    /// Returns a platform error if the certificate, key or timestamp
    /// endpoint is rejected.
    fn digital_sign(&self, session: &ProviderSession<'_>, request: &SignRequest)
        -> SigningResult<()>;
}

/// An acquired provider handle, released exactly once on drop.
pub struct ProviderSession<'a> {
    provider: &'a dyn CryptoProvider,
    handle: RawProviderHandle,
}

impl<'a> ProviderSession<'a> {
    /// Acquire a context for `container`. Nothing is held if this fails.
    pub fn acquire(
        provider: &'a dyn CryptoProvider,
        container: &ContainerName,
        info: &ProviderInfo,
    ) -> SigningResult<Self> {
        let handle = provider.acquire_context(container, info)?;
        log::debug!(
            "Acquired {} context for container '{container}'",
            provider.backend_name()
        );
        Ok(Self { provider, handle })
    }

    #[must_use]
    pub fn handle(&self) -> RawProviderHandle {
        self.handle
    }

    pub fn set_signature_pin(&self, pin: &TokenPin) -> SigningResult<()> {
        self.provider.set_signature_pin(self.handle, pin)
    }

    pub fn digital_sign(&self, request: &SignRequest) -> SigningResult<()> {
        self.provider.digital_sign(self, request)
    }
}

impl Drop for ProviderSession<'_> {
    fn drop(&mut self) {
        match self.provider.release_context(self.handle) {
            Ok(()) => log::debug!("Released {} context", self.provider.backend_name()),
            Err(e) => log::warn!("Failed to release provider context: {e}"),
        }
    }
}

/// Connect to the provider stack of the running platform.
///
/// # Errors
///
/// Returns [`SigningError::UnsupportedPlatform`] off Windows.
pub fn connect_platform_provider() -> SigningResult<Box<dyn CryptoProvider>> {
    #[cfg(windows)]
    {
        Ok(Box::new(crate::adapters::cryptoapi::CryptoApiProvider::new()))
    }

    #[cfg(not(windows))]
    {
        Err(SigningError::UnsupportedPlatform(format!(
            "token signing requires Windows, this build targets {}",
            std::env::consts::OS
        )))
    }
}
