//! Token login: open the key container and present the PIN.

use crate::adapters::backend::{CryptoProvider, ProviderSession};
use crate::domain::request::ProviderInfo;
use crate::domain::types::{ContainerName, TokenPin};
use crate::infra::error::SigningResult;

/// Acquire a provider session for `container` and unlock it with `pin`.
///
/// If the PIN is rejected the half-open session is dropped, which releases
/// the handle before the error is returned.
///
/// # Errors
///
/// Returns the platform error of whichever call failed.
pub fn token_logon<'a>(
    provider: &'a dyn CryptoProvider,
    container: &ContainerName,
    pin: &TokenPin,
    info: &ProviderInfo,
) -> SigningResult<ProviderSession<'a>> {
    log::info!(
        "Opening container '{container}' in provider '{}'",
        info.name
    );
    let session = ProviderSession::acquire(provider, container, info)?;

    session.set_signature_pin(pin)?;
    log::info!("Token login succeeded");

    Ok(session)
}
