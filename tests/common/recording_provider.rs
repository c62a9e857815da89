//! A `CryptoProvider` double that records every call.

use etoken_signer::adapters::backend::RawProviderHandle;
use etoken_signer::{
    ContainerName, CryptoProvider, ProviderInfo, ProviderSession, SignRequest, SigningError,
    SigningResult, TokenPin,
};
use std::cell::RefCell;

/// Handle value the double hands out
pub const HANDLE: RawProviderHandle = 0x00C0_FFEE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Acquire { container: String, provider: String },
    SetPin { handle: RawProviderHandle, pin: String },
    Sign { handle: RawProviderHandle, file: String, timestamp: Option<String> },
    Release { handle: RawProviderHandle },
}

/// Which call should fail, with which platform code
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub acquire: Option<u32>,
    pub set_pin: Option<u32>,
    pub sign: Option<u32>,
    pub release: Option<u32>,
}

#[derive(Default)]
pub struct RecordingProvider {
    pub failures: Failures,
    calls: RefCell<Vec<Call>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failures: Failures) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn release_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Release { .. }))
            .count()
    }

    pub fn signed(&self) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| matches!(call, Call::Sign { .. }))
    }
}

impl CryptoProvider for RecordingProvider {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    fn acquire_context(
        &self,
        container: &ContainerName,
        provider: &ProviderInfo,
    ) -> SigningResult<RawProviderHandle> {
        self.calls.borrow_mut().push(Call::Acquire {
            container: container.as_str().to_string(),
            provider: provider.name.clone(),
        });
        match self.failures.acquire {
            Some(code) => Err(SigningError::platform("CryptAcquireContext", code)),
            None => Ok(HANDLE),
        }
    }

    fn set_signature_pin(&self, handle: RawProviderHandle, pin: &TokenPin) -> SigningResult<()> {
        self.calls.borrow_mut().push(Call::SetPin {
            handle,
            pin: pin.as_str().to_string(),
        });
        match self.failures.set_pin {
            Some(code) => Err(SigningError::platform("CryptSetProvParam", code)),
            None => Ok(()),
        }
    }

    fn release_context(&self, handle: RawProviderHandle) -> SigningResult<()> {
        self.calls.borrow_mut().push(Call::Release { handle });
        match self.failures.release {
            Some(code) => Err(SigningError::platform("CryptReleaseContext", code)),
            None => Ok(()),
        }
    }

    fn digital_sign(
        &self,
        session: &ProviderSession<'_>,
        request: &SignRequest,
    ) -> SigningResult<()> {
        self.calls.borrow_mut().push(Call::Sign {
            handle: session.handle(),
            file: request.file_to_sign.to_string(),
            timestamp: request.timestamp_url.as_ref().map(|u| u.as_str().to_string()),
        });
        match self.failures.sign {
            Some(code) => Err(SigningError::platform("CryptUIWizDigitalSign", code)),
            None => Ok(()),
        }
    }
}
