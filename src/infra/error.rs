//! Error handling types and result definitions for signing operations.

use thiserror::Error;

/// Result type for signing operations
pub type SigningResult<T> = Result<T, SigningError>;

/// Error types for token login and signing
#[derive(Error, Debug, miette::Diagnostic)]
pub enum SigningError {
    #[error("Invalid input: {0}")]
    #[diagnostic(code(etokensign::invalid_input))]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(etokensign::config),
        help("check the file named by ETOKENSIGN_CONFIG or remove it to use defaults")
    )]
    ConfigurationError(String),

    /// A CryptoAPI call returned failure; `code` is the platform error code.
    #[error("{call} failed, error {code:#x}")]
    #[diagnostic(code(etokensign::platform))]
    PlatformError { call: &'static str, code: u32 },

    #[error("Unsupported platform: {0}")]
    #[diagnostic(
        code(etokensign::unsupported_platform),
        help("token signing goes through the Windows CryptoAPI and only runs on Windows")
    )]
    UnsupportedPlatform(String),
}

impl SigningError {
    /// Shorthand for a failed platform call.
    #[must_use]
    pub fn platform(call: &'static str, code: u32) -> Self {
        SigningError::PlatformError { call, code }
    }

    /// Platform error code, if this error came from a platform call.
    #[must_use]
    pub fn platform_code(&self) -> Option<u32> {
        match self {
            SigningError::PlatformError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Unwrap an `HRESULT_FROM_WIN32` value back to its `GetLastError` code.
///
/// Codes from other facilities (`NTE_*`, `SCARD_*`, `CRYPT_E_*`) are
/// already what `GetLastError` returned and pass through as is.
#[must_use]
pub fn win32_error_code(hresult: u32) -> u32 {
    const FACILITY_WIN32_FAILURE: u32 = 0x8007_0000;
    if hresult & 0xFFFF_0000 == FACILITY_WIN32_FAILURE {
        hresult & 0xFFFF
    } else {
        hresult
    }
}

impl From<toml::de::Error> for SigningError {
    fn from(error: toml::de::Error) -> Self {
        SigningError::ConfigurationError(format!("Failed to parse config file: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SigningError::platform("CryptAcquireContext", 0x8009_0016);
        assert_eq!(
            error.to_string(),
            "CryptAcquireContext failed, error 0x80090016"
        );

        let error = SigningError::ValidationError("empty PIN".to_string());
        assert_eq!(error.to_string(), "Invalid input: empty PIN");
    }

    #[test]
    fn test_platform_code() {
        let error = SigningError::platform("CryptUIWizDigitalSign", 0x8009_2004);
        assert_eq!(error.platform_code(), Some(0x8009_2004));
        assert_eq!(
            SigningError::ValidationError("x".into()).platform_code(),
            None
        );
    }

    #[test]
    fn test_win32_error_code_unwrapping() {
        // ERROR_INVALID_PARAMETER, ERROR_FILE_NOT_FOUND
        assert_eq!(win32_error_code(0x8007_0057), 0x57);
        assert_eq!(win32_error_code(0x8007_0002), 0x2);
        // NTE_BAD_KEYSET, SCARD_W_WRONG_CHV, CRYPT_E_NO_MATCH
        assert_eq!(win32_error_code(0x8009_0016), 0x8009_0016);
        assert_eq!(win32_error_code(0x8010_006B), 0x8010_006B);
        assert_eq!(win32_error_code(0x8009_2009), 0x8009_2009);
        assert_eq!(win32_error_code(0x57), 0x57);
    }
}
