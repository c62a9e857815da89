//! Type-safe wrappers using new-type pattern
//!
//! Each wrapper validates its command-line value once, so the login and
//! signing code never deals with empty names, stray NULs or missing files.

use crate::infra::error::{SigningError, SigningResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use zeroize::Zeroizing;

/// Token PIN handed to the provider as `PP_SIGNATURE_PIN`
///
/// The buffer is wiped on drop and never printed.
#[derive(Clone)]
pub struct TokenPin(Zeroizing<String>);

impl TokenPin {
    /// Create a new `TokenPin` after validation
    pub fn new(pin: impl Into<String>) -> SigningResult<Self> {
        let pin = Zeroizing::new(pin.into());
        Self::validate_pin(&pin)?;
        Ok(TokenPin(pin))
    }

    /// Get the PIN as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UTF-8 bytes of the PIN, without terminator
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn validate_pin(pin: &str) -> SigningResult<()> {
        if pin.is_empty() {
            return Err(SigningError::ValidationError(
                "Token PIN must not be empty".to_string(),
            ));
        }
        // The provider reads the PIN as a C string.
        if pin.contains('\0') {
            return Err(SigningError::ValidationError(
                "Token PIN must not contain NUL characters".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromStr for TokenPin {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for TokenPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPin([REDACTED])")
    }
}

impl fmt::Display for TokenPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[PIN REDACTED]")
    }
}

/// Key container name selecting the key pair inside the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(name: impl Into<String>) -> SigningResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SigningError::ValidationError(
                "Private key container name must not be empty".to_string(),
            ));
        }
        if name.contains('\0') {
            return Err(SigningError::ValidationError(
                "Private key container name must not contain NUL characters".to_string(),
            ));
        }
        Ok(ContainerName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ContainerName {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type-safe wrapper for timestamp URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampUrl(String);

impl TimestampUrl {
    /// Create a new `TimestampUrl` after validation
    pub fn new(url: impl AsRef<str>) -> SigningResult<Self> {
        let url = url.as_ref();
        Self::validate_url(url)?;
        Ok(TimestampUrl(url.to_string()))
    }

    /// Parse the command-line form, where an empty string means no timestamp.
    pub fn optional(url: impl AsRef<str>) -> SigningResult<Option<Self>> {
        let url = url.as_ref();
        if url.trim().is_empty() {
            Ok(None)
        } else {
            Self::new(url).map(Some)
        }
    }

    /// Get the URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate_url(url: &str) -> SigningResult<()> {
        let lower = url.to_ascii_lowercase();
        let rest = lower
            .strip_prefix("https://")
            .or_else(|| lower.strip_prefix("http://"))
            .ok_or_else(|| {
                SigningError::ValidationError(format!(
                    "Timestamp URL must start with http:// or https://, got: {url}"
                ))
            })?;

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() || host.starts_with(':') {
            return Err(SigningError::ValidationError(format!(
                "Timestamp URL must contain a host: {url}"
            )));
        }

        if url.chars().any(|c| c.is_whitespace() || c == '\0') {
            return Err(SigningError::ValidationError(format!(
                "Timestamp URL must not contain whitespace or NUL characters: {url:?}"
            )));
        }

        Ok(())
    }
}

impl FromStr for TimestampUrl {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TimestampUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path to an existing regular file (certificate or file to sign)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile(PathBuf);

impl InputFile {
    /// `what` names the argument in the error message.
    pub fn new(path: impl Into<PathBuf>, what: &str) -> SigningResult<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(SigningError::ValidationError(format!(
                "{what} path must not be empty"
            )));
        }
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(InputFile(path)),
            Ok(_) => Err(SigningError::ValidationError(format!(
                "{what} is not a regular file: {}",
                path.display()
            ))),
            Err(e) => Err(SigningError::ValidationError(format!(
                "{what} not accessible: {}: {e}",
                path.display()
            ))),
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
