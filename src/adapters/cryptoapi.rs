//! Windows CryptoAPI provider and signing wizard adapter.
//!
//! Login goes through `CryptAcquireContextW` / `CryptSetProvParam`, and the
//! signature is produced by `CryptUIWizDigitalSign` with the private key
//! left inside the token's provider.

use std::ffi::CString;

use windows::core::{HSTRING, PCSTR, PCWSTR, PWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::Security::Cryptography::UI::{
    CryptUIWizDigitalSign, CRYPTUI_WIZ_DIGITAL_SIGN_CERT_PVK_INFO,
    CRYPTUI_WIZ_DIGITAL_SIGN_CERT_PVK_INFO_0, CRYPTUI_WIZ_DIGITAL_SIGN_EXTENDED_INFO,
    CRYPTUI_WIZ_DIGITAL_SIGN_INFO, CRYPTUI_WIZ_DIGITAL_SIGN_INFO_0,
    CRYPTUI_WIZ_DIGITAL_SIGN_INFO_1, CRYPTUI_WIZ_DIGITAL_SIGN_PVK,
    CRYPTUI_WIZ_DIGITAL_SIGN_PVK_PROV, CRYPTUI_WIZ_DIGITAL_SIGN_SUBJECT_FILE,
};
use windows::Win32::Security::Cryptography::{
    CryptAcquireContextW, CryptReleaseContext, CryptSetProvParam, CRYPT_KEY_PROV_INFO,
    CRYPT_SET_PROV_PARAM_ID,
};

use crate::adapters::backend::{CryptoProvider, ProviderSession, RawProviderHandle};
use crate::domain::constants;
use crate::domain::request::{ProviderInfo, SignRequest};
use crate::domain::types::{ContainerName, TokenPin};
use crate::infra::error::{win32_error_code, SigningError, SigningResult};

/// CryptoAPI-backed provider for CSP-registered tokens.
#[derive(Debug, Default)]
pub struct CryptoApiProvider;

impl CryptoApiProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Map a failed call to `PlatformError`, keeping the `GetLastError` value.
fn platform_error(call: &'static str, error: &windows::core::Error) -> SigningError {
    let code = win32_error_code(error.code().0 as u32);
    log::debug!("{call} failed: {}", error.message());
    SigningError::platform(call, code)
}

impl CryptoProvider for CryptoApiProvider {
    fn backend_name(&self) -> &'static str {
        "CryptoAPI"
    }

    fn acquire_context(
        &self,
        container: &ContainerName,
        provider: &ProviderInfo,
    ) -> SigningResult<RawProviderHandle> {
        let container_w = HSTRING::from(container.as_str());
        let provider_w = HSTRING::from(provider.name.as_str());
        let flags = if provider.silent {
            constants::CRYPT_SILENT
        } else {
            0
        };

        let mut handle: usize = 0;
        // SAFETY: both strings are NUL-terminated HSTRINGs that outlive the
        // call and `handle` is a valid out pointer.
        unsafe {
            CryptAcquireContextW(
                &mut handle,
                &container_w,
                &provider_w,
                provider.provider_type,
                flags,
            )
        }
        .map_err(|e| platform_error("CryptAcquireContext", &e))?;

        if handle == 0 {
            return Err(SigningError::platform("CryptAcquireContext", 0));
        }
        Ok(handle)
    }

    fn set_signature_pin(&self, handle: RawProviderHandle, pin: &TokenPin) -> SigningResult<()> {
        // Interior NULs are rejected when the PIN is constructed.
        let pin_c = CString::new(pin.as_bytes()).map_err(|_| {
            SigningError::ValidationError("Token PIN must not contain NUL characters".to_string())
        })?;

        // SAFETY: `handle` came from CryptAcquireContextW and `pin_c` is a
        // NUL-terminated buffer alive for the duration of the call.
        let result = unsafe {
            CryptSetProvParam(
                handle,
                CRYPT_SET_PROV_PARAM_ID(constants::PP_SIGNATURE_PIN),
                pin_c.as_ptr().cast::<u8>(),
                0,
            )
        };
        let mut bytes = pin_c.into_bytes_with_nul();
        zeroize::Zeroize::zeroize(&mut bytes);

        result.map_err(|e| platform_error("CryptSetProvParam", &e))
    }

    fn release_context(&self, handle: RawProviderHandle) -> SigningResult<()> {
        // SAFETY: the session owns `handle` and releases it once.
        unsafe { CryptReleaseContext(handle, 0) }
            .map_err(|e| platform_error("CryptReleaseContext", &e))
    }

    fn digital_sign(
        &self,
        session: &ProviderSession<'_>,
        request: &SignRequest,
    ) -> SigningResult<()> {
        log::debug!(
            "Signing with provider handle {:#x} held by the session",
            session.handle()
        );

        let container_w = HSTRING::from(request.container.as_str());
        let provider_w = HSTRING::from(request.provider.name.as_str());
        let cert_w = HSTRING::from(request.certificate_file.as_path().as_os_str());
        let target_w = HSTRING::from(request.file_to_sign.as_path().as_os_str());
        let timestamp_w = request
            .timestamp_url
            .as_ref()
            .map(|url| HSTRING::from(url.as_str()));
        let hash_oid = CString::new(request.hash_algorithm.oid()).map_err(|_| {
            SigningError::ValidationError("hash OID contains a NUL character".to_string())
        })?;

        let mut ext_info = CRYPTUI_WIZ_DIGITAL_SIGN_EXTENDED_INFO {
            dwSize: std::mem::size_of::<CRYPTUI_WIZ_DIGITAL_SIGN_EXTENDED_INFO>() as u32,
            pszHashAlg: PCSTR(hash_oid.as_ptr().cast::<u8>()),
            ..Default::default()
        };

        // The wizard only reads these strings; the PWSTR fields are a header quirk.
        let mut key_prov_info = CRYPT_KEY_PROV_INFO {
            pwszContainerName: PWSTR(container_w.as_ptr().cast_mut()),
            pwszProvName: PWSTR(provider_w.as_ptr().cast_mut()),
            dwProvType: request.provider.provider_type,
            ..Default::default()
        };

        let mut pvk_info = CRYPTUI_WIZ_DIGITAL_SIGN_CERT_PVK_INFO {
            dwSize: std::mem::size_of::<CRYPTUI_WIZ_DIGITAL_SIGN_CERT_PVK_INFO>() as u32,
            pwszSigningCertFileName: PWSTR(cert_w.as_ptr().cast_mut()),
            dwPvkChoice: CRYPTUI_WIZ_DIGITAL_SIGN_PVK_PROV,
            Anonymous: CRYPTUI_WIZ_DIGITAL_SIGN_CERT_PVK_INFO_0 {
                pPvkProvInfo: &mut key_prov_info,
            },
        };

        let sign_info = CRYPTUI_WIZ_DIGITAL_SIGN_INFO {
            dwSize: std::mem::size_of::<CRYPTUI_WIZ_DIGITAL_SIGN_INFO>() as u32,
            dwSubjectChoice: CRYPTUI_WIZ_DIGITAL_SIGN_SUBJECT_FILE,
            Anonymous1: CRYPTUI_WIZ_DIGITAL_SIGN_INFO_0 {
                pwszFileName: PCWSTR(target_w.as_ptr()),
            },
            dwSigningCertChoice: CRYPTUI_WIZ_DIGITAL_SIGN_PVK,
            Anonymous2: CRYPTUI_WIZ_DIGITAL_SIGN_INFO_1 {
                pSigningCertPvkInfo: &mut pvk_info,
            },
            pwszTimestampURL: timestamp_w
                .as_ref()
                .map_or_else(PCWSTR::null, |url| PCWSTR(url.as_ptr())),
            pSignExtInfo: &mut ext_info,
            ..Default::default()
        };

        // SAFETY: every pointer in `sign_info` refers to a local that lives
        // until this call returns; no signing context is requested back.
        unsafe {
            CryptUIWizDigitalSign(
                constants::CRYPTUI_WIZ_NO_UI,
                HWND::default(),
                PCWSTR::null(),
                &sign_info,
                None,
            )
        }
        .ok()
        .map_err(|e| platform_error("CryptUIWizDigitalSign", &e))
    }
}
