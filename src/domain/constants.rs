//! CryptoAPI and OID constants shared by the domain and the platform adapter.
//! Values mirror `wincrypt.h` / `cryptuiapi.h` so they can be used off Windows.

// === Provider ===

/// CSP registered by SafeNet eToken middleware
pub const ETOKEN_BASE_CRYPT_PROV_NAME: &str = "eToken Base Cryptographic Provider";

/// `PROV_RSA_FULL` provider type
pub const PROV_RSA_FULL: u32 = 1;

/// `CRYPT_SILENT`: the provider must not show UI when acquiring the context
pub const CRYPT_SILENT: u32 = 0x40;

/// `PP_SIGNATURE_PIN`: provider parameter carrying the signature key PIN
pub const PP_SIGNATURE_PIN: u32 = 33;

// === Signing wizard ===

/// `CRYPTUI_WIZ_NO_UI`
pub const CRYPTUI_WIZ_NO_UI: u32 = 0x0001;

// === Digest OIDs ===

/// `szOID_NIST_sha256`
pub const OID_NIST_SHA256: &str = "2.16.840.1.101.3.4.2.1";

/// `szOID_NIST_sha384`
pub const OID_NIST_SHA384: &str = "2.16.840.1.101.3.4.2.2";

/// `szOID_NIST_sha512`
pub const OID_NIST_SHA512: &str = "2.16.840.1.101.3.4.2.3";
