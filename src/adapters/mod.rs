//! Adapter layer modules for platform integration.
//!
//! Provides:
//! - The `CryptoProvider` seam and the RAII provider session
//! - The Windows CryptoAPI / signing wizard implementation

pub mod backend;

#[cfg(windows)]
pub mod cryptoapi;
