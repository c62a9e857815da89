//! Infrastructure layer for cross-cutting concerns.
//!
//! Provides:
//! - Configuration file loading and validation
//! - Error and result types
//! - Logger initialisation

pub mod config;
pub mod error;
pub mod logging;
