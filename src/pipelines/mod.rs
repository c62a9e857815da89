//! Workflow pipelines orchestrating provider login and signing.

pub mod logon;
pub mod sign;
