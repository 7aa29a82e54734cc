//! Vaultload Core Library
//!
//! This crate provides the domain models, error type, configuration and the
//! account substitution table shared by every vaultload component.

pub mod accounts;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use accounts::AccountSubstitutions;
pub use config::LoaderConfig;
pub use error::{LogLevel, VaultError, VaultResult};
