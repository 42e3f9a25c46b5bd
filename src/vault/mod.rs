//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - The `CredentialRecord` type (`record`)
//! - The in-memory `CredentialStore` with its invariants (`store`)
//! - The binary vault file envelope (`format`)
//! - `VaultRepository` for loading and atomically saving vaults (`repository`)

pub mod format;
pub mod record;
pub mod repository;
pub mod store;

// Re-export the most commonly used items.
pub use format::VaultHeader;
pub use record::CredentialRecord;
pub use repository::VaultRepository;
pub use store::CredentialStore;
