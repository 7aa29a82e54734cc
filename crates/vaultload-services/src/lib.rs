//! Vaultload Services Library
//!
//! Reconstructs the expected state of migrated datasets from the vault:
//! - Bag index resolution (`resolver`)
//! - Chronological ordering of bag sequences (`sequence`)
//! - File rights reconciliation (`rights`)
//! - Expected record assembly (`builder`)
//! - Bounded retry around persistence (`retry`)
//! - The per-identifier driver (`loader`)

pub mod builder;
pub mod loader;
pub mod parse;
pub mod resolver;
pub mod retry;
pub mod rights;
pub mod sequence;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use builder::{build_version_records, VersionRecords};
pub use loader::{LoadOutcome, VaultLoader};
pub use resolver::resolve_bag_info;
pub use retry::{RetryPolicy, RetryingStore};
pub use rights::{reconcile_file_rights, DatasetRights};
pub use sequence::order_sequence;
