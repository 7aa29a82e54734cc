//! Test helpers for loader unit tests
//!
//! In-memory implementations of the bag store client and the expected-record
//! store, plus fixtures producing the documents the vault serves.

pub mod fixtures;
pub mod mock_bag_store;
pub mod mock_store;

pub use fixtures::*;
pub use mock_bag_store::{FetchKind, MockBag, MockBagStore};
pub use mock_store::{FlakyStore, MemoryStore, SavedRecord};

use std::path::PathBuf;
use vaultload_core::LoaderConfig;

/// Configuration pointing at nothing in particular
pub fn test_config() -> LoaderConfig {
    LoaderConfig {
        database_url: "postgres://localhost/vaultload_test".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 5,
        bag_store_url: "http://localhost:20110/stores/pdbs/".to_string(),
        bag_index_url: "http://localhost:20120/".to_string(),
        config_dir: PathBuf::from("./cfg"),
        http_timeout_seconds: 5,
        save_max_attempts: 3,
        save_retry_delay_ms: 1,
        load_concurrency: 1,
    }
}
