//! Database repositories for data access layer
//!
//! `expected` holds the expected dataset/file repository and the store trait the
//! loader writes through; `setup` connects the pool and applies migrations.
//
// Expected-state repository and store trait
pub mod expected;
//
// Pool and migrations
pub mod setup;
//
pub use expected::{ExpectedRepository, ExpectedStore};
pub use setup::{setup_database, MIGRATOR};
