//! Vaultload persistence layer
//!
//! PostgreSQL repositories for the expected-state records, the [`ExpectedStore`]
//! seam used by the loader, and database setup (pool + migrations).

pub mod db;

pub use db::{setup_database, ExpectedRepository, ExpectedStore, MIGRATOR};
