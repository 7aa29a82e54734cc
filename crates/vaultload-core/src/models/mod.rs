//! Data models for the loader
//!
//! This module contains the bag-lineage records read from the bag index, the
//! rights vocabulary, and the expected-state records handed to persistence.

mod bag;
mod expected;
mod rights;

// Re-export all models for convenient imports
pub use bag::*;
pub use expected::*;
pub use rights::*;
