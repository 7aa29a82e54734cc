//! Parsers for the documents fetched from the bag store and bag index
//!
//! Each parser turns raw response text into the structured values the loader
//! works with. Malformed input is reported as [`vaultload_core::VaultError::Parse`].

pub mod bag_header;
pub mod dataset;
pub mod files;
pub mod manifest;

pub use bag_header::{parse_depositor, ACCOUNT_FIELD};
pub use dataset::DatasetMetadata;
pub use files::parse_file_rights;
pub use manifest::parse_manifest;

use vaultload_core::VaultError;

pub(crate) fn xml_error(document: &str, err: impl std::fmt::Display) -> VaultError {
    VaultError::Parse(format!("{}: {}", document, err))
}
