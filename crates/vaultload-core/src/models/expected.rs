use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AccessCategory, FileRights, ManifestEntry};

/// Metadata files written by the migration into every dataset; not in the bag manifest.
/// The conversion of vault bags does not add emd.xml.
pub const MIGRATION_FILES: [&str; 3] = ["provenance.xml", "dataset.xml", "files.xml"];

/// Directory of the migrated dataset that holds [`MIGRATION_FILES`]
pub const MIGRATION_DIR: &str = "easy-migration";

/// Expected state of a migrated dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedDataset {
    pub doi: String,
    pub deleted: bool,
    pub depositor: Option<String>,
    pub access_category: Option<AccessCategory>,
    pub license: Option<String>,
    pub citation_year: Option<String>,
    pub embargo_date: Option<NaiveDate>,
}

impl ExpectedDataset {
    /// Record for a version whose dataset metadata is empty
    pub fn deactivated(doi: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            deleted: true,
            depositor: None,
            access_category: None,
            license: None,
            citation_year: None,
            embargo_date: None,
        }
    }
}

/// Expected state of one file of a migrated dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedFile {
    pub doi: String,
    pub path: String,
    pub checksum: String,
    pub rights: FileRights,
    pub added_during_migration: bool,
}

impl ExpectedFile {
    pub fn from_manifest(doi: &str, entry: &ManifestEntry, rights: FileRights) -> Self {
        Self {
            doi: doi.to_string(),
            path: entry.path.clone(),
            checksum: entry.checksum.clone(),
            rights,
            added_during_migration: false,
        }
    }

    /// Record for one of the [`MIGRATION_FILES`]; the checksum is unknown up front
    pub fn migration_file(doi: &str, name: &str, rights: FileRights) -> Self {
        Self {
            doi: doi.to_string(),
            path: format!("{}/{}", MIGRATION_DIR, name),
            checksum: String::new(),
            rights,
            added_during_migration: true,
        }
    }
}
