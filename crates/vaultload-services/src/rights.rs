//! Dataset and file rights reconciliation
//!
//! The dataset's access category and availability date define the default
//! rights of every file. Explicit rights from `files.xml` win field by field.

use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;
use vaultload_core::models::{
    AccessCategory, ExpectedDataset, ExpectedFile, FileAccessRights, FileRights, ManifestEntry,
};
use vaultload_core::{VaultError, VaultResult};

use crate::parse::DatasetMetadata;

pub const CC0_LICENSE: &str = "http://creativecommons.org/publicdomain/zero/1.0";
pub const DANS_LICENSE: &str =
    "https://dans.knaw.nl/en/about/organisation-and-policy/legal-information/DANSLicence.pdf";

/// License of a dataset: the explicit URI if the metadata names one,
/// otherwise CC0 for open access and the DANS licence for everything else.
pub fn derive_license(explicit: Option<&str>, access_category: AccessCategory) -> String {
    match explicit.map(str::trim).filter(|uri| !uri.is_empty()) {
        Some(uri) => uri.to_string(),
        None if access_category == AccessCategory::OpenAccess => CC0_LICENSE.to_string(),
        None => DANS_LICENSE.to_string(),
    }
}

/// Rights derived from a dataset's metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRights {
    pub access_category: AccessCategory,
    pub default_file_rights: FileRights,
    /// Availability date, only when it lies after the processing date
    pub embargo_date: Option<NaiveDate>,
}

impl DatasetRights {
    pub fn from_metadata(metadata: &DatasetMetadata, today: NaiveDate) -> Self {
        let embargo_date = metadata.available.filter(|available| *available > today);
        let access_category = metadata.access_category;

        Self {
            access_category,
            default_file_rights: FileRights {
                accessible_to: Some(access_category.default_accessible_to()),
                visible_to: Some(FileAccessRights::Anonymous),
                embargo_date,
            },
            embargo_date,
        }
    }

    pub fn expected_dataset(
        &self,
        doi: &str,
        depositor: &str,
        metadata: &DatasetMetadata,
    ) -> ExpectedDataset {
        ExpectedDataset {
            doi: doi.to_string(),
            deleted: false,
            depositor: Some(depositor.to_string()),
            access_category: Some(self.access_category),
            license: Some(derive_license(
                metadata.license.as_deref(),
                self.access_category,
            )),
            citation_year: metadata.citation_year(),
            embargo_date: self.embargo_date,
        }
    }
}

/// One expected file per manifest entry, in manifest order.
///
/// Every manifest path must have an entry in `per_path`; the first one missing
/// fails the whole version before any record exists.
pub fn reconcile_file_rights(
    bag_id: Uuid,
    doi: &str,
    manifest: &[ManifestEntry],
    per_path: &HashMap<String, FileRights>,
    defaults: &FileRights,
) -> VaultResult<Vec<ExpectedFile>> {
    manifest
        .iter()
        .map(|entry| {
            let explicit = per_path
                .get(&entry.path)
                .ok_or_else(|| VaultError::MissingFileRights {
                    bag_id,
                    path: entry.path.clone(),
                })?;
            let rights = explicit.apply_defaults(defaults);
            tracing::trace!(path = %entry.path, rights = ?rights, "Reconciled file rights");
            Ok(ExpectedFile::from_manifest(doi, entry, rights))
        })
        .collect()
}
