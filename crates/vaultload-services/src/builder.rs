use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;
use vaultload_core::models::{
    ExpectedDataset, ExpectedFile, FileRights, ManifestEntry, MIGRATION_FILES,
};
use vaultload_core::VaultResult;

use crate::parse::DatasetMetadata;
use crate::rights::{reconcile_file_rights, DatasetRights};

/// Everything one version contributes to the expected state of its DOI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecords {
    pub dataset: ExpectedDataset,
    pub files: Vec<ExpectedFile>,
}

impl VersionRecords {
    /// Version with empty dataset metadata: a deleted dataset and no files
    pub fn deactivated(doi: &str) -> Self {
        Self {
            dataset: ExpectedDataset::deactivated(doi),
            files: Vec::new(),
        }
    }
}

/// Assemble the expected records of an active version.
///
/// Files come in manifest order followed by the migration files, which get the
/// dataset's default rights.
pub fn build_version_records(
    bag_id: Uuid,
    doi: &str,
    metadata: &DatasetMetadata,
    depositor: &str,
    per_path: &HashMap<String, FileRights>,
    manifest: &[ManifestEntry],
    today: NaiveDate,
) -> VaultResult<VersionRecords> {
    let rights = DatasetRights::from_metadata(metadata, today);
    let dataset = rights.expected_dataset(doi, depositor, metadata);

    let mut files = reconcile_file_rights(
        bag_id,
        doi,
        manifest,
        per_path,
        &rights.default_file_rights,
    )?;
    files.extend(
        MIGRATION_FILES
            .iter()
            .map(|name| ExpectedFile::migration_file(doi, name, rights.default_file_rights.clone())),
    );

    Ok(VersionRecords { dataset, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultload_core::models::{AccessCategory, FileAccessRights};
    use vaultload_core::VaultError;

    fn metadata() -> DatasetMetadata {
        DatasetMetadata {
            access_category: AccessCategory::OpenAccessForRegisteredUsers,
            available: None,
            created: Some("2019".to_string()),
            license: None,
        }
    }

    fn manifest() -> Vec<ManifestEntry> {
        vec![ManifestEntry {
            path: "data/a.txt".to_string(),
            checksum: "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3".to_string(),
        }]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_migration_files_are_appended() {
        let per_path = HashMap::from([("data/a.txt".to_string(), FileRights::default())]);
        let records = build_version_records(
            Uuid::nil(),
            "10.5072/x",
            &metadata(),
            "user001",
            &per_path,
            &manifest(),
            today(),
        )
        .unwrap();

        let paths: Vec<&str> = records.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "data/a.txt",
                "easy-migration/provenance.xml",
                "easy-migration/dataset.xml",
                "easy-migration/files.xml",
            ]
        );
        for file in &records.files[1..] {
            assert!(file.added_during_migration);
            assert!(file.checksum.is_empty());
            assert_eq!(file.rights.accessible_to, Some(FileAccessRights::Known));
            assert_eq!(file.rights.visible_to, Some(FileAccessRights::Anonymous));
        }
        assert!(records.files.iter().all(|f| f.doi == records.dataset.doi));
        assert_eq!(records.dataset.depositor.as_deref(), Some("user001"));
    }

    #[test]
    fn test_missing_rights_builds_nothing() {
        let result = build_version_records(
            Uuid::nil(),
            "10.5072/x",
            &metadata(),
            "user001",
            &HashMap::new(),
            &manifest(),
            today(),
        );
        assert!(matches!(result, Err(VaultError::MissingFileRights { .. })));
    }

    #[test]
    fn test_deactivated_has_no_files() {
        let records = VersionRecords::deactivated("10.5072/x");
        assert!(records.dataset.deleted);
        assert!(records.files.is_empty());
    }
}
