//! Per-identifier driver
//!
//! [`VaultLoader::load_from_vault`] resolves an identifier in the bag index,
//! expands a base bag into its sequence of versions and writes the expected
//! records of every version, oldest first. The last version written decides
//! the final expected dataset of the DOI.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use uuid::Uuid;
use vaultload_bagstore::BagStoreClient;
use vaultload_core::models::{BagInfo, BagLookup};
use vaultload_core::{AccountSubstitutions, VaultResult};
use vaultload_db::ExpectedStore;

use crate::builder::{build_version_records, VersionRecords};
use crate::parse::{parse_depositor, parse_file_rights, parse_manifest, DatasetMetadata};
use crate::resolver::resolve_bag_info;
use crate::retry::RetryingStore;
use crate::sequence::{order_sequence, parse_sequence};

/// What happened to one top-level identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Unknown to the bag index or unparseable entry
    NotFound,
    /// Not the first bag of its lineage; the base bag carries the lineage
    SkippedVersion { base_id: Uuid },
    Processed { versions: usize },
}

#[derive(Clone)]
pub struct VaultLoader {
    client: Arc<dyn BagStoreClient>,
    store: RetryingStore,
    accounts: Arc<AccountSubstitutions>,
    processing_date: Option<NaiveDate>,
}

impl VaultLoader {
    pub fn new(
        client: Arc<dyn BagStoreClient>,
        store: RetryingStore,
        accounts: Arc<AccountSubstitutions>,
    ) -> Self {
        Self {
            client,
            store,
            accounts,
            processing_date: None,
        }
    }

    /// Fix the date embargoes are compared against instead of using today's date.
    pub fn with_processing_date(mut self, date: NaiveDate) -> Self {
        self.processing_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.processing_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_from_vault(&self, bag_id: Uuid) -> VaultResult<LoadOutcome> {
        let info = match resolve_bag_info(self.client.as_ref(), bag_id).await? {
            BagLookup::Found(info) => info,
            BagLookup::NotFound => {
                tracing::info!("Skipping, not found in bag index");
                return Ok(LoadOutcome::NotFound);
            }
        };

        if !info.is_base() {
            tracing::info!(
                base_id = %info.base_id,
                "Skipping, it is another version of its base bag"
            );
            return Ok(LoadOutcome::SkippedVersion {
                base_id: info.base_id,
            });
        }

        let members = parse_sequence(&self.client.fetch_sequence(bag_id).await?)?;
        if members.len() <= 1 {
            self.process_version(bag_id, &info).await?;
            return Ok(LoadOutcome::Processed { versions: 1 });
        }

        let mut versions = Vec::with_capacity(members.len());
        for member in members {
            match resolve_bag_info(self.client.as_ref(), member).await? {
                BagLookup::Found(member_info) => versions.push(member_info),
                BagLookup::NotFound => {
                    tracing::warn!(member = %member, "Sequence member not in bag index, leaving it out");
                }
            }
        }

        let versions = order_sequence(versions);
        for (position, version) in versions.iter().enumerate() {
            tracing::debug!(
                position = position + 1,
                version_bag_id = %version.bag_id,
                created = %version.created,
                "Processing version from sequence"
            );
            self.process_version(version.base_id, version).await?;
        }

        Ok(LoadOutcome::Processed {
            versions: versions.len(),
        })
    }

    /// Write the expected records of one version: its files first, then the dataset.
    ///
    /// All documents are fetched from the version's own bag. Nothing is written
    /// when the version is inconsistent.
    #[tracing::instrument(skip(self, info), fields(version_bag_id = %info.bag_id, doi = %info.doi))]
    pub async fn process_version(&self, base_id: Uuid, info: &BagInfo) -> VaultResult<VersionRecords> {
        let bag_id = info.bag_id;
        let doi = info.doi.as_str();

        let ddm = self.client.fetch_dataset_metadata(bag_id).await?;
        let records = if ddm.is_empty() {
            tracing::info!("No dataset metadata, expecting a deactivated dataset");
            VersionRecords::deactivated(doi)
        } else {
            let header = self.client.fetch_bag_header(bag_id).await?;
            let account = parse_depositor(bag_id, &header)?;
            let depositor = self.accounts.resolve(&account);
            let metadata = DatasetMetadata::parse(&ddm)?;

            let per_path = parse_file_rights(&self.client.fetch_file_metadata(bag_id).await?)?;
            let manifest = parse_manifest(&self.client.fetch_manifest(bag_id).await?)?;

            build_version_records(
                bag_id,
                doi,
                &metadata,
                depositor,
                &per_path,
                &manifest,
                self.today(),
            )?
        };

        for file in &records.files {
            self.store.save_file(file).await?;
        }
        self.store.save_dataset(&records.dataset).await?;

        tracing::info!(
            files = records.files.len(),
            deleted = records.dataset.deleted,
            "Expected records saved"
        );
        Ok(records)
    }
}
