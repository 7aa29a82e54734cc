//! In-memory bag store and bag index

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use vaultload_bagstore::BagStoreClient;
use vaultload_core::{VaultError, VaultResult};

/// Resources of one bag. Empty strings behave like a 404 from the store.
#[derive(Debug, Clone, Default)]
pub struct MockBag {
    pub index_entry: String,
    /// `None` makes the sequence query fail like an unknown bag
    pub sequence: Option<String>,
    pub manifest: String,
    pub dataset_xml: String,
    pub files_xml: String,
    pub bag_info_txt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    IndexEntry,
    Sequence,
    Manifest,
    DatasetMetadata,
    FileMetadata,
    BagHeader,
}

/// Mock bag store client recording every fetch
#[derive(Clone, Default)]
pub struct MockBagStore {
    bags: Arc<Mutex<HashMap<Uuid, MockBag>>>,
    calls: Arc<Mutex<Vec<(FetchKind, Uuid)>>>,
}

impl MockBagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bag_id: Uuid, bag: MockBag) {
        self.bags.lock().unwrap().insert(bag_id, bag);
    }

    /// All fetches in call order
    pub fn calls(&self) -> Vec<(FetchKind, Uuid)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: FetchKind) -> Vec<Uuid> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .collect()
    }

    fn fetch(&self, kind: FetchKind, bag_id: Uuid) -> Option<MockBag> {
        self.calls.lock().unwrap().push((kind, bag_id));
        self.bags.lock().unwrap().get(&bag_id).cloned()
    }
}

#[async_trait]
impl BagStoreClient for MockBagStore {
    async fn fetch_index_entry(&self, bag_id: Uuid) -> VaultResult<String> {
        Ok(self
            .fetch(FetchKind::IndexEntry, bag_id)
            .map(|bag| bag.index_entry)
            .unwrap_or_default())
    }

    async fn fetch_sequence(&self, bag_id: Uuid) -> VaultResult<String> {
        self.fetch(FetchKind::Sequence, bag_id)
            .and_then(|bag| bag.sequence)
            .ok_or_else(|| VaultError::Transport {
                url: format!("mock://bag-index/bag-sequence?contains={}", bag_id),
                message: "HTTP 404 Not Found".to_string(),
            })
    }

    async fn fetch_manifest(&self, bag_id: Uuid) -> VaultResult<String> {
        Ok(self
            .fetch(FetchKind::Manifest, bag_id)
            .map(|bag| bag.manifest)
            .unwrap_or_default())
    }

    async fn fetch_dataset_metadata(&self, bag_id: Uuid) -> VaultResult<String> {
        Ok(self
            .fetch(FetchKind::DatasetMetadata, bag_id)
            .map(|bag| bag.dataset_xml)
            .unwrap_or_default())
    }

    async fn fetch_file_metadata(&self, bag_id: Uuid) -> VaultResult<String> {
        Ok(self
            .fetch(FetchKind::FileMetadata, bag_id)
            .map(|bag| bag.files_xml)
            .unwrap_or_default())
    }

    async fn fetch_bag_header(&self, bag_id: Uuid) -> VaultResult<String> {
        Ok(self
            .fetch(FetchKind::BagHeader, bag_id)
            .map(|bag| bag.bag_info_txt)
            .unwrap_or_default())
    }
}
