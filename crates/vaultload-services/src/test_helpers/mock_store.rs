//! In-memory expected-record stores

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vaultload_core::models::{ExpectedDataset, ExpectedFile};
use vaultload_core::{VaultError, VaultResult};
use vaultload_db::ExpectedStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedRecord {
    Dataset(ExpectedDataset),
    File(ExpectedFile),
}

/// Store keeping every save in order
#[derive(Clone, Default)]
pub struct MemoryStore {
    saved: Arc<Mutex<Vec<SavedRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SavedRecord> {
        self.saved.lock().unwrap().clone()
    }

    pub fn datasets(&self) -> Vec<ExpectedDataset> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                SavedRecord::Dataset(dataset) => Some(dataset),
                SavedRecord::File(_) => None,
            })
            .collect()
    }

    pub fn files(&self) -> Vec<ExpectedFile> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                SavedRecord::File(file) => Some(file),
                SavedRecord::Dataset(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl ExpectedStore for MemoryStore {
    async fn save_dataset(&self, dataset: &ExpectedDataset) -> VaultResult<()> {
        self.saved
            .lock()
            .unwrap()
            .push(SavedRecord::Dataset(dataset.clone()));
        Ok(())
    }

    async fn save_file(&self, file: &ExpectedFile) -> VaultResult<()> {
        self.saved.lock().unwrap().push(SavedRecord::File(file.clone()));
        Ok(())
    }
}

/// Store failing the first `failures` saves before delegating to a [`MemoryStore`]
pub struct FlakyStore {
    inner: MemoryStore,
    transient: bool,
    failures_left: Mutex<u32>,
    attempts: Mutex<u32>,
}

impl FlakyStore {
    /// Fails with write conflicts
    pub fn transient(inner: MemoryStore, failures: u32) -> Self {
        Self::with_failures(inner, failures, true)
    }

    /// Fails with a non-retryable error
    pub fn permanent(inner: MemoryStore, failures: u32) -> Self {
        Self::with_failures(inner, failures, false)
    }

    fn with_failures(inner: MemoryStore, failures: u32, transient: bool) -> Self {
        Self {
            inner,
            transient,
            failures_left: Mutex::new(failures),
            attempts: Mutex::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }

    fn attempt(&self) -> VaultResult<()> {
        *self.attempts.lock().unwrap() += 1;
        let mut failures_left = self.failures_left.lock().unwrap();
        if *failures_left == 0 {
            return Ok(());
        }
        *failures_left -= 1;
        if self.transient {
            Err(VaultError::SaveConflict(
                "could not serialize access due to concurrent update".to_string(),
            ))
        } else {
            Err(VaultError::Internal("disk full".to_string()))
        }
    }
}

#[async_trait]
impl ExpectedStore for FlakyStore {
    async fn save_dataset(&self, dataset: &ExpectedDataset) -> VaultResult<()> {
        self.attempt()?;
        self.inner.save_dataset(dataset).await
    }

    async fn save_file(&self, file: &ExpectedFile) -> VaultResult<()> {
        self.attempt()?;
        self.inner.save_file(file).await
    }
}
