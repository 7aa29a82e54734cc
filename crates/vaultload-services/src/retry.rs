use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use vaultload_core::models::{ExpectedDataset, ExpectedFile};
use vaultload_core::{LoaderConfig, VaultResult};
use vaultload_db::ExpectedStore;

/// Upper bound for the wait between two attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// How often and how patiently a failed save is repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; at least 1
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles per attempt up to [`MAX_RETRY_DELAY`]
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            max_attempts: config.save_max_attempts.max(1),
            delay: config.save_retry_delay(),
        }
    }

    /// Wait after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }
}

/// [`ExpectedStore`] that repeats saves failing with a transient error.
///
/// Non-transient errors and the error of the last attempt propagate unchanged.
#[derive(Clone)]
pub struct RetryingStore {
    inner: Arc<dyn ExpectedStore>,
    policy: RetryPolicy,
}

impl RetryingStore {
    pub fn new(inner: Arc<dyn ExpectedStore>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn retried<F, Fut>(&self, record: &str, mut save: F) -> VaultResult<()>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = VaultResult<()>> + Send,
    {
        let mut attempt = 1;
        loop {
            match save().await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && attempt < self.policy.max_attempts => {
                    let backoff = self.policy.backoff(attempt);
                    tracing::warn!(
                        record = %record,
                        attempt = attempt,
                        max_attempts = self.policy.max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Save failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        tracing::error!(
                            record = %record,
                            attempts = attempt,
                            error = %e,
                            "Save failed, giving up"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl ExpectedStore for RetryingStore {
    async fn save_dataset(&self, dataset: &ExpectedDataset) -> VaultResult<()> {
        self.retried(&dataset.doi, || self.inner.save_dataset(dataset))
            .await
    }

    async fn save_file(&self, file: &ExpectedFile) -> VaultResult<()> {
        let record = format!("{} {}", file.doi, file.path);
        self.retried(&record, || self.inner.save_file(file)).await
    }
}
