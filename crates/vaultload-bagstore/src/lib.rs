//! HTTP client for the bag store and the bag index.
//!
//! [`BagStoreClient`] is the seam the loader fetches through: one method per
//! resource kind, each returning the raw response text. [`HttpBagStore`] is the
//! `reqwest` implementation. Parsing lives with the loader.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use uuid::Uuid;
use vaultload_core::config::normalize_base_url;
use vaultload_core::{VaultError, VaultResult};

/// Fetch-by-identifier access to the bag index and bag store.
///
/// Methods documented as "empty when absent" return an empty string for HTTP 404.
#[async_trait]
pub trait BagStoreClient: Send + Sync {
    /// `GET <index>/bags/<id>`: JSON envelope, empty when absent
    async fn fetch_index_entry(&self, bag_id: Uuid) -> VaultResult<String>;

    /// `GET <index>/bag-sequence?contains=<id>`: one identifier per line
    async fn fetch_sequence(&self, bag_id: Uuid) -> VaultResult<String>;

    /// `GET <store>/bags/<id>/manifest-sha1.txt`, empty when absent
    async fn fetch_manifest(&self, bag_id: Uuid) -> VaultResult<String>;

    /// `GET <store>/bags/<id>/metadata/dataset.xml`, empty when absent or deactivated
    async fn fetch_dataset_metadata(&self, bag_id: Uuid) -> VaultResult<String>;

    /// `GET <store>/bags/<id>/metadata/files.xml`, empty when absent
    async fn fetch_file_metadata(&self, bag_id: Uuid) -> VaultResult<String>;

    /// `GET <store>/bags/<id>/bag-info.txt`, empty when absent
    async fn fetch_bag_header(&self, bag_id: Uuid) -> VaultResult<String>;
}

/// [`BagStoreClient`] over HTTP
#[derive(Clone, Debug)]
pub struct HttpBagStore {
    client: Client,
    bag_store_url: String,
    bag_index_url: String,
}

impl HttpBagStore {
    pub fn new(bag_store_url: &str, bag_index_url: &str, timeout: Duration) -> VaultResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            bag_store_url: normalize_base_url(bag_store_url),
            bag_index_url: normalize_base_url(bag_index_url),
        })
    }

    pub fn bag_store_url(&self) -> &str {
        &self.bag_store_url
    }

    pub fn bag_index_url(&self) -> &str {
        &self.bag_index_url
    }

    fn store_url(&self, bag_id: Uuid, file: &str) -> String {
        format!("{}bags/{}/{}", self.bag_store_url, bag_id, file)
    }

    /// GET `url` and return the body as text.
    ///
    /// With `not_found_as_empty`, a 404 yields an empty body instead of an error.
    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
        not_found_as_empty: bool,
    ) -> VaultResult<String> {
        let transport = |message: String| VaultError::Transport {
            url: url.to_string(),
            message,
        };

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND && not_found_as_empty {
            tracing::debug!(url, "Not found, treating as empty");
            return Ok(String::new());
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(transport(format!(
                "request failed with status {}: {}",
                status, error_text
            )));
        }

        response
            .text()
            .await
            .map_err(|e| transport(format!("failed to read response body: {}", e)))
    }
}

#[async_trait]
impl BagStoreClient for HttpBagStore {
    async fn fetch_index_entry(&self, bag_id: Uuid) -> VaultResult<String> {
        let url = format!("{}bags/{}", self.bag_index_url, bag_id);
        self.get_text(&url, &[], true).await
    }

    async fn fetch_sequence(&self, bag_id: Uuid) -> VaultResult<String> {
        let url = format!("{}bag-sequence", self.bag_index_url);
        self.get_text(&url, &[("contains", bag_id.to_string())], false)
            .await
    }

    async fn fetch_manifest(&self, bag_id: Uuid) -> VaultResult<String> {
        self.get_text(&self.store_url(bag_id, "manifest-sha1.txt"), &[], true)
            .await
    }

    async fn fetch_dataset_metadata(&self, bag_id: Uuid) -> VaultResult<String> {
        self.get_text(&self.store_url(bag_id, "metadata/dataset.xml"), &[], true)
            .await
    }

    async fn fetch_file_metadata(&self, bag_id: Uuid) -> VaultResult<String> {
        self.get_text(&self.store_url(bag_id, "metadata/files.xml"), &[], true)
            .await
    }

    async fn fetch_bag_header(&self, bag_id: Uuid) -> VaultResult<String> {
        self.get_text(&self.store_url(bag_id, "bag-info.txt"), &[], true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const BAG_ID: &str = "38cb3ff1-d59d-4560-a423-6f761b237a56";

    fn bag_id() -> Uuid {
        Uuid::parse_str(BAG_ID).unwrap()
    }

    fn client(server: &mockito::Server) -> HttpBagStore {
        let url = server.url();
        HttpBagStore::new(
            &format!("{}/stores/pdbs", url),
            &url,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_base_urls_are_normalized() {
        let store = HttpBagStore::new(
            "http://localhost:20110/stores/pdbs",
            "http://localhost:20120",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(store.bag_store_url(), "http://localhost:20110/stores/pdbs/");
        assert_eq!(store.bag_index_url(), "http://localhost:20120/");
        assert_eq!(
            store.store_url(bag_id(), "bag-info.txt"),
            format!("http://localhost:20110/stores/pdbs/bags/{}/bag-info.txt", BAG_ID)
        );
    }

    #[tokio::test]
    async fn test_fetch_index_entry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", format!("/bags/{}", BAG_ID).as_str())
            .with_status(200)
            .with_body(r#"{"result":{}}"#)
            .create_async()
            .await;

        let body = client(&server).fetch_index_entry(bag_id()).await.unwrap();

        assert_eq!(body, r#"{"result":{}}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_index_entry_not_found_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", format!("/bags/{}", BAG_ID).as_str())
            .with_status(404)
            .create_async()
            .await;

        let body = client(&server).fetch_index_entry(bag_id()).await.unwrap();

        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sequence_sends_contains_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bag-sequence")
            .match_query(Matcher::UrlEncoded("contains".into(), BAG_ID.into()))
            .with_status(200)
            .with_body(format!("{}\n", BAG_ID))
            .create_async()
            .await;

        let body = client(&server).fetch_sequence(bag_id()).await.unwrap();

        assert_eq!(body.trim(), BAG_ID);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_sequence_not_found_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bag-sequence")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = client(&server).fetch_sequence(bag_id()).await.unwrap_err();

        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    }

    #[tokio::test]
    async fn test_fetch_dataset_metadata_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                format!("/stores/pdbs/bags/{}/metadata/dataset.xml", BAG_ID).as_str(),
            )
            .with_status(200)
            .with_body("<ddm:DDM/>")
            .create_async()
            .await;

        let body = client(&server)
            .fetch_dataset_metadata(bag_id())
            .await
            .unwrap();

        assert_eq!(body, "<ddm:DDM/>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                format!("/stores/pdbs/bags/{}/manifest-sha1.txt", BAG_ID).as_str(),
            )
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client(&server).fetch_manifest(bag_id()).await.unwrap_err();

        match err {
            VaultError::Transport { url, message } => {
                assert!(url.ends_with("manifest-sha1.txt"));
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
