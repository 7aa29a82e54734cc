use uuid::Uuid;
use vaultload_bagstore::BagStoreClient;
use vaultload_core::models::{BagInfoEnvelope, BagLookup};
use vaultload_core::VaultResult;

/// Interpret a bag index response.
///
/// An empty body means the bag is unknown. A body that does not parse is
/// logged with its payload and also treated as unknown.
pub fn parse_bag_info(bag_id: Uuid, payload: &str) -> BagLookup {
    if payload.trim().is_empty() {
        return BagLookup::NotFound;
    }

    match serde_json::from_str::<BagInfoEnvelope>(payload) {
        Ok(envelope) => BagLookup::Found(envelope.result.bag_info),
        Err(e) => {
            tracing::error!(
                bag_id = %bag_id,
                error = %e,
                payload = %payload,
                "Could not parse bag index entry"
            );
            BagLookup::NotFound
        }
    }
}

/// Look up `bag_id` in the bag index. Transport failures propagate.
pub async fn resolve_bag_info(client: &dyn BagStoreClient, bag_id: Uuid) -> VaultResult<BagLookup> {
    let payload = client.fetch_index_entry(bag_id).await?;
    Ok(parse_bag_info(bag_id, &payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{bag_info, index_entry, MockBag, MockBagStore};

    #[test]
    fn test_parse_envelope() {
        let info = bag_info(Uuid::new_v4(), Uuid::new_v4(), "10.17026/dans-a", "2016-11-13T00:41:11.000+01:00");
        let lookup = parse_bag_info(info.bag_id, &index_entry(&info));
        assert_eq!(lookup, BagLookup::Found(info));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let id = Uuid::new_v4();
        let payload = format!(
            r#"{{"result":{{"bag-info":{{"bag-id":"{id}","base-id":"{id}","doi":"10.5072/x","created":"2017-01-01T10:00:00.000+01:00","urn":"urn:nbn:nl:ui:13-x"}}}}}}"#
        );
        let info = parse_bag_info(id, &payload).found().unwrap();
        assert!(info.is_base());
        assert_eq!(info.doi, "10.5072/x");
    }

    #[test]
    fn test_empty_and_garbage_are_not_found() {
        let id = Uuid::new_v4();
        assert_eq!(parse_bag_info(id, ""), BagLookup::NotFound);
        assert_eq!(parse_bag_info(id, "  \n"), BagLookup::NotFound);
        assert_eq!(parse_bag_info(id, "<html>oops</html>"), BagLookup::NotFound);
        assert_eq!(parse_bag_info(id, r#"{"result":{}}"#), BagLookup::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_unknown_bag() {
        let client = MockBagStore::new();
        let lookup = resolve_bag_info(&client, Uuid::new_v4()).await.unwrap();
        assert_eq!(lookup, BagLookup::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_known_bag() {
        let client = MockBagStore::new();
        let id = Uuid::new_v4();
        let info = bag_info(id, id, "10.17026/dans-b", "2018-03-01T12:00:00+00:00");
        client.insert(
            id,
            MockBag {
                index_entry: index_entry(&info),
                ..Default::default()
            },
        );
        let lookup = resolve_bag_info(&client, id).await.unwrap();
        assert_eq!(lookup.found(), Some(info));
    }
}
