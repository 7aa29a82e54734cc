use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Lineage record of one bag as registered in the bag index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagInfo {
    #[serde(rename = "bag-id")]
    pub bag_id: Uuid,
    #[serde(rename = "base-id")]
    pub base_id: Uuid,
    pub doi: String,
    pub created: DateTime<FixedOffset>,
}

impl BagInfo {
    /// True for the first version of a lineage.
    pub fn is_base(&self) -> bool {
        self.bag_id == self.base_id
    }

    /// Total order used to process the versions of a lineage.
    ///
    /// Ascending creation instant; equal instants fall back to ascending bag id.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.created
            .cmp(&other.created)
            .then_with(|| self.bag_id.cmp(&other.bag_id))
    }
}

/// Outcome of a bag index lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BagLookup {
    Found(BagInfo),
    /// Empty or unparseable index entry
    NotFound,
}

impl BagLookup {
    pub fn found(self) -> Option<BagInfo> {
        match self {
            BagLookup::Found(info) => Some(info),
            BagLookup::NotFound => None,
        }
    }
}

/// JSON envelope returned by `GET <bag-index>/bags/<uuid>`
#[derive(Debug, Deserialize)]
pub struct BagInfoEnvelope {
    pub result: BagInfoResult,
}

#[derive(Debug, Deserialize)]
pub struct BagInfoResult {
    #[serde(rename = "bag-info")]
    pub bag_info: BagInfo,
}

/// One line of a bag's `manifest-sha1.txt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub checksum: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(bag_id: &str, created: &str) -> BagInfo {
        BagInfo {
            bag_id: Uuid::parse_str(bag_id).unwrap(),
            base_id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
            doi: "10.17026/dans-test".to_string(),
            created: DateTime::parse_from_rfc3339(created).unwrap(),
        }
    }

    #[test]
    fn test_envelope_ignores_unknown_fields() {
        let json = r#"{
            "result": {
                "bag-info": {
                    "bag-id": "38cb3ff1-d59d-4560-a423-6f761b237a56",
                    "base-id": "38cb3ff1-d59d-4560-a423-6f761b237a56",
                    "created": "2016-11-13T00:41:11.000+01:00",
                    "doi": "10.5072/dans-2xg-umq8",
                    "urn": "urn:nbn:nl:ui:13-00-3haq"
                }
            }
        }"#;
        let envelope: BagInfoEnvelope = serde_json::from_str(json).unwrap();
        let info = envelope.result.bag_info;
        assert!(info.is_base());
        assert_eq!(info.doi, "10.5072/dans-2xg-umq8");
    }

    #[test]
    fn test_chronological_cmp_compares_instants_across_offsets() {
        // 00:30 at +01:00 is earlier than 00:00 at UTC
        let early = info(
            "00000000-0000-0000-0000-00000000000b",
            "2020-01-01T00:30:00+01:00",
        );
        let late = info(
            "00000000-0000-0000-0000-00000000000a",
            "2020-01-01T00:00:00+00:00",
        );
        assert_eq!(early.chronological_cmp(&late), Ordering::Less);
    }

    #[test]
    fn test_chronological_cmp_breaks_ties_on_bag_id() {
        let a = info(
            "00000000-0000-0000-0000-00000000000a",
            "2020-01-01T00:00:00Z",
        );
        let b = info(
            "00000000-0000-0000-0000-00000000000b",
            "2020-01-01T01:00:00+01:00",
        );
        assert_eq!(a.chronological_cmp(&b), Ordering::Less);
        assert_eq!(b.chronological_cmp(&a), Ordering::Greater);
        assert_eq!(a.chronological_cmp(&a), Ordering::Equal);
    }
}
