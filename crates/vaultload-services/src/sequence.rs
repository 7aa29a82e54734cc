use uuid::Uuid;
use vaultload_core::models::BagInfo;
use vaultload_core::{VaultError, VaultResult};

/// Bag identifiers of a `bag-sequence` response, one per line.
pub fn parse_sequence(text: &str) -> VaultResult<Vec<Uuid>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            Uuid::parse_str(line)
                .map_err(|e| VaultError::Parse(format!("invalid bag id in sequence {}: {}", line, e)))
        })
        .collect()
}

/// Versions of a lineage in processing order, oldest first.
///
/// See [`BagInfo::chronological_cmp`]; the result does not depend on input order.
pub fn order_sequence(mut versions: Vec<BagInfo>) -> Vec<BagInfo> {
    versions.sort_by(BagInfo::chronological_cmp);
    versions
}
