use vaultload_core::models::ManifestEntry;
use vaultload_core::{VaultError, VaultResult};

/// Parse `manifest-sha1.txt`: `<checksum> <path>` per line, blank lines ignored.
///
/// Paths may contain spaces; everything after the first run of whitespace is the path.
pub fn parse_manifest(text: &str) -> VaultResult<Vec<ManifestEntry>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (checksum, path) = line
                .split_once(char::is_whitespace)
                .map(|(checksum, path)| (checksum, path.trim_start()))
                .filter(|(_, path)| !path.is_empty())
                .ok_or_else(|| VaultError::Parse(format!("invalid manifest line: {}", line)))?;
            Ok(ManifestEntry {
                path: path.to_string(),
                checksum: checksum.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let text = "da39a3ee5e6b4b0d3255bfef95601890afd80709  data/a.txt\n\
                    \n\
                    a94a8fe5ccb19ba61c4c0873d391e987982fbbd3 data/some dir/b c.pdf\r\n";
        let entries = parse_manifest(text).unwrap();
        assert_eq!(
            entries,
            vec![
                ManifestEntry {
                    path: "data/a.txt".to_string(),
                    checksum: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string(),
                },
                ManifestEntry {
                    path: "data/some dir/b c.pdf".to_string(),
                    checksum: "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_manifest() {
        assert!(parse_manifest("").unwrap().is_empty());
    }

    #[test]
    fn test_line_without_path_is_rejected() {
        assert!(parse_manifest("da39a3ee5e6b4b0d3255bfef95601890afd80709\n").is_err());
    }
}
