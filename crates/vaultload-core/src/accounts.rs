//! Depositor account substitutions
//!
//! Some depositor accounts were renamed or merged before the migration. The table
//! `account-substitutes.csv` in the configuration directory maps the account name
//! recorded in a bag to the name the migrated dataset should carry.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::VaultResult;

pub const ACCOUNT_SUBSTITUTES_FILE: &str = "account-substitutes.csv";

#[derive(Debug, Deserialize)]
struct SubstitutionRow {
    old: String,
    new: String,
}

/// Read-only mapping from raw account name to canonical account name
#[derive(Debug, Clone, Default)]
pub struct AccountSubstitutions {
    substitutes: HashMap<String, String>,
}

impl AccountSubstitutions {
    pub fn new(substitutes: HashMap<String, String>) -> Self {
        Self { substitutes }
    }

    /// Load `account-substitutes.csv` from `config_dir`. A missing file yields an empty table.
    pub fn load(config_dir: &Path) -> VaultResult<Self> {
        let file = config_dir.join(ACCOUNT_SUBSTITUTES_FILE);
        if !file.exists() {
            tracing::info!(path = %file.display(), "No account substitutions configured");
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(&file)?;
        let mut substitutes = HashMap::new();
        for row in reader.deserialize::<SubstitutionRow>() {
            let row = row?;
            substitutes.insert(row.old, row.new);
        }

        tracing::info!(
            path = %file.display(),
            count = substitutes.len(),
            "Loaded account substitutions"
        );
        Ok(Self { substitutes })
    }

    /// Canonical name for `account`, or `account` itself when it has no substitute
    pub fn resolve<'a>(&'a self, account: &'a str) -> &'a str {
        self.substitutes
            .get(account)
            .map(String::as_str)
            .unwrap_or(account)
    }

    pub fn len(&self) -> usize {
        self.substitutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let accounts = AccountSubstitutions::load(dir.path()).unwrap();
        assert!(accounts.is_empty());
        assert_eq!(accounts.resolve("user001"), "user001");
    }

    #[test]
    fn test_load_and_resolve() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ACCOUNT_SUBSTITUTES_FILE),
            "old,new\nuser001, USER001\nolduser,newuser\n",
        )
        .unwrap();

        let accounts = AccountSubstitutions::load(dir.path()).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts.resolve("user001"), "USER001");
        assert_eq!(accounts.resolve("olduser"), "newuser");
        assert_eq!(accounts.resolve("someone"), "someone");
    }

    #[test]
    fn test_load_rejects_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ACCOUNT_SUBSTITUTES_FILE),
            "old,new\nonly-one-column\n",
        )
        .unwrap();

        assert!(AccountSubstitutions::load(dir.path()).is_err());
    }
}
