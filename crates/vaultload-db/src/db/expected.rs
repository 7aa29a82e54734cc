use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool, Postgres};
use vaultload_core::models::{
    AccessCategory, ExpectedDataset, ExpectedFile, FileAccessRights, FileRights,
};
use vaultload_core::{VaultError, VaultResult};

/// Postgres SQLSTATEs that signal a write lost a race and may succeed when repeated:
/// serialization failure, deadlock, and a unique violation between concurrent upserts.
const TRANSIENT_SQLSTATES: [&str; 3] = ["40001", "40P01", "23505"];

/// Sink for expected-state records
///
/// Records are keyed by DOI (datasets) and DOI + path (files); saving a record with
/// an existing key replaces the earlier one.
#[async_trait]
pub trait ExpectedStore: Send + Sync {
    async fn save_dataset(&self, dataset: &ExpectedDataset) -> VaultResult<()>;

    async fn save_file(&self, file: &ExpectedFile) -> VaultResult<()>;
}

/// Map a failed write to [`VaultError::SaveConflict`] when Postgres reports a conflict.
fn map_write_error(err: sqlx::Error) -> VaultError {
    let conflict = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| TRANSIENT_SQLSTATES.contains(&&*code))
        .unwrap_or(false);

    if conflict {
        VaultError::SaveConflict(err.to_string())
    } else {
        VaultError::Database(err)
    }
}

fn parse_column<T: std::str::FromStr<Err = String>>(value: Option<String>) -> VaultResult<Option<T>> {
    value
        .map(|s| s.parse::<T>().map_err(VaultError::Parse))
        .transpose()
}

#[derive(Debug, FromRow)]
struct ExpectedDatasetRow {
    doi: String,
    deleted: bool,
    depositor: Option<String>,
    access_category: Option<String>,
    license: Option<String>,
    citation_year: Option<String>,
    embargo_date: Option<NaiveDate>,
}

impl TryFrom<ExpectedDatasetRow> for ExpectedDataset {
    type Error = VaultError;

    fn try_from(row: ExpectedDatasetRow) -> VaultResult<Self> {
        Ok(ExpectedDataset {
            doi: row.doi,
            deleted: row.deleted,
            depositor: row.depositor,
            access_category: parse_column::<AccessCategory>(row.access_category)?,
            license: row.license,
            citation_year: row.citation_year,
            embargo_date: row.embargo_date,
        })
    }
}

#[derive(Debug, FromRow)]
struct ExpectedFileRow {
    doi: String,
    path: String,
    sha1_checksum: String,
    accessible_to: Option<String>,
    visible_to: Option<String>,
    embargo_date: Option<NaiveDate>,
    added_during_migration: bool,
}

impl TryFrom<ExpectedFileRow> for ExpectedFile {
    type Error = VaultError;

    fn try_from(row: ExpectedFileRow) -> VaultResult<Self> {
        Ok(ExpectedFile {
            doi: row.doi,
            path: row.path,
            checksum: row.sha1_checksum,
            rights: FileRights {
                accessible_to: parse_column::<FileAccessRights>(row.accessible_to)?,
                visible_to: parse_column::<FileAccessRights>(row.visible_to)?,
                embargo_date: row.embargo_date,
            },
            added_during_migration: row.added_during_migration,
        })
    }
}

/// Repository for expected datasets and files
#[derive(Clone)]
pub struct ExpectedRepository {
    pool: PgPool,
}

impl ExpectedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the expected dataset for a DOI
    #[tracing::instrument(skip(self), fields(db.table = "expected_datasets", db.operation = "select"))]
    pub async fn get_dataset(&self, doi: &str) -> VaultResult<Option<ExpectedDataset>> {
        let row = sqlx::query_as::<Postgres, ExpectedDatasetRow>(
            "SELECT doi, deleted, depositor, access_category, license, citation_year, embargo_date FROM expected_datasets WHERE doi = $1",
        )
        .bind(doi)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExpectedDataset::try_from).transpose()
    }

    /// List the expected files of a DOI ordered by path
    #[tracing::instrument(skip(self), fields(db.table = "expected_files", db.operation = "select"))]
    pub async fn list_files(&self, doi: &str) -> VaultResult<Vec<ExpectedFile>> {
        let rows = sqlx::query_as::<Postgres, ExpectedFileRow>(
            "SELECT doi, path, sha1_checksum, accessible_to, visible_to, embargo_date, added_during_migration FROM expected_files WHERE doi = $1 ORDER BY path ASC",
        )
        .bind(doi)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ExpectedFile::try_from).collect()
    }
}

#[async_trait]
impl ExpectedStore for ExpectedRepository {
    #[tracing::instrument(skip(self, dataset), fields(db.table = "expected_datasets", db.operation = "upsert", doi = %dataset.doi))]
    async fn save_dataset(&self, dataset: &ExpectedDataset) -> VaultResult<()> {
        sqlx::query(
            r#"
            INSERT INTO expected_datasets
                (doi, deleted, depositor, access_category, license, citation_year, embargo_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (doi) DO UPDATE SET
                deleted = EXCLUDED.deleted,
                depositor = EXCLUDED.depositor,
                access_category = EXCLUDED.access_category,
                license = EXCLUDED.license,
                citation_year = EXCLUDED.citation_year,
                embargo_date = EXCLUDED.embargo_date,
                updated_at = NOW()
            "#,
        )
        .bind(&dataset.doi)
        .bind(dataset.deleted)
        .bind(dataset.depositor.as_deref())
        .bind(dataset.access_category.map(|c| c.as_str()))
        .bind(dataset.license.as_deref())
        .bind(dataset.citation_year.as_deref())
        .bind(dataset.embargo_date)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self, file), fields(db.table = "expected_files", db.operation = "upsert", doi = %file.doi, path = %file.path))]
    async fn save_file(&self, file: &ExpectedFile) -> VaultResult<()> {
        sqlx::query(
            r#"
            INSERT INTO expected_files
                (doi, path, sha1_checksum, accessible_to, visible_to, embargo_date, added_during_migration)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (doi, path) DO UPDATE SET
                sha1_checksum = EXCLUDED.sha1_checksum,
                accessible_to = EXCLUDED.accessible_to,
                visible_to = EXCLUDED.visible_to,
                embargo_date = EXCLUDED.embargo_date,
                added_during_migration = EXCLUDED.added_during_migration,
                updated_at = NOW()
            "#,
        )
        .bind(&file.doi)
        .bind(&file.path)
        .bind(&file.checksum)
        .bind(file.rights.accessible_to.map(|r| r.as_str()))
        .bind(file.rights.visible_to.map(|r| r.as_str()))
        .bind(file.rights.embargo_date)
        .bind(file.added_during_migration)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }
}
