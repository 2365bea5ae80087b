//! SQLite document store
//!
//! One row per response in the `responses` table; the `data` column holds
//! the identifier-keyed JSON document.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use survey_common::db::init_database;
use survey_common::{Error, NormalizedRecord, Result};
use tracing::{debug, info};

use super::ResponseStore;

/// Store backed by a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database file
    pub async fn connect(db_path: &Path) -> Result<Self> {
        let pool = init_database(db_path).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ResponseStore for SqliteStore {
    async fn insert(&self, record: &NormalizedRecord) -> Result<()> {
        let data = serde_json::to_string(&record.document())?;
        let result = sqlx::query("INSERT INTO responses (created_at, data) VALUES (?, ?)")
            .bind(record.created_at())
            .bind(data)
            .execute(&self.pool)
            .await?;
        debug!("Stored response row {}", result.last_insert_rowid());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<NormalizedRecord>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, data FROM responses ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(id, data)| -> Result<NormalizedRecord> {
                match serde_json::from_str::<Value>(&data)? {
                    Value::Object(document) => Ok(NormalizedRecord::from_document(&document)),
                    _ => Err(Error::CorruptRecord(format!(
                        "responses row {} is not a JSON object",
                        id
                    ))),
                }
            })
            .collect()
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        info!("Database connection closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::record;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_insert_and_list_sorted_by_created_at() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::connect(&dir.path().join("survey.db")).await.unwrap();

        store.insert(&record("2026-03-01T00:00:00.000Z", "late")).await.unwrap();
        store.insert(&record("2026-01-01T00:00:00.000Z", "early")).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].get("purchaseChannel"), "early");
        assert_eq!(all[1].get("purchaseChannel"), "late");
        assert_eq!(all[0].get("postPurchaseActions"), "Left a review; Shared on social");
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("survey.db");

        let store = SqliteStore::connect(&path).await.unwrap();
        let stored = record("2026-01-01T00:00:00.000Z", "Store A");
        store.insert(&stored).await.unwrap();
        store.close().await.unwrap();

        let reopened = SqliteStore::connect(&path).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_reads_label_keyed_documents() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::connect(&dir.path().join("survey.db")).await.unwrap();
        sqlx::query("INSERT INTO responses (created_at, data) VALUES (?, ?)")
            .bind("2026-01-01T00:00:00.000Z")
            .bind(r#"{"Submission time":"2026-01-01T00:00:00.000Z","Where did you purchase the product?":"Legacy"}"#)
            .execute(&store.pool)
            .await
            .unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all[0].get("purchaseChannel"), "Legacy");
        assert_eq!(all[0].created_at(), "2026-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_non_object_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::connect(&dir.path().join("survey.db")).await.unwrap();
        sqlx::query("INSERT INTO responses (created_at, data) VALUES ('x', '[1,2]')")
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(matches!(store.list_all().await, Err(Error::CorruptRecord(_))));
    }
}
