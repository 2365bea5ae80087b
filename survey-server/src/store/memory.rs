//! In-memory store, for development runs and tests

use async_trait::async_trait;
use survey_common::{NormalizedRecord, Result};
use tokio::sync::RwLock;
use tracing::debug;

use super::ResponseStore;

/// Volatile store holding records in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<NormalizedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn insert(&self, record: &NormalizedRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record.schema_projection());
        debug!("Stored response #{} in memory", records.len());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<NormalizedRecord>> {
        Ok(self.records.read().await.clone())
    }
}
