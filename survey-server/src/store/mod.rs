//! Response persistence
//!
//! Handlers only see the `ResponseStore` trait. The concrete backend is
//! chosen from configuration once at startup by `open_store` and closed on
//! shutdown. Stored documents are identifier-keyed; label mapping happens
//! only when exporting.

use std::sync::Arc;

use async_trait::async_trait;
use survey_common::config::{StorageBackend, StorageConfig};
use survey_common::{NormalizedRecord, Result};
use tracing::info;

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence collaborator for normalized responses
///
/// Stores are append-only: there is no update or delete. Errors are
/// returned as-is; callers make at most one attempt per request.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Persist one record
    async fn insert(&self, record: &NormalizedRecord) -> Result<()>;

    /// Every stored record, in the order the backend naturally returns them
    async fn list_all(&self) -> Result<Vec<NormalizedRecord>>;

    /// Release the underlying handle
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Open the configured backend
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ResponseStore>> {
    let store: Arc<dyn ResponseStore> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStore::connect(&config.database_path).await?),
        StorageBackend::File => Arc::new(FileStore::connect(&config.data_file).await?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!("Storage ready: {} ({})", config.backend, config.location());
    Ok(store)
}
