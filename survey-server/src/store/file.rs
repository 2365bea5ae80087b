//! Flat-file store
//!
//! Appends one identifier-keyed JSON document per line. Appends and reads
//! are serialized through a mutex so an export never sees a half-written
//! line from this process.
//!
//! A failed append is truncated back to the previous end of file. A torn
//! line left by a crash is cut off before the next append and skipped when
//! reading, so it never merges with the following record.

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use survey_common::{Error, NormalizedRecord, Result};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::ResponseStore;

/// JSON-lines file store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open the data file, creating it and its parent folder if missing
    pub async fn connect(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let newly_created = !path.exists();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        if newly_created {
            info!("Created response file: {}", path.display());
        } else {
            info!("Opened existing response file: {}", path.display());
        }

        Ok(Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_line(&self, line_no: usize, line: &str) -> Result<NormalizedRecord> {
        let document: Map<String, Value> = serde_json::from_str(line).map_err(|e| {
            Error::CorruptRecord(format!("{}:{}: {}", self.path.display(), line_no, e))
        })?;
        Ok(NormalizedRecord::from_document(&document))
    }

    /// Offset just past the last complete line
    ///
    /// An unterminated tail that is a whole document only lacks its newline,
    /// which is added. Any other tail is a torn append and is cut off.
    async fn committed_end(&self, file: &mut File) -> Result<u64> {
        let len = file.metadata().await?.len();
        if len == 0 {
            return Ok(0);
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1)).await?;
        file.read_exact(&mut last).await?;
        if last[0] == b'\n' {
            return Ok(len);
        }

        let mut content = Vec::new();
        file.seek(SeekFrom::Start(0)).await?;
        file.read_to_end(&mut content).await?;
        let cut = content
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);

        if serde_json::from_slice::<Map<String, Value>>(&content[cut..]).is_ok() {
            file.seek(SeekFrom::Start(len)).await?;
            file.write_all(b"\n").await?;
            return Ok(len + 1);
        }

        warn!(
            "Discarding {} bytes of partial line at end of {}",
            content.len() - cut,
            self.path.display()
        );
        file.set_len(cut as u64).await?;
        Ok(cut as u64)
    }
}

async fn write_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await
}

#[async_trait]
impl ResponseStore for FileStore {
    async fn insert(&self, record: &NormalizedRecord) -> Result<()> {
        let mut line = serde_json::to_string(&record.document())?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&self.path)
            .await?;
        let end = self.committed_end(&mut file).await?;
        file.seek(SeekFrom::Start(end)).await?;

        if let Err(e) = write_line(&mut file, line.as_bytes()).await {
            error!("Append to {} failed: {}", self.path.display(), e);
            if let Err(rollback) = file.set_len(end).await {
                error!("Could not truncate {} after failed append: {}", self.path.display(), rollback);
            }
            return Err(e.into());
        }

        debug!("Appended response to {}", self.path.display());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<NormalizedRecord>> {
        let _guard = self.lock.lock().await;
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let torn_tail = !content.is_empty() && !content.ends_with('\n');
        let line_count = content.lines().count();

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(i, line)| match self.parse_line(i + 1, line) {
                Err(e) if torn_tail && i + 1 == line_count => {
                    warn!("Skipping unterminated last line: {}", e);
                    None
                }
                parsed => Some(parsed),
            })
            .collect()
    }
}
