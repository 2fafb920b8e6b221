//! File-backed entity store: one directory per table, one file per record.
//!
//! Writes go through a unique temp file, `fsync`, and `rename`, so a record file is
//! either the old version or the new one after a crash. Secondary indexes live in
//! memory and are rebuilt from a table scan the first time a table is touched.

use crate::builder::FileStoreBuilder;
use crate::codec::{self, Compression};
use crate::error::{StorageError, StorageErrorExt};
use crate::index::TableIndex;
use crate::maintenance::{self, TMP_MARKER};
use crate::namespace::TableName;
use crate::security;
use crate::store::EntityStore;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use registrar_domain::Record;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// The internal shared state of a [`FileStore`] instance.
#[derive(Debug)]
pub struct FileStoreInner {
    /// The canonicalized physical path on the disk where all tables live.
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
    /// Loaded secondary indexes, keyed by table.
    pub(crate) indexes: RwLock<FxHashMap<&'static str, TableIndex>>,
}

/// A thread-safe handle to the file-backed store.
///
/// Layout: `<root>/<table>/<k0k1>/<k2k3>/<key>.rec`, each file holding one
/// postcard-encoded record, optionally LZ4 compressed.
///
/// Writers of the same key are expected to be serialized by the caller; the store
/// itself only guarantees that each individual write is atomic.
///
/// # Example
///
/// ```rust
/// use registrar_storage::{Compression, FileStore, StorageError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let store = FileStore::builder()
///         .root(tmp.path().join("data"))
///         .compression(Compression::Lz4)
///         .open()
///         .await?;
///
///     assert!(store.root().is_absolute());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    pub(crate) inner: Arc<FileStoreInner>,
}

impl Deref for FileStore {
    type Target = FileStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FileStore {
    #[must_use = "The store is not opened until you call .open()"]
    pub fn builder() -> FileStoreBuilder {
        FileStoreBuilder::new()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Removes temp files abandoned by interrupted writes.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    async fn read_record<R: Record>(&self, path: &Path) -> Result<Option<R>, StorageError> {
        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        codec::decode(&data, self.compression)
            .context(path.display().to_string())
            .map(Some)
    }

    async fn load_table<R: Record>(&self, table: TableName) -> Result<Vec<R>, StorageError> {
        let files = maintenance::list_records(self.root.join(table.as_str())).await?;

        let mut records = Vec::with_capacity(files.len());
        for (key, path) in files {
            match self.read_record::<R>(&path).await? {
                Some(record) if record.id() == key => records.push(record),
                Some(record) => {
                    warn!(table = %table, file = %key, id = record.id(), "Record id does not match its file name, skipping");
                },
                // Deleted between listing and reading.
                None => {},
            }
        }
        Ok(records)
    }

    /// Builds the table's index from disk unless it is already resident.
    ///
    /// Mutations call this before touching the file so that their own index update
    /// always lands in the resident index.
    async fn ensure_index<R: Record>(&self, table: TableName) -> Result<(), StorageError> {
        let loaded = self.indexes.read().contains_key(table.as_str());
        if loaded {
            return Ok(());
        }

        let records = self.load_table::<R>(table).await?;
        let mut index = TableIndex::default();
        for record in &records {
            index.upsert(record.id(), record.index_entries());
        }

        self.indexes.write().entry(table.as_str()).or_insert(index);
        debug!(table = %table, records = records.len(), "Secondary index loaded");
        Ok(())
    }

    async fn write_atomic(&self, target: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create shards for {}", target.display()))?;
        }

        let temp = unique_tmp_path(target, &self.tmp_counter);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, target).await {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(target)
                    .await
                    .context(format!("Failed to replace existing file: {}", target.display()))?;
                fs::rename(&temp, target).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    target.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp).await;
                return Err(StorageError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), target.display())
                            .into(),
                    ),
                });
            }
        }

        if let Some(parent) = target.parent() {
            Self::sync_dir(parent).await;
        }

        Ok(())
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

impl EntityStore for FileStore {
    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StorageError> {
        if !security::is_valid_key(id) {
            return Ok(None);
        }
        let path = security::record_path(&self.root, TableName::of::<R>()?, id)?;
        self.read_record(&path).await
    }

    async fn put<R: Record>(&self, record: &R) -> Result<(), StorageError> {
        let table = TableName::of::<R>()?;
        let id = record.id();
        let path = security::record_path(&self.root, table, id)?;
        let data = codec::encode(record, self.compression)?;

        self.ensure_index::<R>(table).await?;
        self.write_atomic(&path, &data).await?;
        self.indexes.write().entry(table.as_str()).or_default().upsert(id, record.index_entries());

        debug!(table = %table, id, "Record saved atomically");
        Ok(())
    }

    async fn delete<R: Record>(&self, id: &str) -> Result<bool, StorageError> {
        if !security::is_valid_key(id) {
            return Ok(false);
        }
        let table = TableName::of::<R>()?;
        let path = security::record_path(&self.root, table, id)?;

        self.ensure_index::<R>(table).await?;
        match fs::remove_file(&path).await {
            Ok(()) => {},
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Failed to delete: {}", path.display()).into()),
                });
            },
        }
        if let Some(index) = self.indexes.write().get_mut(table.as_str()) {
            index.remove(id);
        }

        debug!(table = %table, id, "Record deleted");
        Ok(true)
    }

    async fn find_by_index<R: Record>(&self, index: &str, value: &str) -> Result<Vec<R>, StorageError> {
        let table = TableName::of::<R>()?;
        self.ensure_index::<R>(table).await?;

        let ids = self
            .indexes
            .read()
            .get(table.as_str())
            .map(|idx| idx.lookup(index, value))
            .unwrap_or_default();

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let path = security::record_path(&self.root, table, &id)?;
            if let Some(record) = self.read_record(&path).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn scan_all<R: Record>(&self) -> Result<Vec<R>, StorageError> {
        self.load_table(TableName::of::<R>()?).await
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("record");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{counter}"))
}
