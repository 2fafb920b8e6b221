use crate::engine::FileStore;
use crate::error::StorageError;
use crate::memory::MemoryStore;
use registrar_domain::Record;
use std::fmt::Debug;
use std::future::Future;

/// Keyed persistence of [`Record`]s with secondary-index lookup.
///
/// Every method is atomic per record; no multi-record transactions are offered.
/// Collections come back ordered by record id.
///
/// Implementations are cheap handles: services clone them freely.
pub trait EntityStore: Clone + Debug + Send + Sync + 'static {
    /// Returns `None` when no record of type `R` has this id.
    fn get<R: Record>(&self, id: &str) -> impl Future<Output = Result<Option<R>, StorageError>> + Send;

    /// Inserts or replaces the record and refreshes its index entries.
    fn put<R: Record>(&self, record: &R) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Returns whether a record was removed.
    fn delete<R: Record>(&self, id: &str) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// All records whose `index` entry equals `value`.
    fn find_by_index<R: Record>(
        &self,
        index: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<R>, StorageError>> + Send;

    fn scan_all<R: Record>(&self) -> impl Future<Output = Result<Vec<R>, StorageError>> + Send;
}

/// Runtime-selected store, so services stay monomorphic over one concrete type.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(FileStore),
}

impl From<MemoryStore> for AnyStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<FileStore> for AnyStore {
    fn from(store: FileStore) -> Self {
        Self::File(store)
    }
}

impl AnyStore {
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
        }
    }
}

impl EntityStore for AnyStore {
    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StorageError> {
        match self {
            Self::Memory(store) => store.get(id).await,
            Self::File(store) => store.get(id).await,
        }
    }

    async fn put<R: Record>(&self, record: &R) -> Result<(), StorageError> {
        match self {
            Self::Memory(store) => store.put(record).await,
            Self::File(store) => store.put(record).await,
        }
    }

    async fn delete<R: Record>(&self, id: &str) -> Result<bool, StorageError> {
        match self {
            Self::Memory(store) => store.delete::<R>(id).await,
            Self::File(store) => store.delete::<R>(id).await,
        }
    }

    async fn find_by_index<R: Record>(&self, index: &str, value: &str) -> Result<Vec<R>, StorageError> {
        match self {
            Self::Memory(store) => store.find_by_index(index, value).await,
            Self::File(store) => store.find_by_index(index, value).await,
        }
    }

    async fn scan_all<R: Record>(&self) -> Result<Vec<R>, StorageError> {
        match self {
            Self::Memory(store) => store.scan_all().await,
            Self::File(store) => store.scan_all().await,
        }
    }
}
