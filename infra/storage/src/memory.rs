use crate::codec::{self, Compression};
use crate::error::StorageError;
use crate::index::TableIndex;
use crate::security;
use crate::store::EntityStore;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use registrar_domain::Record;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<String, Vec<u8>>,
    index: TableIndex,
}

/// Process-local store. Records are kept encoded so reads hand out independent copies.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<FxHashMap<&'static str, Table>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for MemoryStore {
    async fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StorageError> {
        let tables = self.tables.read();
        tables
            .get(R::TABLE)
            .and_then(|table| table.rows.get(id))
            .map(|bytes| codec::decode(bytes, Compression::None))
            .transpose()
    }

    async fn put<R: Record>(&self, record: &R) -> Result<(), StorageError> {
        let id = record.id();
        security::validate_key(id)?;
        let bytes = codec::encode(record, Compression::None)?;
        let entries = record.index_entries();

        let mut tables = self.tables.write();
        let table = tables.entry(R::TABLE).or_default();
        table.rows.insert(id.to_owned(), bytes);
        table.index.upsert(id, entries);
        Ok(())
    }

    async fn delete<R: Record>(&self, id: &str) -> Result<bool, StorageError> {
        let mut tables = self.tables.write();
        let Some(table) = tables.get_mut(R::TABLE) else {
            return Ok(false);
        };
        let removed = table.rows.remove(id).is_some();
        table.index.remove(id);
        Ok(removed)
    }

    async fn find_by_index<R: Record>(&self, index: &str, value: &str) -> Result<Vec<R>, StorageError> {
        let tables = self.tables.read();
        let Some(table) = tables.get(R::TABLE) else {
            return Ok(Vec::new());
        };
        table
            .index
            .lookup(index, value)
            .iter()
            .filter_map(|id| table.rows.get(id))
            .map(|bytes| codec::decode(bytes, Compression::None))
            .collect()
    }

    async fn scan_all<R: Record>(&self) -> Result<Vec<R>, StorageError> {
        let tables = self.tables.read();
        let Some(table) = tables.get(R::TABLE) else {
            return Ok(Vec::new());
        };
        table.rows.values().map(|bytes| codec::decode(bytes, Compression::None)).collect()
    }
}
