use crate::codec::Compression;
use crate::engine::{FileStore, FileStoreInner};
use crate::error::{StorageError, StorageErrorExt};
use parking_lot::RwLock;
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
struct FileStoreConfig {
    compression: Compression,
    create: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self { compression: Compression::None, create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct FileStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    config: FileStoreConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> FileStoreBuilder<S> {
    #[must_use = "Sets on-disk compression for record files"]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    #[must_use = "Sets whether the root directory is created when missing"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> FileStoreBuilder<N> {
        FileStoreBuilder { state, config: self.config }
    }
}

impl FileStoreBuilder<NoRoot> {
    #[must_use = "Creates a new file store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory of the file store"]
    pub fn root(self, path: impl Into<PathBuf>) -> FileStoreBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl FileStoreBuilder<WithRoot> {
    /// Opens the store.
    ///
    /// 1. Creates the root directory when `create(true)` (the default).
    /// 2. Canonicalizes the root so every record path is absolute.
    /// 3. Removes stale temp files left by interrupted writes.
    ///
    /// Compression is not recorded on disk: reopening a directory with a different
    /// setting makes existing records undecodable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the root is missing and `create` is false, or
    /// if it cannot be created or resolved.
    pub async fn open(self) -> Result<FileStore, StorageError> {
        let root = &self.state.0;

        if self.config.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap store root: {}", root.display()))?;
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve store root: {}", root.display()))?;
        info!(path = %canonical.display(), compression = ?self.config.compression, "File store opened");

        let store = FileStore {
            inner: Arc::new(FileStoreInner {
                root: canonical,
                compression: self.config.compression,
                tmp_counter: AtomicU64::new(1),
                indexes: RwLock::default(),
            }),
        };

        store.purge_tmp().await;

        Ok(store)
    }
}
