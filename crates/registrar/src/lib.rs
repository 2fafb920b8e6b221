//! Facade crate for the registrar services.
//! Re-exports domain/kernel primitives and wires the services over one shared store.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,ignore
//! use registrar::Registrar;
//! use registrar::kernel::config::load_config;
//!
//! let cfg = load_config(None::<&str>)?;
//! let registrar = Registrar::builder().config(cfg).build().await?;
//! registrar.engine().enroll("S001", "C001").await?;
//! ```

mod error;

pub use error::{RegistrarError, RegistrarErrorExt};
pub use registrar_domain as domain;
pub use registrar_kernel as kernel;
pub use registrar_storage as storage;

use registrar_catalog::CourseCatalog;
use registrar_domain::config::{CompressionKind, RegistrarConfig, StorageBackend, StorageConfig};
use registrar_enrollment::{RegistrationEngine, checker_for};
use registrar_identity::{BcryptCredentials, StudentAccounts};
use registrar_kernel::{Clock, KeyedLocks, SystemClock};
use registrar_storage::{AnyStore, Compression, FileStore, MemoryStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Feature crates, for callers that need their input and error types.
pub mod features {
    pub use registrar_catalog as catalog;
    pub use registrar_enrollment as enrollment;
    pub use registrar_identity as identity;
}

/// Opens the store selected by `[storage]`.
///
/// # Errors
/// Returns an error when the file store root cannot be created or opened.
pub async fn open_store(config: &StorageConfig) -> Result<AnyStore, RegistrarError> {
    let store = match config.backend {
        StorageBackend::Memory => AnyStore::from(MemoryStore::new()),
        StorageBackend::File => {
            let compression = match config.compression {
                CompressionKind::None => Compression::None,
                CompressionKind::Lz4 => Compression::Lz4,
            };
            FileStore::builder()
                .compression(compression)
                .root(&config.data_dir)
                .open()
                .await
                .context("Opening data directory")?
                .into()
        },
    };
    info!(backend = store.backend(), "Entity store ready");
    Ok(store)
}

/// A fluent builder for the [`Registrar`] service set.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct RegistrarBuilder {
    cfg: RegistrarConfig,
    store: Option<AnyStore>,
}

impl RegistrarBuilder {
    pub fn config(mut self, cfg: RegistrarConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Uses an already opened store instead of the one `[storage]` describes.
    pub fn store(mut self, store: impl Into<AnyStore>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Opens the store and wires the services.
    ///
    /// Catalog and engine share one lock table so catalog edits and counter updates on the
    /// same course never interleave. With `enrollment.reconcile_on_start` set, counters are
    /// rebuilt from registrations before the services are handed out.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened or the start-up reconciliation fails.
    pub async fn build(self) -> Result<Registrar, RegistrarError> {
        let store = match self.store {
            Some(store) => store,
            None => open_store(&self.cfg.storage).await?,
        };

        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let locks = KeyedLocks::new();
        let hasher = Arc::new(BcryptCredentials::new(self.cfg.security.hash_iterations));

        let accounts = StudentAccounts::new(store.clone(), hasher, Arc::clone(&clock));
        let catalog = CourseCatalog::new(store.clone(), Arc::clone(&clock), locks.clone());
        let engine = RegistrationEngine::new(
            store.clone(),
            clock,
            checker_for(self.cfg.enrollment.conflict_policy),
            locks,
        );

        if self.cfg.enrollment.reconcile_on_start {
            let report = engine.reconcile().await.context("Start-up reconciliation")?;
            if !report.is_clean() {
                warn!(corrected = report.corrections.len(), "Enrollment counters were out of sync");
            }
        }

        info!(
            backend = store.backend(),
            conflict_policy = %self.cfg.enrollment.conflict_policy,
            "Registrar initialized"
        );
        Ok(Registrar { config: self.cfg, store, accounts, catalog, engine })
    }
}

/// The wired service set. Cloning is cheap; every service is a shared handle.
#[derive(Debug, Clone)]
pub struct Registrar {
    config: RegistrarConfig,
    store: AnyStore,
    accounts: StudentAccounts<AnyStore>,
    catalog: CourseCatalog<AnyStore>,
    engine: RegistrationEngine<AnyStore>,
}

impl Registrar {
    pub fn builder() -> RegistrarBuilder {
        RegistrarBuilder::default()
    }

    #[must_use]
    pub const fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &AnyStore {
        &self.store
    }

    #[must_use]
    pub const fn accounts(&self) -> &StudentAccounts<AnyStore> {
        &self.accounts
    }

    #[must_use]
    pub const fn catalog(&self) -> &CourseCatalog<AnyStore> {
        &self.catalog
    }

    #[must_use]
    pub const fn engine(&self) -> &RegistrationEngine<AnyStore> {
        &self.engine
    }
}
