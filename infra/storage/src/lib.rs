//! Entity persistence for the registrar.
//!
//! The [`EntityStore`] contract offers keyed get/put/delete of
//! [`Record`](registrar_domain::Record)s plus secondary-index lookup and full scans.
//! Two adapters implement it:
//!
//! - **[`MemoryStore`]**: process-local tables behind a `parking_lot` lock, for tests
//!   and throwaway sessions.
//! - **[`FileStore`]**: a sandboxed directory tree with atomic swaps (unique temp write
//!   + `fsync` + `rename`), key-prefix sharding, optional LZ4 compression and a
//!   self-healing pass that clears orphaned temp files on open.
//!
//! [`AnyStore`] selects one of them at runtime.
//!
//! # Examples
//!
//! ```rust
//! use registrar_domain::{Course, index};
//! use registrar_storage::{EntityStore, MemoryStore, StorageError};
//!
//! async fn enrolled_in_cs(store: &MemoryStore) -> Result<u32, StorageError> {
//!     let courses: Vec<Course> = store.find_by_index(index::COURSE_BY_DEPARTMENT, "CS").await?;
//!     Ok(courses.iter().map(|c| c.enrolled).sum())
//! }
//! ```

mod builder;
mod codec;
mod engine;
mod error;
mod index;
mod maintenance;
mod memory;
mod namespace;
mod security;
mod store;

pub use builder::FileStoreBuilder;
pub use codec::Compression;
pub use engine::FileStore;
pub use error::{StorageError, StorageErrorExt};
pub use memory::MemoryStore;
pub use store::{AnyStore, EntityStore};
