use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use strum::{AsRefStr, Display};

/// Top-level registrar configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrarConfigInner {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub enrollment: EnrollmentConfig,
    pub security: SecurityConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct RegistrarConfig {
    #[serde(flatten, default)]
    inner: Arc<RegistrarConfigInner>,
}

impl Deref for RegistrarConfig {
    type Target = RegistrarConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for RegistrarConfig {
    fn deref_mut(&mut self) -> &mut RegistrarConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Which entity store adapter backs the services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

/// On-disk compression for the file-backed store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CompressionKind {
    #[default]
    None,
    Lz4,
}

/// Entity store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub compression: CompressionKind,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Directory for rolling log files. Console only when absent.
    pub directory: Option<PathBuf>,
    pub json: bool,
    /// Extra `EnvFilter` directives, e.g. `registrar_enrollment=debug`.
    pub filter: Option<String>,
}

/// How candidate courses are checked against a student's current schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConflictPolicy {
    /// Parsed day/time overlap, falling back to string equality for unparseable schedules.
    #[default]
    Overlap,
    /// Exact schedule string equality only.
    Literal,
}

/// Enrollment engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrollmentConfig {
    pub conflict_policy: ConflictPolicy,
    /// Recompute enrollment counters from active registrations at startup.
    pub reconcile_on_start: bool,
}

/// Credential hashing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// bcrypt key-expansion rounds, rounded down to a power of two (`4096` is cost 12).
    pub hash_iterations: u32,
}

// --- Default ---

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("data"),
            compression: CompressionKind::None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false, filter: None }
    }
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self { conflict_policy: ConflictPolicy::Overlap, reconcile_on_start: true }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self { hash_iterations: 4096 }
    }
}
