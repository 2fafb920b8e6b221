use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Base name of the configuration file looked up when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "registrar";
/// Prefix of environment overrides (`REGISTRAR__STORAGE__BACKEND=memory`).
pub const ENV_PREFIX: &str = "REGISTRAR";

/// Custom error type for config loading.
#[registrar_derive::registrar_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Base File**: the given path (must exist), or `registrar.{toml,json,yaml}` in the
///    working directory when `path` is `None` (optional; defaults apply when absent).
/// 2. **Environment Overrides**: variables prefixed with `REGISTRAR__`. Nested structures are
///    accessed using double underscores (e.g., `REGISTRAR__STORAGE__DATA_DIR` maps to `storage.data_dir`).
///    Numeric and boolean values are parsed, so `REGISTRAR__SECURITY__HASH_ITERATIONS=1` works.
///
/// # Errors
/// This function will return an error if:
/// * An explicitly given configuration file cannot be found.
/// * The content of the file or the environment does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use registrar_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match &path {
        Some(p) => {
            info!(path = %p.as_ref().display(), "Loading config");
            File::from(p.as_ref()).required(true)
        },
        None => {
            info!(name = DEFAULT_CONFIG_NAME, "Loading config (optional file)");
            File::with_name(DEFAULT_CONFIG_NAME).required(false)
        },
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
