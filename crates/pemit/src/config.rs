//! Layered configuration loading.

use crate::error::{PemitError, PemitErrorExt};
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// File stem used when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "pemit";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PEMIT";

/// Loads a configuration structure from a file, overlaid with environment variables.
///
/// 1. **Base file**: `path`, or `pemit` in the working directory. The extension
///    may be omitted; any format supported by the `config` crate is accepted.
/// 2. **Environment**: variables prefixed with `PEMIT__`. Nested fields use double
///    underscores, e.g. `PEMIT__MAX_LISTENERS=25` maps to `max_listeners`.
///
/// # Errors
/// Returns [`PemitError::Config`] if the file is missing, unreadable, or its
/// contents do not match `T`.
///
/// # Example
/// ```rust
/// use pemit::{EmitterConfig, config::load_config};
///
/// let config: EmitterConfig = load_config(Some("config/emitter")).unwrap_or_default();
/// assert_eq!(config.max_listeners, Some(10));
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, PemitError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
