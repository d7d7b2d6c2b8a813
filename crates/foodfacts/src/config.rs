use crate::prelude::*;
use foodfacts_core::config::{CatalogConfig, ConfigOverrides};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config file location: `<config dir>/foodfacts/config.toml`
fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("foodfacts").join(CONFIG_FILE_NAME))
}

/// Resolve the effective configuration for a command
///
/// Defaults, then the config file, then flags and environment variables.
pub fn load(global: &crate::Global) -> Result<CatalogConfig> {
    let overrides = ConfigOverrides {
        endpoint: global.endpoint.clone(),
        page_size: global.page_size,
        timeout_secs: global.timeout,
    };

    let config = load_from(global.config.as_deref(), default_config_path(), overrides)?;
    log::debug!("Effective configuration: {config:?}");

    Ok(config)
}

/// Load from an explicit file, or from the default location when it exists
///
/// An explicit path that cannot be read is an error; a missing default file is not.
pub fn load_from(
    explicit: Option<&Path>,
    default_path: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<CatalogConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_path.filter(|path| path.is_file()),
    };

    let base = match path {
        Some(path) => {
            log::debug!("Reading configuration from {}", path.display());
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            CatalogConfig::from_toml_str(&content)
                .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?
        }
        None => CatalogConfig::default(),
    };

    let config = base
        .with_overrides(overrides)
        .map_err(|e| Error::Config(e.to_string()))?;

    Ok(config)
}
