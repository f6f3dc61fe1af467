pub mod types;

use crate::error::{ConfigError, Result};
use crate::tree::MAX_WORKERS_LIMIT;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".openstack-lb-info.toml";

/// Get the global config file path (~/.openstack-lb-info.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Load configuration from file or use defaults
///
/// An explicit path must exist and parse. The global file is optional, and
/// a broken one is reported and ignored.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(parse_config(&content)?);
    }

    if let Some(global) = global_config_path() {
        if global.exists() {
            match fs::read_to_string(&global)
                .map_err(|e| ConfigError::ParsingFailed(e.to_string()))
                .and_then(|content| parse_config(&content))
            {
                Ok(config) => {
                    debug!("Loaded configuration from {}", global.display());
                    return Ok(config);
                }
                Err(e) => warn!("Ignoring {}: {}", global.display(), e),
            }
        }
    }

    Ok(types::Config::default())
}

/// Parse TOML config, clamping `max_workers` into the supported range
///
/// A zero `request_timeout_secs` is rejected since every request would time out.
pub fn parse_config(content: &str) -> std::result::Result<types::Config, ConfigError> {
    let mut config: types::Config =
        toml::from_str(content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;

    if config.api.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "request_timeout_secs",
            message: "must be at least 1 second".to_string(),
        });
    }

    if let Some(workers) = config.defaults.max_workers {
        let clamped = workers.clamp(1, MAX_WORKERS_LIMIT);
        if clamped != workers {
            warn!(
                "max_workers = {} is outside 1..={}, using {}",
                workers, MAX_WORKERS_LIMIT, clamped
            );
            config.defaults.max_workers = Some(clamped);
        }
    }

    Ok(config)
}
