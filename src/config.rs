use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::passenger::StoreType;
use crate::{Error, Result};

pub const DEFAULT_PORT: u16 = 8080;

/// Raw contents of `titanic.toml`; every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TitanicConfig {
    pub port: Option<u16>,
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreSection {
    #[serde(rename = "type")]
    pub store_type: Option<String>,
    pub path: Option<String>,
}

/// Command line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub store_type: Option<String>,
    pub store_path: Option<PathBuf>,
}

/// Fully resolved settings, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub store_type: StoreType,
    pub store_path: PathBuf,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("titanic.toml")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<TitanicConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read config file {}: {}", path.display(), e)))?;
    let config: TitanicConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("failed to parse config file {}: {}", path.display(), e)))?;
    Ok(Some(config))
}

/// Resolve settings with precedence: overrides, then environment, then file.
pub fn resolve(file: Option<TitanicConfig>, overrides: Overrides) -> Result<Settings> {
    resolve_with_env(file, overrides, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    file: Option<TitanicConfig>,
    overrides: Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let file = file.unwrap_or_default();

    let port = match overrides.port {
        Some(port) => port,
        None => match env("API_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config("invalid port number provided in API_PORT".to_string()))?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        },
    };

    let store_type: StoreType = overrides
        .store_type
        .or_else(|| env("STORE_TYPE"))
        .or(file.store.store_type)
        .ok_or_else(|| Error::Config("store type is not set".to_string()))?
        .parse()?;

    let store_path = overrides
        .store_path
        .or_else(|| env(store_type.path_env_var()).map(PathBuf::from))
        .or_else(|| file.store.path.map(PathBuf::from))
        .ok_or_else(|| {
            Error::Config(format!(
                "store path is not set for {} store (set {} or store.path)",
                store_type,
                store_type.path_env_var()
            ))
        })?;

    Ok(Settings { port, store_type, store_path })
}
