//! postfx configuration
//!
//! Key/value configuration consumed by the effect registry and the shader
//! extractor. Values are kept as raw text and converted on read, so the same
//! key can be queried as a string, a number or a list.
//!
//! Configuration lives in a TOML file, looked up in order:
//! - `$POSTFX_CONFIG`
//! - `./postfx.toml`
//! - `~/.config/postfx/postfx.toml`

pub mod watcher;

pub use watcher::{ConfigEvent, ConfigWatcher};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "POSTFX_CONFIG";
/// Default configuration directory name
const CONFIG_DIR_NAME: &str = "postfx";
/// Default configuration file name
const CONFIG_FILE_NAME: &str = "postfx.toml";

/// Key holding the ordered effect list
pub const EFFECTS_KEY: &str = "effects";
/// Key holding the shader search and include directory
pub const INCLUDE_PATH_KEY: &str = "reshadeIncludePath";

/// Separator of list values stored as a single string
const LIST_SEPARATOR: char = ':';

/// Read-only key/value configuration
///
/// Implementors only provide raw lookup; typed reads fall back to the given
/// default when the key is missing, empty or fails to parse.
pub trait ConfigSource: Send + Sync {
    /// Raw textual value of `key`
    fn raw(&self, key: &str) -> Option<String>;

    /// Check if `key` is present with a non-empty value
    fn has(&self, key: &str) -> bool {
        self.raw(key).is_some_and(|v| !v.trim().is_empty())
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.raw(key) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => default.to_string(),
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        let Some(v) = self.raw(key) else {
            return default;
        };
        match v.trim().to_lowercase().as_str() {
            "" => default,
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            other => {
                log::warn!("Config key '{}': '{}' is not a boolean", key, other);
                default
            }
        }
    }

    fn get_i32(&self, key: &str, default: i32) -> i32 {
        parse_or(self.raw(key), key, default)
    }

    fn get_f32(&self, key: &str, default: f32) -> f32 {
        parse_or(self.raw(key), key, default)
    }

    /// Colon-delimited list, empty items dropped
    fn get_list(&self, key: &str) -> Vec<String> {
        self.raw(key)
            .map(|v| {
                v.split(LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        Some(v) if !v.trim().is_empty() => v.trim().parse().unwrap_or_else(|_| {
            log::warn!("Config key '{}': could not parse '{}'", key, v.trim());
            default
        }),
        _ => default,
    }
}

/// In-memory configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryConfig {
    values: HashMap<String, String>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for MemoryConfig {
    fn raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Configuration loaded from a TOML file
///
/// Top-level scalars become raw values, string arrays are joined with `:`
/// and nested tables are flattened as `table.key`.
#[derive(Debug, Clone, Default)]
pub struct TomlConfig {
    values: MemoryConfig,
    path: Option<PathBuf>,
}

impl TomlConfig {
    /// Load configuration from the first discovered location
    pub fn load() -> Result<Self, ConfigError> {
        match Self::discover()? {
            Some(path) => Self::load_from(&path),
            None => {
                log::info!("No config file found, using empty configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        let mut config = Self::from_toml_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))?;
        config.path = Some(path.to_path_buf());

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;
        let mut values = MemoryConfig::new();
        flatten_table("", &table, &mut values);
        Ok(Self { values, path: None })
    }

    /// File this configuration was loaded from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Find the config file to use, if any
    ///
    /// Priority: `$POSTFX_CONFIG` > `./postfx.toml` > `~/.config/postfx/postfx.toml`
    pub fn discover() -> Result<Option<PathBuf>, ConfigError> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            if !explicit.is_empty() {
                return Ok(Some(PathBuf::from(explicit)));
            }
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Ok(Some(local));
        }

        let user = Self::config_file_path()?;
        Ok(user.exists().then_some(user))
    }

    /// Get the configuration directory path (~/.config/postfx/)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDirectory)?;
        Ok(base.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file path (~/.config/postfx/postfx.toml)
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }
}

impl ConfigSource for TomlConfig {
    fn raw(&self, key: &str) -> Option<String> {
        self.values.raw(key)
    }
}

fn flatten_table(prefix: &str, table: &toml::Table, out: &mut MemoryConfig) {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_table(&key, inner, out),
            toml::Value::Array(items) => {
                let joined: Vec<String> = items.iter().filter_map(scalar_text).collect();
                out.set(key, joined.join(&LIST_SEPARATOR.to_string()));
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    out.set(key, text);
                }
            }
        }
    }
}

fn scalar_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Platform config directory not found
    NoConfigDirectory,
    /// Failed to read config file
    ReadError(PathBuf, std::io::Error),
    /// Failed to parse config file
    ParseError(PathBuf, toml::de::Error),
    /// Failed to set up file watcher
    WatchError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDirectory => write!(f, "Could not determine config directory"),
            ConfigError::ReadError(path, e) => write!(f, "Failed to read {:?}: {}", path, e),
            ConfigError::ParseError(path, e) => write!(f, "Failed to parse {:?}: {}", path, e),
            ConfigError::WatchError(e) => write!(f, "Failed to watch files: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
