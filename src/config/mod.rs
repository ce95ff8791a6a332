//! Configuration management for `thermostat_store`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`THERMO_*`)
//! 3. Config file (`--config`, `THERMO_CONFIG`, or `./thermo.yaml`)
//! 4. Defaults

use crate::error::{Result, ThermoError};
use crate::storage::{
    ConflictPolicy, DEFAULT_SCHEMA_VERSION, OpenOptions, ScheduleStore, VersionChangePolicy,
};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default database filename.
pub const DEFAULT_DB_FILENAME: &str = "thermostat.db";
/// Config file picked up from the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "thermo.yaml";

/// A flat key/value configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(&normalize_key(key))
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// A relative `database` entry is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        let mut layer = layer_from_yaml_value(&value);

        if let Some(db) = layer.get("database").cloned() {
            let candidate = PathBuf::from(&db);
            if candidate.is_relative() {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                layer.insert("database", base.join(candidate).to_string_lossy());
            }
        }

        debug!(path = %path.display(), keys = layer.values.len(), "loaded config file");
        Ok(layer)
    }

    /// Build a layer from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            let Some(stripped) = key.strip_prefix("THERMO_") else {
                continue;
            };
            let normalized = normalize_key(stripped);
            if normalized == "db" {
                layer.insert("database", value);
            } else if KNOWN_KEYS.contains(&normalized.as_str()) {
                layer.insert(&normalized, value);
            }
        }
        layer
    }
}

const KNOWN_KEYS: &[&str] = &["database", "schema-version", "on-version-change", "conflict"];

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub schema_version: Option<i64>,
    pub on_version_change: Option<VersionChangePolicy>,
    pub conflict: Option<ConflictPolicy>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.db {
            layer.insert("database", path.to_string_lossy());
        }
        if let Some(version) = self.schema_version {
            layer.insert("schema-version", version.to_string());
        }
        if let Some(policy) = self.on_version_change {
            layer.insert("on-version-change", policy.as_str());
        }
        if let Some(policy) = self.conflict {
            layer.insert("conflict", policy.as_str());
        }

        layer
    }
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.insert("database", DEFAULT_DB_FILENAME);
    layer.insert("schema-version", DEFAULT_SCHEMA_VERSION.to_string());
    layer.insert("on-version-change", VersionChangePolicy::default().as_str());
    layer.insert("conflict", ConflictPolicy::default().as_str());
    layer
}

/// Pick the config file: CLI flag, then `THERMO_CONFIG`, then `./thermo.yaml`.
#[must_use]
pub fn config_file_path(cli: &CliOverrides) -> PathBuf {
    if let Some(path) = &cli.config {
        return path.clone();
    }
    if let Ok(value) = env::var("THERMO_CONFIG") {
        if !value.trim().is_empty() {
            return PathBuf::from(value);
        }
    }
    PathBuf::from(DEFAULT_CONFIG_FILENAME)
}

/// Load configuration with the documented precedence order.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
pub fn load_config(cli: &CliOverrides) -> Result<ConfigLayer> {
    let file_path = config_file_path(cli);
    if cli.config.is_some() && !file_path.exists() {
        return Err(ThermoError::Config(format!(
            "config file not found: {}",
            file_path.display()
        )));
    }

    Ok(ConfigLayer::merge_layers(&[
        default_config_layer(),
        ConfigLayer::from_yaml(&file_path)?,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]))
}

/// Fully resolved settings for opening the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database: PathBuf,
    pub options: OpenOptions,
}

impl StoreConfig {
    /// Resolve typed settings from a merged layer.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Config`] for unparseable values.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let database = layer
            .get("database")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME), PathBuf::from);

        let schema_version = match layer.get("schema-version") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                ThermoError::Config(format!("schema-version must be an integer, got {raw:?}"))
            })?,
            None => DEFAULT_SCHEMA_VERSION,
        };

        let on_version_change = layer
            .get("on-version-change")
            .map(|raw| raw.parse::<VersionChangePolicy>())
            .transpose()?
            .unwrap_or_default();

        let conflict = layer
            .get("conflict")
            .map(|raw| raw.parse::<ConflictPolicy>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            database: dunce::simplified(&database).to_path_buf(),
            options: OpenOptions {
                schema_version,
                on_version_change,
                conflict,
            },
        })
    }
}

/// Load config and open the store it resolves to.
///
/// # Errors
///
/// Returns an error if config cannot be loaded or the database cannot be opened.
pub fn open_store(cli: &CliOverrides) -> Result<ScheduleStore> {
    let layer = load_config(cli)?;
    let config = StoreConfig::from_layer(&layer)?;
    debug!(
        database = %config.database.display(),
        schema_version = config.options.schema_version,
        on_version_change = %config.options.on_version_change,
        conflict = %config.options.conflict,
        "resolved store config"
    );
    ScheduleStore::open(&config.database, &config.options)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.insert(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
