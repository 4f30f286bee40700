use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::provider::Nesting;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PolyscriptConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub rhai: RhaiConfig,
}

impl PolyscriptConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        from_file(path)
    }
}

/// Where request-scoped data is kept and how it is laid out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Context key used by the default `ContextProvider`.
    #[serde(default = "default_context_key")]
    pub context_key: String,

    #[serde(default)]
    pub nesting: Nesting,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            context_key: default_context_key(),
            nesting: Nesting::default(),
        }
    }
}

/// Limits and naming for the Rhai engine. Zero means unlimited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RhaiConfig {
    /// Name of the constant holding the provider data inside scripts.
    #[serde(default = "default_global_name")]
    pub global_name: String,

    #[serde(default)]
    pub max_operations: u64,

    #[serde(default = "default_max_call_levels")]
    pub max_call_levels: usize,

    #[serde(default)]
    pub max_string_size: usize,

    #[serde(default)]
    pub max_array_size: usize,

    #[serde(default)]
    pub max_map_size: usize,
}

impl Default for RhaiConfig {
    fn default() -> Self {
        Self {
            global_name: default_global_name(),
            max_operations: 0,
            max_call_levels: default_max_call_levels(),
            max_string_size: 0,
            max_array_size: 0,
            max_map_size: 0,
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, ConfigError> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}

// デフォルト値の定義
fn default_context_key() -> String {
    "script_data".to_string()
}
fn default_global_name() -> String {
    "ctx".to_string()
}
fn default_max_call_levels() -> usize {
    64
}

pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
