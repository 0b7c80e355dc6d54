//! Configuration loading and management
//!
//! Guardrails and the model name live in `<root>/config.json`. Loading never
//! fails: a missing file or key falls back to the built-in default, and a
//! file that cannot be parsed falls back to the full default configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::storage::Storage;

/// Default model passed to the LLM binary
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Default cap on tasks rendered into a context
pub const DEFAULT_MAX_TASKS: usize = 20;

/// Default cap on log lines rendered into a context
pub const DEFAULT_MAX_LOG_LINES: usize = 40;

/// Default prompt size guardrail in KB
pub const DEFAULT_MAX_PROMPT_KB: f64 = 15.0;

/// Keys with a typed meaning; anything else is stored as-is
pub const KNOWN_KEYS: [&str; 4] = ["model", "max_tasks", "max_log_lines", "max_prompt_kb"];

/// Typed view of `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model identifier handed to the LLM binary
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum number of active tasks in a context
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,

    /// Maximum number of trailing log lines in a context
    #[serde(default = "default_max_log_lines")]
    pub max_log_lines: usize,

    /// Size guardrail for an assembled prompt, in KB (1024 bytes)
    #[serde(default = "default_max_prompt_kb")]
    pub max_prompt_kb: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tasks: default_max_tasks(),
            max_log_lines: default_max_log_lines(),
            max_prompt_kb: default_max_prompt_kb(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tasks() -> usize {
    DEFAULT_MAX_TASKS
}

fn default_max_log_lines() -> usize {
    DEFAULT_MAX_LOG_LINES
}

fn default_max_prompt_kb() -> f64 {
    DEFAULT_MAX_PROMPT_KB
}

impl Config {
    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Read/merge-write access to `config.json`.
///
/// Writes are last-write-wins; there is no locking on the config file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_storage(storage: &Storage) -> Self {
        Self::new(storage.config_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default configuration if no file exists yet.
    ///
    /// Returns whether a file was created.
    pub fn init(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Config::default())?;
        Ok(true)
    }

    /// Load the effective configuration. Never fails.
    pub fn load(&self) -> Config {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Config::default(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "config unreadable; using defaults");
                return Config::default();
            }
        };

        match serde_json::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "config malformed; using defaults");
                Config::default()
            }
        }
    }

    /// Persist a full configuration atomically
    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        crate::lock::write_atomic_str(&self.path, &json)
    }

    /// Look up one key in the effective configuration.
    ///
    /// Known keys come from [`ConfigStore::load`], so they always have a
    /// value; other keys are read from the persisted object.
    pub fn get(&self, key: &str) -> Option<Value> {
        if KNOWN_KEYS.contains(&key) {
            return self.load().to_map().remove(key);
        }
        self.load_object().remove(key)
    }

    /// The effective configuration as a JSON object, including unknown keys
    pub fn effective(&self) -> Map<String, Value> {
        let mut map = self.load_object();
        map.extend(self.load().to_map());
        map
    }

    /// Load the whole persisted object, replace one key, persist it.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig("config key cannot be empty".to_string()));
        }
        validate_value(key, &value)?;

        let mut map = self.load_object();
        map.insert(key.to_string(), value);

        let json = serde_json::to_string_pretty(&Value::Object(map))?;
        crate::lock::write_atomic_str(&self.path, &json)?;
        tracing::debug!(key, path = %self.path.display(), "config updated");
        Ok(())
    }

    /// The persisted object, or the defaults when missing or not an object
    fn load_object(&self) -> Map<String, Value> {
        let parsed = std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok());
        match parsed {
            Some(Value::Object(map)) => map,
            _ => Config::default().to_map(),
        }
    }
}

/// Type-check a value for one of the known keys.
///
/// Unknown keys are accepted unchecked.
pub fn validate_value(key: &str, value: &Value) -> Result<()> {
    match key {
        "model" => match value.as_str() {
            Some(model) if !model.trim().is_empty() => Ok(()),
            _ => Err(Error::InvalidConfig(
                "model must be a non-empty string".to_string(),
            )),
        },
        "max_tasks" | "max_log_lines" => {
            if value.as_u64().is_some() {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{key} must be a non-negative integer"
                )))
            }
        }
        "max_prompt_kb" => match value.as_f64() {
            Some(kb) if kb > 0.0 && kb.is_finite() => Ok(()),
            _ => Err(Error::InvalidConfig(
                "max_prompt_kb must be a positive number".to_string(),
            )),
        },
        _ => Ok(()),
    }
}

/// Parse a CLI value: JSON when it parses, otherwise a plain string
pub fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("config.json"));
        (dir, store)
    }

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.model, "llama3.2");
        assert_eq!(cfg.max_tasks, 20);
        assert_eq!(cfg.max_log_lines, 40);
        assert_eq!(cfg.max_prompt_kb, 15.0);
    }

    #[test]
    fn missing_keys_fall_back_individually() {
        let (_dir, store) = store();
        fs::write(store.path(), r#"{"model": "mistral", "max_tasks": 5}"#).unwrap();

        let cfg = store.load();
        assert_eq!(cfg.model, "mistral");
        assert_eq!(cfg.max_tasks, 5);
        assert_eq!(cfg.max_log_lines, 40);
        assert_eq!(cfg.max_prompt_kb, 15.0);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let (_dir, store) = store();
        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Config::default());

        fs::write(store.path(), r#"{"max_tasks": "many"}"#).unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn integer_prompt_limit_is_accepted() {
        let (_dir, store) = store();
        fs::write(store.path(), r#"{"max_prompt_kb": 15}"#).unwrap();
        assert_eq!(store.load().max_prompt_kb, 15.0);
    }

    #[test]
    fn set_merges_and_preserves_other_keys() {
        let (_dir, store) = store();
        assert!(store.init().unwrap());
        assert!(!store.init().unwrap());

        store.set("model", Value::from("test-model")).unwrap();
        store.set("theme", Value::from("dark")).unwrap();

        assert_eq!(store.get("model"), Some(Value::from("test-model")));
        assert_eq!(store.get("theme"), Some(Value::from("dark")));
        assert_eq!(store.get("max_tasks"), Some(Value::from(20)));
        assert_eq!(store.load().model, "test-model");
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn set_rejects_wrong_types_for_known_keys() {
        let (_dir, store) = store();
        store.init().unwrap();

        assert!(matches!(
            store.set("max_tasks", Value::from(-1)),
            Err(Error::InvalidConfig(_))
        ));
        assert!(store.set("max_prompt_kb", Value::from(0)).is_err());
        assert!(store.set("model", Value::from("")).is_err());
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn set_on_malformed_file_starts_from_defaults() {
        let (_dir, store) = store();
        fs::write(store.path(), "garbage").unwrap();

        store.set("max_tasks", Value::from(3)).unwrap();
        let cfg = store.load();
        assert_eq!(cfg.max_tasks, 3);
        assert_eq!(cfg.model, "llama3.2");
    }

    #[test]
    fn cli_values_parse_as_json_or_string() {
        assert_eq!(parse_cli_value("12"), Value::from(12));
        assert_eq!(parse_cli_value("0.5"), Value::from(0.5));
        assert_eq!(parse_cli_value("llama3.2"), Value::from("llama3.2"));
        assert_eq!(parse_cli_value("\"quoted\""), Value::from("quoted"));
    }
}
