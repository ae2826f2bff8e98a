//! Configuration loading for fin-advisor.
//!
//! Layered precedence: built-in defaults -> config file -> environment
//! variables -> CLI flags (applied by the caller after `load` returns).
//! The default config file lives at `~/.config/fin-advisor/config.toml`.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Generative backend API key (loaded from `ADVISOR_API_KEY`, not
    /// stored in the config file).
    #[serde(default)]
    pub api_key: Option<String>,

    /// Path to the CSV knowledge base with `input`/`output` columns.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// Generative backend model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sentence-embedding model repo used for retrieval.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Number of nearest knowledge base entries retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Response cache time-to-live in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Chunk size for bulk index inserts during knowledge base load.
    #[serde(default = "default_load_batch_size")]
    pub load_batch_size: usize,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_dataset_path() -> String {
    "datasets/final_combined.csv".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_load_batch_size() -> usize {
    1500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            dataset_path: default_dataset_path(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            top_k: default_top_k(),
            cache_ttl_secs: default_cache_ttl_secs(),
            load_batch_size: default_load_batch_size(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings, each source overriding the ones before it: built-in
    /// defaults, the default config file
    /// (`~/.config/fin-advisor/config.toml`), a config file named on the
    /// command line, and finally `ADVISOR_*` environment variables.
    /// Individual CLI flag overrides are applied by the caller afterwards.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from("", "", "fin-advisor")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("dataset_path", default_dataset_path())
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("model", default_model())
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("embedding_model", default_embedding_model())
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("top_k", default_top_k() as i64)
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("cache_ttl_secs", default_cache_ttl_secs() as i64)
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("load_batch_size", default_load_batch_size() as i64)
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        // A config file named on the command line beats the default one
        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // ADVISOR_API_KEY, ADVISOR_DATASET_PATH, ADVISOR_TOP_K, and so on.
        // Keys are flat, so no nesting separator is configured.
        builder = builder.add_source(Environment::with_prefix("ADVISOR").try_parsing(true));

        let config = builder
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Validate numeric settings. The API key is checked separately at
    /// engine construction so that `load` stays usable for commands that
    /// never touch the backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be >= 1".to_string()));
        }
        if self.load_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "load_batch_size must be >= 1".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "cache_ttl_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Expand `~` in the dataset path to the user's home directory.
    pub fn expanded_dataset_path(&self) -> PathBuf {
        if self.dataset_path.starts_with("~/") {
            if let Some(home) = home_dir() {
                return home.join(&self.dataset_path[2..]);
            }
        }
        PathBuf::from(&self.dataset_path)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.top_k, 3);
        assert_eq!(settings.cache_ttl_secs, 600);
        assert_eq!(settings.load_batch_size, 1500);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_load_without_overrides() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.top_k, 3);
        assert_eq!(
            settings.embedding_model,
            "sentence-transformers/all-MiniLM-L6-v2"
        );
    }

    #[test]
    fn test_load_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "model = \"gemini-2.0-flash\"").unwrap();
        writeln!(file, "top_k = 5").unwrap();

        let settings = Settings::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(settings.model, "gemini-2.0-flash");
        assert_eq!(settings.top_k, 5);
        // Untouched fields keep their defaults
        assert_eq!(settings.cache_ttl_secs, 600);
    }

    #[test]
    fn test_load_missing_cli_config_fails() {
        let result = Settings::load(Some("/nonexistent/advisor-config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.top_k = 0;
        assert!(settings.validate().is_err());

        settings.top_k = 3;
        settings.load_batch_size = 0;
        assert!(settings.validate().is_err());

        settings.load_batch_size = 1500;
        settings.cache_ttl_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_expanded_dataset_path_passthrough() {
        let settings = Settings {
            dataset_path: "/data/faqs.csv".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.expanded_dataset_path(),
            PathBuf::from("/data/faqs.csv")
        );
    }

    #[test]
    fn test_expanded_dataset_path_tilde() {
        let settings = Settings {
            dataset_path: "~/faqs.csv".to_string(),
            ..Default::default()
        };
        let expanded = settings.expanded_dataset_path();
        assert!(!expanded.to_string_lossy().starts_with("~/"));
        assert!(expanded.to_string_lossy().ends_with("faqs.csv"));
    }
}
