//! Text cache configuration with precedence and validation
//!
//! Values come from defaults, an optional JSON file, and `TEXTCACHE_*`
//! environment variables, in increasing order of precedence.

use crate::errors::{CacheError, Result};
use crate::storage::{BackendKind, CompressionConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use textcache_core::{
    Environment, DEFAULT_ROOT_DIR, TEXTCACHE_BACKEND_VAR, TEXTCACHE_COMPRESSION_LEVEL_VAR,
    TEXTCACHE_COMPRESSION_VAR, TEXTCACHE_ENV_VAR, TEXTCACHE_ROOT_VAR,
};

/// Source of configuration for debugging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default configuration
    #[default]
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variables
    Environment,
    /// Assembled in code through the builder
    Builder,
}

/// Configuration for composing a `TextStore`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextCacheConfig {
    /// Host application root; the cache lives in `text_cache` beneath it
    pub base_dir: Option<PathBuf>,
    /// Host environment, also used as a subfolder of the cache root
    pub environment: Option<Environment>,
    /// Explicit backend; when unset the environment decides
    pub backend: Option<BackendKind>,
    /// Compression of stored blobs
    pub compression: CompressionConfig,
    #[serde(skip)]
    pub source: ConfigSource,
}

impl TextCacheConfig {
    #[must_use]
    pub fn builder() -> TextCacheConfigBuilder {
        TextCacheConfigBuilder::new()
    }

    /// Defaults overridden by `TEXTCACHE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CacheError::io(path, "read configuration file", e))?;
        let mut config: Self = serde_json::from_str(&contents)?;
        config.source = ConfigSource::ConfigFile(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Override fields with any `TEXTCACHE_*` variables that are set
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Override fields from a variable lookup
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut touched = false;

        if let Some(root) = lookup(TEXTCACHE_ROOT_VAR).filter(|v| !v.trim().is_empty()) {
            self.base_dir = Some(PathBuf::from(root));
            touched = true;
        }

        if let Some(env) = lookup(TEXTCACHE_ENV_VAR) {
            let environment = env
                .parse::<Environment>()
                .map_err(|e| textcache_core::Error::environment(TEXTCACHE_ENV_VAR, e.to_string()))?;
            self.environment = Some(environment);
            touched = true;
        }

        if let Some(backend) = lookup(TEXTCACHE_BACKEND_VAR) {
            self.backend = Some(backend.parse()?);
            touched = true;
        }

        if let Some(flag) = lookup(TEXTCACHE_COMPRESSION_VAR) {
            self.compression.enabled = parse_flag(TEXTCACHE_COMPRESSION_VAR, &flag)?;
            touched = true;
        }

        if let Some(level) = lookup(TEXTCACHE_COMPRESSION_LEVEL_VAR) {
            self.compression.level = level.trim().parse().map_err(|_| {
                textcache_core::Error::environment(
                    TEXTCACHE_COMPRESSION_LEVEL_VAR,
                    format!("'{level}' is not a number"),
                )
            })?;
            touched = true;
        }

        if touched {
            self.source = ConfigSource::Environment;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.compression.validate()
    }

    /// Storage root: `base/text_cache/<env>`, `base/text_cache`, or `text_cache`
    #[must_use]
    pub fn resolved_root(&self) -> PathBuf {
        match (&self.base_dir, &self.environment) {
            (Some(base), Some(env)) => base.join(DEFAULT_ROOT_DIR).join(env.as_str()),
            (Some(base), None) => base.join(DEFAULT_ROOT_DIR),
            (None, _) => PathBuf::from(DEFAULT_ROOT_DIR),
        }
    }

    /// The explicit backend, else memory for the test environment and the
    /// filesystem for everything else
    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        match (self.backend, &self.environment) {
            (Some(kind), _) => kind,
            (None, Some(env)) if env.is_test() => BackendKind::Memory,
            (None, _) => BackendKind::FileSystem,
        }
    }
}

fn parse_flag(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(textcache_core::Error::environment(
            variable,
            format!("'{value}' is not a boolean"),
        )
        .into()),
    }
}

/// Builder for creating text cache configurations
#[derive(Debug, Default)]
pub struct TextCacheConfigBuilder {
    config: TextCacheConfig,
}

impl TextCacheConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(base_dir.into());
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.config.environment = Some(environment);
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.compression.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.config.compression.level = level;
        self
    }

    #[must_use]
    pub fn build(mut self) -> TextCacheConfig {
        self.config.source = ConfigSource::Builder;
        self.config
    }
}
