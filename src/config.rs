use crate::{
    app::context::Thresholds,
    cli::ConfigArgs,
    semantic::{DEFAULT_ALIAS_THRESHOLD, DEFAULT_MODEL, DEFAULT_USER_THRESHOLD},
};
use std::{fmt, path::PathBuf};

pub const DEFAULT_DB_PATH: &str = "email_practice.db";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Configuration for semantic search functionality
#[derive(Clone, Debug, PartialEq)]
pub struct SemanticSearchConfig {
    /// Model name for embeddings (e.g., "all-MiniLM-L6-v2"), or "hash"
    pub model: String,

    /// Directory downloaded models are cached in
    pub cache_dir: PathBuf,

    /// Default user similarity threshold [-1.0, 1.0]
    pub user_threshold: f32,

    /// Default alias similarity threshold [-1.0, 1.0]
    pub alias_threshold: f32,
}

impl Default for SemanticSearchConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            user_threshold: DEFAULT_USER_THRESHOLD,
            alias_threshold: DEFAULT_ALIAS_THRESHOLD,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Config {
    /// Shared secret for `/buscar*` routes. `None` locks them entirely.
    pub master_key: Option<String>,
    pub db_path: PathBuf,
    pub listen_addr: String,
    pub semantic_search: SemanticSearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            master_key: None,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            semantic_search: SemanticSearchConfig::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ master_key: {}, db_path: {:?}, listen_addr: {:?}, semantic_search: {:?} }}",
            if self.master_key.is_some() { "[REDACTED]" } else { "None" },
            self.db_path,
            self.listen_addr,
            self.semantic_search
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be between -1.0 and 1.0, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("embedding model name must not be empty")]
    EmptyModel,

    #[error("listen address must not be empty")]
    EmptyListenAddr,
}

impl From<ConfigArgs> for Config {
    fn from(args: ConfigArgs) -> Self {
        Self {
            // an empty secret can never validate, treat it as unset
            master_key: args.master_key.filter(|key| !key.is_empty()),
            db_path: args.db_path,
            listen_addr: args.listen_addr,
            semantic_search: SemanticSearchConfig {
                model: args.model,
                cache_dir: args.cache_dir,
                user_threshold: args.user_threshold,
                alias_threshold: args.alias_threshold,
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sem = &self.semantic_search;
        for (name, value) in [
            ("user threshold", sem.user_threshold),
            ("alias threshold", sem.alias_threshold),
        ] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        if sem.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if self.listen_addr.trim().is_empty() {
            return Err(ConfigError::EmptyListenAddr);
        }

        if self.master_key.is_none() {
            log::warn!("MASTER_KEY is not set, every /buscar request will be rejected");
        }

        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            users: self.semantic_search.user_threshold,
            aliases: self.semantic_search.alias_threshold,
        }
    }
}
