use std::path::Path;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("video enrichment is enabled but no API key is configured (set enrichment.api_key or YOUTUBE_API_KEY)")]
    MissingApiKey,
    #[error(
        "store.journal_mode {0:?} is not one of {modes}",
        modes = crate::store::JOURNAL_MODES.join(", ")
    )]
    JournalMode(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub journal_mode: String,
    pub cache_size_kib: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub part: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Lower bound on visit time, microseconds since the Unix epoch.
    pub cutoff_micros: i64,
    pub output_path: String,
    pub store: StoreConfig,
    pub enrichment: EnrichmentConfig,
}

impl Config {
    /// Fails before any request is made when enrichment has no credential.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !crate::store::is_known_journal_mode(&self.store.journal_mode) {
            return Err(ConfigError::JournalMode(self.store.journal_mode.clone()));
        }
        if self.enrichment.enabled && self.enrichment.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_hash: String,
}

pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p)?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let mut config: Config = serde_yaml::from_slice(&bytes)?;
    apply_env_api_key(&mut config, std::env::var(API_KEY_ENV).ok());

    let config_hash = hash_bytes(&bytes);

    Ok(LoadedConfig { config, config_hash })
}

fn apply_env_api_key(config: &mut Config, value: Option<String>) {
    if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
        config.enrichment.api_key = key;
    }
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex::encode(digest)
}
