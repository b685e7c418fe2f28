use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::EvidenceError;
use crate::integrity::{DigestInput, IntegrityVerifier};
use crate::store::JsonlStore;
use crate::upload::UploadPolicy;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
pub const DEFAULT_ALLOWED_TYPES: [&str; 5] = ["image/", "video/", "audio/", "application/pdf", "text/"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub upload: UploadConfig,
    pub integrity: IntegrityConfig,
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub evidence_path: PathBuf,
    pub users_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_size_bytes: u64,
    pub allowed_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityConfig {
    pub digest_input: DigestInput,
    pub offload_threshold_bytes: usize,
}

impl AppConfig {
    /// Built-in defaults only, ignoring files and the environment
    pub fn defaults() -> Result<Self, EvidenceError> {
        let config: AppConfig = Self::default_layer()?.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration: built-in defaults, then `path` (or an optional
    /// `evidence.{toml,yaml,json}` in the working directory), then
    /// `EVIDENCE__SECTION__KEY` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, EvidenceError> {
        let mut builder = Self::default_layer()?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("evidence").required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix("EVIDENCE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("upload.allowed_types")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn default_layer() -> Result<ConfigBuilder<DefaultState>, EvidenceError> {
        let allowed_types: Vec<&str> = DEFAULT_ALLOWED_TYPES.to_vec();

        Ok(Config::builder()
            .set_default("store.evidence_path", "data/evidence.jsonl")?
            .set_default("store.users_path", "data/users.json")?
            .set_default("upload.max_file_size_bytes", DEFAULT_MAX_FILE_SIZE as i64)?
            .set_default("upload.allowed_types", allowed_types)?
            .set_default("integrity.digest_input", "transport")?
            .set_default("integrity.offload_threshold_bytes", 1024 * 1024i64)?
            .set_default("log_filter", "evidence_manager=info")?)
    }

    pub fn validate(&self) -> Result<(), EvidenceError> {
        if self.store.evidence_path.as_os_str().is_empty() {
            return Err(EvidenceError::ConfigError(
                "store.evidence_path cannot be empty".to_string(),
            ));
        }

        if self.store.users_path.as_os_str().is_empty() {
            return Err(EvidenceError::ConfigError(
                "store.users_path cannot be empty".to_string(),
            ));
        }

        if self.upload.max_file_size_bytes == 0 {
            return Err(EvidenceError::ConfigError(
                "upload.max_file_size_bytes must be greater than zero".to_string(),
            ));
        }

        if self.upload.allowed_types.iter().all(|t| t.trim().is_empty()) {
            return Err(EvidenceError::ConfigError(
                "upload.allowed_types must list at least one MIME prefix".to_string(),
            ));
        }

        Ok(())
    }

    pub fn open_store(&self) -> JsonlStore {
        JsonlStore::new(&self.store.evidence_path, &self.store.users_path)
    }

    pub fn verifier(&self) -> IntegrityVerifier {
        IntegrityVerifier::sha256(
            self.integrity.digest_input,
            self.integrity.offload_threshold_bytes,
        )
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::new(
            self.upload.max_file_size_bytes,
            self.upload.allowed_types.clone(),
        )
    }
}
