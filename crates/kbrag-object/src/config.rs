//! Object store backend configuration, mirroring
//! `nvisy-opendal::config::StorageConfig`.

use opendal::{Operator, services};
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    S3(S3Config),
    /// Local filesystem backend, used for local development and tests.
    Fs(FsConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FsConfig {
    pub root: String,
}

impl StorageConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::S3(_) => "s3",
            Self::Fs(_) => "fs",
        }
    }

    pub(crate) fn build_operator(&self) -> StorageResult<Operator> {
        match self {
            Self::S3(cfg) => {
                let mut builder = services::S3::default()
                    .bucket(&cfg.bucket)
                    .region(&cfg.region);
                if let Some(endpoint) = &cfg.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(key) = &cfg.access_key_id {
                    builder = builder.access_key_id(key);
                }
                if let Some(secret) = &cfg.secret_access_key {
                    builder = builder.secret_access_key(secret);
                }
                Ok(Operator::new(builder)
                    .map_err(StorageError::from)?
                    .finish())
            }
            Self::Fs(cfg) => {
                let builder = services::Fs::default().root(&cfg.root);
                Ok(Operator::new(builder)
                    .map_err(StorageError::from)?
                    .finish())
            }
        }
    }
}
