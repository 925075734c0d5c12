//! Object store arguments, mirroring `nvisy-minio`'s CLI-facing config.

use clap::{Args, ValueEnum};
use kbrag_object::{FsConfig, S3Config, StorageConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendKind {
    S3,
    Fs,
}

#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageArgs {
    /// Which object store backend to use.
    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value_t = StorageBackendKind::Fs)]
    pub storage_backend: StorageBackendKind,

    /// S3 bucket name (required when `storage-backend=s3`).
    #[arg(long, env = "STORAGE_S3_BUCKET")]
    pub storage_s3_bucket: Option<String>,

    /// S3 region.
    #[arg(long, env = "STORAGE_S3_REGION", default_value = "us-east-1")]
    pub storage_s3_region: String,

    /// S3-compatible endpoint (set for MinIO or other non-AWS backends).
    #[arg(long, env = "STORAGE_S3_ENDPOINT")]
    pub storage_s3_endpoint: Option<String>,

    /// S3 access key id.
    #[arg(long, env = "STORAGE_S3_ACCESS_KEY_ID")]
    pub storage_s3_access_key_id: Option<String>,

    /// S3 secret access key.
    #[arg(long, env = "STORAGE_S3_SECRET_ACCESS_KEY")]
    pub storage_s3_secret_access_key: Option<String>,

    /// Root directory for the local filesystem backend.
    #[arg(long, env = "STORAGE_FS_ROOT", default_value = "./data/objects")]
    pub storage_fs_root: String,
}

impl StorageArgs {
    pub fn build(&self) -> anyhow::Result<StorageConfig> {
        match self.storage_backend {
            StorageBackendKind::S3 => {
                let bucket = self
                    .storage_s3_bucket
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("--storage-s3-bucket is required for the s3 backend"))?;
                Ok(StorageConfig::S3(S3Config {
                    bucket,
                    region: self.storage_s3_region.clone(),
                    endpoint: self.storage_s3_endpoint.clone(),
                    access_key_id: self.storage_s3_access_key_id.clone(),
                    secret_access_key: self.storage_s3_secret_access_key.clone(),
                }))
            }
            StorageBackendKind::Fs => Ok(StorageConfig::Fs(FsConfig {
                root: self.storage_fs_root.clone(),
            })),
        }
    }
}
