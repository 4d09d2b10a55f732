// src/services/storage.rs
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use std::env;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 operation failed: {0}")]
    S3Error(String),
}

/// S3 configuration for original-PDF archival, read once at startup.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket_name: String,
}

impl StorageConfig {
    /// Returns None when any of the required AWS settings is absent;
    /// extraction then simply omits filePath.
    pub fn from_env() -> Option<Self> {
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok().filter(|v| !v.is_empty())?;
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY")
            .ok()
            .filter(|v| !v.is_empty())?;
        let bucket_name = env::var("AWS_S3_BUCKET_NAME").ok().filter(|v| !v.is_empty())?;
        let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        Some(Self {
            access_key_id,
            secret_access_key,
            region,
            bucket_name,
        })
    }
}

/// Object-storage collaborator holding the archived original PDFs.
#[derive(Debug)]
pub struct StorageService {
    config: StorageConfig,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    async fn s3_client(&self) -> S3Client {
        let credentials = Credentials::new(
            &self.config.access_key_id,
            &self.config.secret_access_key,
            None,
            None,
            "cvtrack",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        S3Client::new(&aws_config)
    }

    /// Upload the original PDF under original/{uuid}.pdf and return the key.
    /// Independently fallible: the extraction response does not wait on a
    /// rollback if this fails, it only omits filePath.
    pub async fn upload_original_pdf(&self, data: Bytes) -> Result<String, StorageError> {
        let key = format!("original/{}.pdf", Uuid::new_v4());
        let client = self.s3_client().await;

        client
            .put_object()
            .bucket(&self.config.bucket_name)
            .key(&key)
            .content_type("application/pdf")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "S3 upload of original PDF failed");
                StorageError::S3Error(e.to_string())
            })?;

        info!(key = %key, bucket = %self.config.bucket_name, "Original PDF archived to S3");

        Ok(key)
    }
}
