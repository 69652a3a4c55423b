//! AWS S3 storage implementation.
//!
//! The live snapshot is stored at `{bucket}/{prefix}/snapshots/latest.json`.
//! Credentials are read from the credential file named in the configuration.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};
use crate::models::{Snapshot, StoreConfig};
use crate::storage::{LATEST_KEY, SnapshotStore, decode_snapshot};

/// S3-based snapshot storage.
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create S3 storage from the store configuration.
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| AppError::config("store.bucket is required for the s3 backend"))?;
        let credentials_path = config.credentials_path.as_ref().ok_or_else(|| {
            AppError::config("store.credentials_path is required for the s3 backend")
        })?;

        if !credentials_path.exists() {
            return Err(AppError::config(format!(
                "Credential file not found: {}",
                credentials_path.display()
            )));
        }

        let profile_files = ProfileFiles::builder()
            .include_default_config_file(true)
            .with_file(ProfileFileKind::Credentials, credentials_path)
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_files(profile_files)
            .load()
            .await;

        Ok(Self::new(Client::new(&sdk_config), bucket, &config.prefix))
    }

    fn key(&self) -> String {
        object_key(&self.prefix)
    }
}

/// Snapshot key under `prefix`, ignoring surrounding slashes.
fn object_key(prefix: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        LATEST_KEY.to_string()
    } else {
        format!("{}/{}", prefix, LATEST_KEY)
    }
}

#[async_trait]
impl SnapshotStore for S3Storage {
    async fn read_latest(&self) -> Result<Option<Snapshot>> {
        let key = self.key();
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::storage(e.to_string()))?;
                Ok(decode_snapshot(&bytes.into_bytes(), &self.location()))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    log::info!("No snapshot at {}", self.location());
                    Ok(None)
                } else {
                    Err(AppError::storage(service_err.to_string()))
                }
            }
        }
    }

    async fn write_latest(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.key())
            .body(ByteStream::from(json))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| AppError::storage(format!("{}: {e}", self.location())))?;

        log::info!(
            "Snapshot of {} trends written to {}",
            snapshot.trend_names.len(),
            self.location()
        );
        Ok(())
    }

    fn location(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key())
    }
}
