//! Storage abstractions for snapshot persistence.
//!
//! Exactly one live snapshot exists at a time, addressed by a fixed key.
//!
//! ## Layout
//!
//! ```text
//! {root}/
//! ├── config.toml           # Tracker configuration
//! └── snapshots/
//!     └── latest.json       # Last delivered trend set
//! ```

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, Snapshot, StoreBackend};

// Re-export for convenience
pub use local::LocalStorage;

/// Fixed document identity of the live snapshot.
pub const LATEST_KEY: &str = "snapshots/latest.json";

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the live snapshot.
    ///
    /// Returns `Ok(None)` both when nothing was stored yet and when the
    /// stored document is malformed.
    async fn read_latest(&self) -> Result<Option<Snapshot>>;

    /// Replace the live snapshot.
    async fn write_latest(&self, snapshot: &Snapshot) -> Result<()>;

    /// Human-readable location of the live snapshot.
    fn location(&self) -> String;
}

/// Decode a stored snapshot, treating malformed content as absent.
pub(crate) fn decode_snapshot(bytes: &[u8], location: &str) -> Option<Snapshot> {
    match serde_json::from_slice(bytes) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("Ignoring malformed snapshot at {}: {}", location, e);
            None
        }
    }
}

/// Open the backend selected in the configuration.
pub async fn open_store(config: &Config) -> Result<Box<dyn SnapshotStore>> {
    config.store.validate()?;
    match config.store.backend {
        StoreBackend::Local => Ok(Box::new(LocalStorage::new(&config.store.root_dir))),
        #[cfg(feature = "s3")]
        StoreBackend::S3 => Ok(Box::new(s3::S3Storage::from_config(&config.store).await?)),
        #[cfg(not(feature = "s3"))]
        StoreBackend::S3 => Err(crate::error::AppError::config(
            "store.backend = \"s3\" requires building with the `s3` feature",
        )),
    }
}
