//! Store factory

use super::memory::InMemoryStore;
use super::traits::PharmacyStore;
use crate::config::StoreConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the document store described by `config`
///
/// A configured `snapshot_path` gives a file-backed store; otherwise the
/// store lives purely in memory.
///
/// # Errors
///
/// Returns an error if the snapshot file exists but cannot be loaded.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn PharmacyStore>> {
    match config.snapshot_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => {
            tracing::info!(snapshot_path = %path, "Opening snapshot-backed store");
            Ok(Arc::new(InMemoryStore::open(path).await?))
        }
        _ => {
            tracing::debug!("Using in-memory store without snapshot");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VendorId;

    #[tokio::test]
    async fn test_create_store_without_snapshot() {
        let store = create_store(&StoreConfig::default()).await.unwrap();
        let vendor = VendorId::new("site-a").unwrap();
        assert!(store.get_vendor(&vendor).await.unwrap().is_none());
        store.persist().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_store_with_missing_snapshot_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig {
            snapshot_path: Some(dir.path().join("new.json").to_string_lossy().to_string()),
            ..Default::default()
        };
        let store = create_store(&config).await.unwrap();
        store.persist().await.unwrap();
        assert!(dir.path().join("new.json").exists());
    }
}
