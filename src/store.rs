/*!
 * # Product Collection Storage
 *
 * The collection always moves as a whole: every read loads the entire backing
 * document and every write replaces it. Backends implement [`ProductStore`]
 * so the service layer and the tests can swap the flat file for an in-memory
 * variant without touching endpoint logic.
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::{fs, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::models::Product;

/// Storage backend errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not hold a valid product collection.
    /// Treated as fatal rather than silently discarding data.
    #[error("stored collection is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Whole-collection persistence contract
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns the records as stored; an absent backing file yields an empty collection
    async fn read_all(&self) -> Result<Vec<Product>, StorageError>;

    /// Replaces the stored collection with `products`
    async fn write_all(&self, products: &[Product]) -> Result<(), StorageError>;
}

/// Flat-file backend: one pretty-printed JSON array holding every record
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scratch file in the target directory, so the rename in `write_all`
    /// never crosses a filesystem boundary
    fn scratch_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "products.json".into());
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ProductStore for JsonFileStore {
    async fn read_all(&self) -> Result<Vec<Product>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file absent, returning empty collection");
                return Ok(Vec::new());
            }
            Err(err) => return Err(StorageError::Io(err)),
        };

        let products = serde_json::from_slice(&bytes)?;
        Ok(products)
    }

    async fn write_all(&self, products: &[Product]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(products)?;
        let scratch = self.scratch_path();
        fs::write(&scratch, &bytes).await?;
        if let Err(err) = fs::rename(&scratch, &self.path).await {
            let _ = fs::remove_file(&scratch).await;
            return Err(StorageError::Io(err));
        }

        debug!(
            path = %self.path.display(),
            records = products.len(),
            "collection persisted"
        );
        Ok(())
    }
}

/// Ephemeral backend holding the collection in process memory.
/// Selected by `storage.backend = "memory"` and used throughout the unit tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<Product>, StorageError> {
        Ok(self.records.read().await.clone())
    }

    async fn write_all(&self, products: &[Product]) -> Result<(), StorageError> {
        *self.records.write().await = products.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductInput;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn sample_products() -> Vec<Product> {
        vec![
            Product::create(ProductInput {
                product_name: "Widget".into(),
                quantity: 5,
                price: dec!(2.50),
            })
            .unwrap(),
            Product::create(ProductInput {
                product_name: "Gadget".into(),
                quantity: 3,
                price: dec!(9.99),
            })
            .unwrap(),
        ]
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));

        let records = store.read_all().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));
        let products = sample_products();

        store.write_all(&products).await.unwrap();
        let read_back = store.read_all().await.unwrap();
        assert_eq!(read_back, products);
    }

    #[tokio::test]
    async fn write_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("nested").join("products.json");
        let store = JsonFileStore::new(&nested);

        store.write_all(&sample_products()).await.unwrap();
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn stored_collection_is_a_pretty_printed_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        let store = JsonFileStore::new(&path);

        store.write_all(&sample_products()).await.unwrap();
        let raw = fs::read_to_string(&path).await.unwrap();
        assert!(raw.starts_with("[\n"));
        assert!(raw.contains("\"product_name\": \"Widget\""));
    }

    #[tokio::test]
    async fn no_scratch_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));

        store.write_all(&sample_products()).await.unwrap();
        store.write_all(&[]).await.unwrap();

        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name());
        }
        assert_eq!(names, vec![std::ffi::OsString::from("products.json")]);
    }

    #[tokio::test]
    async fn corrupt_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, b"{ not json").await.unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.read_all().await.unwrap_err();
        assert_matches!(err, StorageError::InvalidJson(_));
    }

    #[tokio::test]
    async fn memory_store_starts_empty_and_replaces_wholesale() {
        let store = MemoryStore::new();
        assert!(store.read_all().await.unwrap().is_empty());

        let products = sample_products();
        store.write_all(&products).await.unwrap();
        assert_eq!(store.read_all().await.unwrap(), products);

        store.write_all(&products[..1]).await.unwrap();
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }
}
