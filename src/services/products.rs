use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::{
    errors::ServiceError,
    models::{Product, ProductInput},
    store::ProductStore,
};

/// Service for managing the product collection.
///
/// Every mutation rewrites the whole collection through the store, so
/// mutations are serialized behind a lock to keep concurrent
/// read-modify-write cycles from dropping each other's records. Reads
/// do not take the lock.
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    write_lock: Mutex<()>,
}

impl ProductService {
    /// Creates a new product service over the given store
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// List all products, newest first
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        let mut products = self.load().await?;
        products.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        Ok(products)
    }

    /// Create a new product and append it to the collection
    #[instrument(skip(self))]
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut products = self.load().await?;
        let product = Product::create(input)?;
        products.push(product.clone());
        self.save(&products).await?;

        info!(product_id = %product.id, name = %product.product_name, "Product created successfully");

        Ok(product)
    }

    /// Update an existing product in place
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: &str,
        input: ProductInput,
    ) -> Result<Product, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut products = self.load().await?;
        let product = products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or_else(|| {
                warn!(product_id = %id, "Update target does not exist");
                ServiceError::NotFound("Product not found".to_string())
            })?;

        product.apply(input)?;
        let updated = product.clone();
        self.save(&products).await?;

        info!(product_id = %updated.id, "Product updated successfully");

        Ok(updated)
    }

    /// Remove a product from the collection.
    ///
    /// Deleting an id that does not exist still succeeds and still
    /// rewrites the collection.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut products = self.load().await?;
        let before = products.len();
        products.retain(|product| product.id != id);
        let removed = before - products.len();
        self.save(&products).await?;

        info!(product_id = %id, removed, "Product deleted successfully");

        Ok(())
    }

    async fn load(&self) -> Result<Vec<Product>, ServiceError> {
        self.store.read_all().await.map_err(|err| {
            error!(error = %err, "Failed to load product collection");
            ServiceError::from(err)
        })
    }

    async fn save(&self, products: &[Product]) -> Result<(), ServiceError> {
        self.store.write_all(products).await.map_err(|err| {
            error!(error = %err, "Failed to persist product collection");
            ServiceError::from(err)
        })
    }
}
