use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A sellable product, read-only input to order assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub weight_grams: u32,
    pub fragile: bool,
}

impl Product {
    pub fn new(sku: &str, name: &str, weight_grams: u32, fragile: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            sku: sku.to_string(),
            name: name.to_string(),
            weight_grams,
            fragile,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog lookup failed: {0}")]
    LookupFailed(String),
}

/// Read capability over the product record store
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Product>, CatalogError>;

    /// All products, ordered by name
    async fn list(&self) -> Result<Vec<Product>, CatalogError>;
}

/// In-process catalog backed by a plain map, fixed after construction
pub struct InMemoryCatalog {
    products: HashMap<Uuid, Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn get(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}
