pub mod product;

pub use product::{CatalogError, InMemoryCatalog, Product, ProductCatalog};
