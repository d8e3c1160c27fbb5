// product_search/src/backend/mod.rs

//! The contract between the gateway and a search engine.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SearchResult;
use crate::models::Product;
use crate::query::ProductQuery;

pub mod memory;

pub use memory::InMemoryBackend;

/// Matches for one query: the requested window plus the total match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
  pub total: u64,
  pub products: Vec<Product>,
}

/// Document and index operations against a single product index.
///
/// Writes must be visible to a search issued right after they return.
#[async_trait]
pub trait SearchBackend: Send + Sync {
  async fn index_exists(&self) -> SearchResult<bool>;

  /// Creates the index from a `{settings, mappings}` definition.
  async fn create_index(&self, definition: &Value) -> SearchResult<()>;

  /// Indexes (creates or replaces) the document stored under `product.id`.
  async fn put_document(&self, product: &Product) -> SearchResult<()>;

  /// `None` when no document has this id.
  async fn get_document(&self, id: &str) -> SearchResult<Option<Product>>;

  /// Returns `false` when no document had this id.
  async fn delete_document(&self, id: &str) -> SearchResult<bool>;

  async fn search(&self, query: &ProductQuery) -> SearchResult<SearchHits>;
}
