// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use async_trait::async_trait;
use product_search::{
  InMemoryBackend, Product, ProductGateway, ProductPayload, ProductQuery, SearchBackend, SearchHits, SearchResult,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// --- Gateway construction ---
pub fn memory_gateway() -> (Arc<InMemoryBackend>, ProductGateway) {
  let backend = Arc::new(InMemoryBackend::new());
  let gateway = ProductGateway::new(backend.clone());
  (backend, gateway)
}

// --- Payload builders ---
pub fn laptop() -> ProductPayload {
  ProductPayload::new("Laptop", 999.99, "electronics", 10)
}

pub fn payload_named(name: &str, category: &str, price: f64) -> ProductPayload {
  let mut p = ProductPayload::new(name, price, category, 5);
  p.description = Some(format!("{} designed for {} use with premium build quality.", name, category));
  p
}

// --- A backend that never answers, for deadline tests ---
pub struct StallingBackend {
  pub delay: Duration,
}

impl StallingBackend {
  async fn stall<T>(&self) -> SearchResult<T> {
    tokio::time::sleep(self.delay).await;
    Err(product_search::SearchError::Upstream("stalled backend finally answered".to_string()))
  }
}

#[async_trait]
impl SearchBackend for StallingBackend {
  async fn index_exists(&self) -> SearchResult<bool> {
    self.stall().await
  }
  async fn create_index(&self, _definition: &Value) -> SearchResult<()> {
    self.stall().await
  }
  async fn put_document(&self, _product: &Product) -> SearchResult<()> {
    self.stall().await
  }
  async fn get_document(&self, _id: &str) -> SearchResult<Option<Product>> {
    self.stall().await
  }
  async fn delete_document(&self, _id: &str) -> SearchResult<bool> {
    self.stall().await
  }
  async fn search(&self, _query: &ProductQuery) -> SearchResult<SearchHits> {
    self.stall().await
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
