// product_search/src/gateway.rs

//! CRUD and search over a [`SearchBackend`], keyed by product id.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::backend::SearchBackend;
use crate::error::{SearchError, SearchResult};
use crate::mapping::index_definition;
use crate::models::{Product, ProductPage, ProductPayload, SearchRequest};
use crate::query::ProductQuery;

/// Owns the long-lived backend handle. Cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct ProductGateway {
  backend: Arc<dyn SearchBackend>,
  deadline: Option<Duration>,
}

impl ProductGateway {
  pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
    Self { backend, deadline: None }
  }

  /// Fails any single backend call that takes longer than `deadline`.
  pub fn with_deadline(mut self, deadline: Duration) -> Self {
    self.deadline = Some(deadline);
    self
  }

  async fn call<T, F>(&self, operation: &'static str, fut: F) -> SearchResult<T>
  where
    F: Future<Output = SearchResult<T>>,
  {
    match self.deadline {
      Some(deadline) => tokio::time::timeout(deadline, fut).await.map_err(|_| {
        warn!(operation, ?deadline, "Search engine call exceeded its deadline.");
        SearchError::Upstream(format!("{} timed out after {:?}", operation, deadline))
      })?,
      None => fut.await,
    }
  }

  /// Creates the product index unless it already exists. Returns whether it was created.
  #[instrument(name = "gateway::ensure_index", skip(self), err(Display))]
  pub async fn ensure_index(&self) -> SearchResult<bool> {
    if self.call("index_exists", self.backend.index_exists()).await? {
      info!("Product index already exists.");
      return Ok(false);
    }
    let definition = index_definition();
    self.call("create_index", self.backend.create_index(&definition)).await?;
    info!("Product index created.");
    Ok(true)
  }

  #[instrument(name = "gateway::create", skip(self, payload), err(Display))]
  pub async fn create(&self, payload: ProductPayload) -> SearchResult<Product> {
    payload.validate()?;
    let now = Utc::now();
    let product = Product::from_payload(Uuid::new_v4().to_string(), payload, now, now);
    self.call("put_document", self.backend.put_document(&product)).await?;
    info!(product_id = %product.id, "Product created.");
    Ok(product)
  }

  #[instrument(name = "gateway::get", skip(self), err(Display))]
  pub async fn get(&self, id: &str) -> SearchResult<Product> {
    self
      .call("get_document", self.backend.get_document(id))
      .await?
      .ok_or_else(|| SearchError::not_found(id))
  }

  /// Replaces an existing product's fields. Never creates one.
  #[instrument(name = "gateway::update", skip(self, payload), err(Display))]
  pub async fn update(&self, id: &str, payload: ProductPayload) -> SearchResult<Product> {
    payload.validate()?;
    let existing = self.get(id).await?;
    let updated_at = next_timestamp(existing.updated_at);
    let product = Product::from_payload(existing.id, payload, existing.created_at, updated_at);
    self.call("put_document", self.backend.put_document(&product)).await?;
    info!(product_id = %product.id, "Product updated.");
    Ok(product)
  }

  #[instrument(name = "gateway::delete", skip(self), err(Display))]
  pub async fn delete(&self, id: &str) -> SearchResult<()> {
    if self.call("delete_document", self.backend.delete_document(id)).await? {
      info!(product_id = %id, "Product deleted.");
      Ok(())
    } else {
      Err(SearchError::not_found(id))
    }
  }

  #[instrument(name = "gateway::search", skip(self, request), fields(q = ?request.text(), page = request.page()), err(Display))]
  pub async fn search(&self, request: &SearchRequest) -> SearchResult<ProductPage> {
    request.validate()?;
    let query = ProductQuery::from_request(request);
    if query.is_count_only() {
      debug!("Requested page lies past the result window, counting matches only.");
    }
    let hits = self.call("search", self.backend.search(&query)).await?;
    debug!(total = hits.total, returned = hits.products.len(), "Search completed.");
    Ok(ProductPage {
      products: hits.products,
      total: hits.total,
      page: request.page(),
      page_size: request.page_size(),
    })
  }

  /// Unfiltered listing, most relevant first.
  pub async fn list(&self, page: Option<i64>, page_size: Option<i64>) -> SearchResult<ProductPage> {
    self.search(&SearchRequest::all(page, page_size)).await
  }
}

/// `now`, or one millisecond past `previous` when the clock has not moved beyond it.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
  let now = Utc::now();
  if now > previous {
    now
  } else {
    previous + chrono::Duration::milliseconds(1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn next_timestamp_advances_past_future_previous() {
    let future = Utc::now() + chrono::Duration::seconds(60);
    assert!(next_timestamp(future) > future);
  }

  #[test]
  fn next_timestamp_uses_clock_when_ahead() {
    let past = Utc::now() - chrono::Duration::seconds(60);
    let next = next_timestamp(past);
    assert!(next > past + chrono::Duration::seconds(59));
  }
}
