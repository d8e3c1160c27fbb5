// product_search/src/backend/memory.rs

//! Process-local [`SearchBackend`] that scores documents client-side.
//!
//! Filters and the ranking formula are the ones the engine applies. Text
//! relevance is a simple stand-in for the engine's analyzer: every query token
//! that prefixes a name token scores 3, one that prefixes a description token
//! scores 1. There is no typo tolerance.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use super::{SearchBackend, SearchHits};
use crate::error::{SearchError, SearchResult};
use crate::models::Product;
use crate::query::{Filter, ProductQuery};
use crate::ranking::final_score;

const NAME_WEIGHT: f64 = 3.0;
const DESCRIPTION_WEIGHT: f64 = 1.0;

#[derive(Default)]
struct State {
  definition: Option<Value>,
  documents: BTreeMap<String, Product>,
}

#[derive(Default)]
pub struct InMemoryBackend {
  state: RwLock<State>,
}

impl InMemoryBackend {
  pub fn new() -> Self {
    Self::default()
  }

  /// The definition passed to `create_index`, if any.
  pub fn index_definition(&self) -> Option<Value> {
    self.state.read().definition.clone()
  }

  pub fn document_count(&self) -> usize {
    self.state.read().documents.len()
  }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
  async fn index_exists(&self) -> SearchResult<bool> {
    Ok(self.state.read().definition.is_some())
  }

  async fn create_index(&self, definition: &Value) -> SearchResult<()> {
    let mut state = self.state.write();
    if state.definition.is_some() {
      return Err(SearchError::Upstream("resource_already_exists_exception".to_string()));
    }
    state.definition = Some(definition.clone());
    Ok(())
  }

  async fn put_document(&self, product: &Product) -> SearchResult<()> {
    self.state.write().documents.insert(product.id.clone(), product.clone());
    Ok(())
  }

  async fn get_document(&self, id: &str) -> SearchResult<Option<Product>> {
    Ok(self.state.read().documents.get(id).cloned())
  }

  async fn delete_document(&self, id: &str) -> SearchResult<bool> {
    Ok(self.state.write().documents.remove(id).is_some())
  }

  async fn search(&self, query: &ProductQuery) -> SearchResult<SearchHits> {
    let query_tokens = query.text.as_deref().map(tokenize);
    let state = self.state.read();

    let mut scored: Vec<(f64, &Product)> = state
      .documents
      .values()
      .filter(|p| query.filters.iter().all(|f| passes(f, p)))
      .filter_map(|p| {
        let relevance = match &query_tokens {
          Some(tokens) => text_relevance(tokens, p),
          None => 1.0,
        };
        (relevance > 0.0).then(|| (final_score(&p.ranking_signals(relevance)), p))
      })
      .collect();

    scored.sort_by(|(sa, pa), (sb, pb)| sb.partial_cmp(sa).unwrap_or(Ordering::Equal).then_with(|| pa.id.cmp(&pb.id)));

    let total = scored.len() as u64;
    let products = scored
      .into_iter()
      .skip(query.from as usize)
      .take(query.size as usize)
      .map(|(_, p)| p.clone())
      .collect::<Vec<_>>();
    debug!(total, returned = products.len(), "In-memory search evaluated.");

    Ok(SearchHits { total, products })
  }
}

fn passes(filter: &Filter, product: &Product) -> bool {
  match filter {
    Filter::Category(category) => &product.category == category,
    Filter::PriceRange { min, max } => {
      min.map_or(true, |m| product.price >= m) && max.map_or(true, |m| product.price <= m)
    }
  }
}

fn tokenize(text: &str) -> Vec<String> {
  text
    .to_lowercase()
    .split(|c: char| !c.is_alphanumeric())
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .collect()
}

fn text_relevance(query_tokens: &[String], product: &Product) -> f64 {
  let name_tokens = tokenize(&product.name);
  let description_tokens = product.description.as_deref().map(tokenize).unwrap_or_default();

  query_tokens
    .iter()
    .map(|q| {
      let mut score = 0.0;
      if name_tokens.iter().any(|t| t.starts_with(q.as_str())) {
        score += NAME_WEIGHT;
      }
      if description_tokens.iter().any(|t| t.starts_with(q.as_str())) {
        score += DESCRIPTION_WEIGHT;
      }
      score
    })
    .sum()
}
