// product_search_api/src/services/elastic.rs

//! [`SearchBackend`] over the Elasticsearch REST API.

use async_trait::async_trait;
use product_search::{Product, ProductQuery, SearchBackend, SearchError, SearchHits, SearchResult};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// HTTP client bound to one index. Clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ElasticClient {
  client: Client,
  base_url: Url,
  index: String,
}

impl ElasticClient {
  pub fn new(base_url: &str, index: impl Into<String>, timeout: Duration) -> SearchResult<Self> {
    let base_url = Url::parse(base_url)
      .map_err(|e| SearchError::Upstream(format!("Invalid engine URL '{}': {}", base_url, e)))?;
    if base_url.cannot_be_a_base() {
      return Err(SearchError::Upstream(format!("Engine URL '{}' cannot carry a path", base_url)));
    }

    let client = Client::builder()
      .timeout(timeout)
      .pool_idle_timeout(Duration::from_secs(90))
      .build()
      .map_err(|e| SearchError::Upstream(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url,
      index: index.into(),
    })
  }

  pub fn index(&self) -> &str {
    &self.index
  }

  /// Base URL plus percent-encoded path segments.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
    let url = self.url(segments);
    debug!(%method, %url, "Engine request.");
    self.client.request(method, url)
  }

  async fn send(&self, request: RequestBuilder) -> SearchResult<Response> {
    let response = request
      .send()
      .await
      .map_err(|e| SearchError::Upstream(format!("Engine request failed: {}", e)))?;
    debug!(status = %response.status(), url = %response.url(), "Engine response.");
    Ok(response)
  }

  /// Confirms the engine is reachable. Returns its info document.
  #[instrument(name = "elastic::ping", skip(self), fields(url = %self.base_url), err(Display))]
  pub async fn ping(&self) -> SearchResult<Value> {
    let response = self.send(self.request(Method::GET, &[])).await?;
    let info: Value = read_json(response).await?;
    info!(
      version = %info["version"]["number"].as_str().unwrap_or("unknown"),
      "Connected to search engine."
    );
    Ok(info)
  }
}

#[async_trait]
impl SearchBackend for ElasticClient {
  #[instrument(name = "elastic::index_exists", skip(self), fields(index = %self.index), err(Display))]
  async fn index_exists(&self) -> SearchResult<bool> {
    let response = self.send(self.request(Method::HEAD, &[self.index.as_str()])).await?;
    match response.status() {
      StatusCode::NOT_FOUND => Ok(false),
      s if s.is_success() => Ok(true),
      _ => Err(upstream_error("HEAD index", response).await),
    }
  }

  #[instrument(name = "elastic::create_index", skip(self, definition), fields(index = %self.index), err(Display))]
  async fn create_index(&self, definition: &Value) -> SearchResult<()> {
    let request = self.request(Method::PUT, &[self.index.as_str()]).json(definition);
    let response = self.send(request).await?;
    if !response.status().is_success() {
      return Err(upstream_error("create index", response).await);
    }
    Ok(())
  }

  #[instrument(name = "elastic::put_document", skip(self, product), fields(index = %self.index, id = %product.id), err(Display))]
  async fn put_document(&self, product: &Product) -> SearchResult<()> {
    let request = self
      .request(Method::PUT, &[self.index.as_str(), "_doc", product.id.as_str()])
      .query(&[("refresh", "true")])
      .json(product);
    let response = self.send(request).await?;
    if !response.status().is_success() {
      return Err(upstream_error("index document", response).await);
    }
    Ok(())
  }

  #[instrument(name = "elastic::get_document", skip(self), fields(index = %self.index), err(Display))]
  async fn get_document(&self, id: &str) -> SearchResult<Option<Product>> {
    let response = self.send(self.request(Method::GET, &[self.index.as_str(), "_doc", id])).await?;
    match response.status() {
      StatusCode::NOT_FOUND => Ok(None),
      s if s.is_success() => parse_get_response(read_json(response).await?),
      _ => Err(upstream_error("get document", response).await),
    }
  }

  #[instrument(name = "elastic::delete_document", skip(self), fields(index = %self.index), err(Display))]
  async fn delete_document(&self, id: &str) -> SearchResult<bool> {
    let request = self
      .request(Method::DELETE, &[self.index.as_str(), "_doc", id])
      .query(&[("refresh", "true")]);
    let response = self.send(request).await?;
    match response.status() {
      StatusCode::NOT_FOUND => Ok(false),
      s if s.is_success() => Ok(true),
      _ => Err(upstream_error("delete document", response).await),
    }
  }

  #[instrument(name = "elastic::search", skip(self, query), fields(index = %self.index, from = query.from, size = query.size), err(Display))]
  async fn search(&self, query: &ProductQuery) -> SearchResult<SearchHits> {
    let body = query.to_body();
    debug!(query = %body, "Executing search.");
    let request = self.request(Method::POST, &[self.index.as_str(), "_search"]).json(&body);
    let response = self.send(request).await?;
    if !response.status().is_success() {
      return Err(upstream_error("search", response).await);
    }
    parse_search_response(read_json(response).await?)
  }
}

async fn read_json(response: Response) -> SearchResult<Value> {
  let bytes = response
    .bytes()
    .await
    .map_err(|e| SearchError::Upstream(format!("Failed to read engine response: {}", e)))?;
  Ok(serde_json::from_slice(&bytes)?)
}

async fn upstream_error(operation: &str, response: Response) -> SearchError {
  let status = response.status();
  let body = response
    .text()
    .await
    .unwrap_or_else(|_| "<unreadable body>".to_string());
  SearchError::Upstream(format!("{} returned {}: {}", operation, status, body))
}

#[derive(Deserialize)]
struct GetResponse {
  #[serde(default)]
  found: bool,
  #[serde(rename = "_source")]
  source: Option<Product>,
}

pub(crate) fn parse_get_response(body: Value) -> SearchResult<Option<Product>> {
  let parsed: GetResponse = serde_json::from_value(body)?;
  Ok(if parsed.found { parsed.source } else { None })
}

#[derive(Deserialize)]
struct SearchResponse {
  hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
  total: TotalHits,
  #[serde(default)]
  hits: Vec<Hit>,
}

/// `{"value": n, "relation": ..}`, or a bare number with `rest_total_hits_as_int`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
  Object { value: u64 },
  Count(u64),
}

#[derive(Deserialize)]
struct Hit {
  #[serde(rename = "_id", default)]
  id: Option<String>,
  #[serde(rename = "_source", default)]
  source: Value,
}

pub(crate) fn parse_search_response(body: Value) -> SearchResult<SearchHits> {
  let parsed: SearchResponse = serde_json::from_value(body)?;
  let total = match parsed.hits.total {
    TotalHits::Object { value } | TotalHits::Count(value) => value,
  };

  let products = parsed
    .hits
    .hits
    .into_iter()
    .filter_map(|hit| match serde_json::from_value::<Product>(hit.source) {
      Ok(product) => Some(product),
      Err(e) => {
        warn!(id = ?hit.id, error = %e, "Skipping hit with undecodable source.");
        None
      }
    })
    .collect();

  Ok(SearchHits { total, products })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  pub(super) fn source(id: &str) -> Value {
    json!({
      "id": id,
      "name": "Laptop",
      "price": 999.99,
      "category": "electronics",
      "stock": 10,
      "rating": 4.5,
      "review_count": 3,
      "sales_count": 7,
      "view_count": 100,
      "ctr": 0.05,
      "is_promoted": false,
      "margin": 0.2,
      "created_at": "2024-05-01T10:00:00Z",
      "updated_at": "2024-05-01T10:00:00Z"
    })
  }

  #[test]
  fn parses_search_hits_and_total() {
    let body = json!({
      "took": 3,
      "hits": {
        "total": { "value": 42, "relation": "eq" },
        "max_score": 2.1,
        "hits": [
          { "_index": "products", "_id": "a", "_score": 2.1, "_source": source("a") },
          { "_index": "products", "_id": "b", "_score": 1.4, "_source": source("b") }
        ]
      }
    });
    let hits = parse_search_response(body).unwrap();
    assert_eq!(hits.total, 42);
    let ids: Vec<_> = hits.products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
  }

  #[test]
  fn accepts_integer_total() {
    let body = json!({ "hits": { "total": 7, "hits": [] } });
    assert_eq!(parse_search_response(body).unwrap().total, 7);
  }

  #[test]
  fn skips_undecodable_sources() {
    let body = json!({
      "hits": {
        "total": { "value": 2, "relation": "eq" },
        "hits": [
          { "_id": "broken", "_source": { "name": "no price" } },
          { "_id": "a", "_source": source("a") }
        ]
      }
    });
    let hits = parse_search_response(body).unwrap();
    assert_eq!(hits.total, 2);
    assert_eq!(hits.products.len(), 1);
  }

  #[test]
  fn malformed_search_body_is_serialization_error() {
    let result = parse_search_response(json!({ "error": "boom" }));
    assert!(matches!(result, Err(SearchError::Serialization(_))));
  }

  #[test]
  fn parses_found_and_missing_documents() {
    let found = json!({ "_index": "products", "_id": "a", "found": true, "_source": source("a") });
    assert_eq!(parse_get_response(found).unwrap().map(|p| p.id), Some("a".to_string()));

    let missing = json!({ "_index": "products", "_id": "a", "found": false });
    assert_eq!(parse_get_response(missing).unwrap(), None);
  }

  #[test]
  fn document_paths_are_percent_encoded() {
    let client = ElasticClient::new("http://localhost:9200/", "products", Duration::from_secs(1)).unwrap();
    let url = client.url(&["products", "_doc", "a/b c"]);
    assert_eq!(url.as_str(), "http://localhost:9200/products/_doc/a%2Fb%20c");
  }

  #[test]
  fn rejects_unusable_base_url() {
    assert!(ElasticClient::new("not a url", "products", Duration::from_secs(1)).is_err());
    assert!(ElasticClient::new("mailto:ops@example.com", "products", Duration::from_secs(1)).is_err());
  }
}
