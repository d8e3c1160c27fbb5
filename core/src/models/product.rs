// product_search/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::ranking::RankingSignals;

/// A product as stored in the engine and returned by the API.
///
/// Field names double as the engine document field names, so the ranking
/// script and the index mapping refer to them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub price: f64,
  pub category: String,
  pub stock: i64,
  #[serde(default)]
  pub rating: f64,
  #[serde(default)]
  pub review_count: u64,
  #[serde(default)]
  pub sales_count: u64,
  #[serde(default)]
  pub view_count: u64,
  #[serde(default)]
  pub ctr: f64,
  #[serde(default)]
  pub is_promoted: bool,
  #[serde(default)]
  pub margin: f64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Builds a stored record from a validated payload.
  pub fn from_payload(id: String, payload: ProductPayload, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
    Self {
      id,
      name: payload.name,
      description: payload.description,
      price: payload.price,
      category: payload.category,
      stock: payload.stock,
      rating: payload.rating,
      review_count: payload.review_count,
      sales_count: payload.sales_count,
      view_count: payload.view_count,
      ctr: payload.ctr,
      is_promoted: payload.is_promoted,
      margin: payload.margin,
      created_at,
      updated_at,
    }
  }

  /// The inputs of the ranking formula for this product at the given text relevance.
  pub fn ranking_signals(&self, relevance: f64) -> RankingSignals {
    RankingSignals {
      relevance,
      stock: self.stock,
      rating: self.rating,
      review_count: self.review_count,
      sales_count: self.sales_count,
      view_count: self.view_count,
      ctr: self.ctr,
      promoted: self.is_promoted,
      margin: self.margin,
    }
  }
}

/// Largest stock the index accepts; `stock` is mapped as a 32-bit `integer`.
pub const MAX_STOCK: i64 = i32::MAX as i64;
/// Largest count the index accepts; the counters are mapped as signed 64-bit `long`.
pub const MAX_COUNT: u64 = i64::MAX as u64;

/// Inbound body for create and update. Identifier and timestamps are server-owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  pub price: f64,
  pub category: String,
  pub stock: i64,
  #[serde(default)]
  pub rating: f64,
  #[serde(default)]
  pub review_count: u64,
  #[serde(default)]
  pub sales_count: u64,
  #[serde(default)]
  pub view_count: u64,
  #[serde(default)]
  pub ctr: f64,
  #[serde(default)]
  pub is_promoted: bool,
  #[serde(default)]
  pub margin: f64,
}

impl ProductPayload {
  /// Minimal payload with neutral ranking signals.
  pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>, stock: i64) -> Self {
    Self {
      name: name.into(),
      description: None,
      price,
      category: category.into(),
      stock,
      rating: 0.0,
      review_count: 0,
      sales_count: 0,
      view_count: 0,
      ctr: 0.0,
      is_promoted: false,
      margin: 0.0,
    }
  }

  pub fn validate(&self) -> SearchResult<()> {
    if self.name.trim().is_empty() {
      return Err(SearchError::Validation("name must not be empty".to_string()));
    }
    if !self.price.is_finite() || self.price <= 0.0 {
      return Err(SearchError::Validation("price must be greater than 0".to_string()));
    }
    if self.category.trim().is_empty() {
      return Err(SearchError::Validation("category must not be empty".to_string()));
    }
    if self.stock < 0 {
      return Err(SearchError::Validation("stock must be 0 or greater".to_string()));
    }
    if self.stock > MAX_STOCK {
      return Err(SearchError::Validation(format!("stock must not exceed {}", MAX_STOCK)));
    }
    for (field, value) in [
      ("review_count", self.review_count),
      ("sales_count", self.sales_count),
      ("view_count", self.view_count),
    ] {
      if value > MAX_COUNT {
        return Err(SearchError::Validation(format!("{} must not exceed {}", field, MAX_COUNT)));
      }
    }
    check_range("rating", self.rating, 0.0, 5.0)?;
    check_range("ctr", self.ctr, 0.0, 1.0)?;
    check_range("margin", self.margin, 0.0, 1.0)?;
    Ok(())
  }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> SearchResult<()> {
  // NaN fails both comparisons, so test for containment rather than exclusion.
  if (min..=max).contains(&value) {
    Ok(())
  } else {
    Err(SearchError::Validation(format!(
      "{} must be between {} and {}, got {}",
      field, min, max, value
    )))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn laptop() -> ProductPayload {
    ProductPayload::new("Laptop", 999.99, "electronics", 10)
  }

  #[test]
  fn accepts_minimal_payload() {
    assert!(laptop().validate().is_ok());
  }

  #[test]
  fn rejects_missing_required_values() {
    let mut p = laptop();
    p.name = "   ".to_string();
    assert!(matches!(p.validate(), Err(SearchError::Validation(m)) if m.contains("name")));

    let mut p = laptop();
    p.price = 0.0;
    assert!(matches!(p.validate(), Err(SearchError::Validation(m)) if m.contains("price")));

    let mut p = laptop();
    p.category = String::new();
    assert!(matches!(p.validate(), Err(SearchError::Validation(m)) if m.contains("category")));

    let mut p = laptop();
    p.stock = -1;
    assert!(matches!(p.validate(), Err(SearchError::Validation(m)) if m.contains("stock")));
  }

  #[test]
  fn stock_of_zero_is_valid() {
    let mut p = laptop();
    p.stock = 0;
    assert!(p.validate().is_ok());
  }

  #[test]
  fn stock_is_bounded_by_integer_mapping() {
    let mut p = laptop();
    p.stock = MAX_STOCK;
    assert!(p.validate().is_ok());

    p.stock = 3_000_000_000;
    assert!(matches!(p.validate(), Err(SearchError::Validation(m)) if m.contains("stock")));
  }

  #[test]
  fn counts_are_bounded_by_long_mapping() {
    let mut p = laptop();
    p.review_count = MAX_COUNT;
    p.sales_count = MAX_COUNT;
    p.view_count = MAX_COUNT;
    assert!(p.validate().is_ok());

    let cases: [(&str, fn(&mut ProductPayload)); 3] = [
      ("review_count", |p| p.review_count = u64::MAX),
      ("sales_count", |p| p.sales_count = MAX_COUNT + 1),
      ("view_count", |p| p.view_count = u64::MAX),
    ];
    for (field, mutate) in cases {
      let mut p = laptop();
      mutate(&mut p);
      match p.validate() {
        Err(SearchError::Validation(m)) => assert!(m.starts_with(field), "unexpected message {}", m),
        other => panic!("expected validation error for {}, got {:?}", field, other),
      }
    }
  }

  #[test]
  fn signal_ranges_accept_boundaries() {
    for (rating, ctr, margin) in [(0.0, 0.0, 0.0), (5.0, 1.0, 1.0)] {
      let mut p = laptop();
      p.rating = rating;
      p.ctr = ctr;
      p.margin = margin;
      assert!(p.validate().is_ok(), "rating={} ctr={} margin={}", rating, ctr, margin);
    }
  }

  #[test]
  fn signal_ranges_reject_just_outside() {
    let cases: [(&str, fn(&mut ProductPayload)); 6] = [
      ("rating", |p| p.rating = -0.01),
      ("rating", |p| p.rating = 5.01),
      ("ctr", |p| p.ctr = -0.001),
      ("ctr", |p| p.ctr = 1.001),
      ("margin", |p| p.margin = -0.001),
      ("margin", |p| p.margin = 1.001),
    ];
    for (field, mutate) in cases {
      let mut p = laptop();
      mutate(&mut p);
      match p.validate() {
        Err(SearchError::Validation(m)) => assert!(m.starts_with(field), "unexpected message {}", m),
        other => panic!("expected validation error for {}, got {:?}", field, other),
      }
    }
  }

  #[test]
  fn nan_signals_are_rejected() {
    let mut p = laptop();
    p.rating = f64::NAN;
    assert!(p.validate().is_err());
  }

  #[test]
  fn payload_defaults_ranking_signals() {
    let p: ProductPayload =
      serde_json::from_str(r#"{"name":"Laptop","price":999.99,"category":"electronics","stock":10}"#).unwrap();
    assert_eq!(p, laptop());
  }

  #[test]
  fn product_serializes_engine_field_names() {
    let now = Utc::now();
    let product = Product::from_payload("abc".to_string(), laptop(), now, now);
    let value = serde_json::to_value(&product).unwrap();
    for field in ["id", "is_promoted", "review_count", "sales_count", "view_count", "ctr", "margin", "created_at"] {
      assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert!(value.get("description").is_none());
  }
}
