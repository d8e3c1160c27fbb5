// product_search/src/models/search.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::product::Product;
use crate::error::{SearchError, SearchResult};

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Search parameters as received on the query string.
///
/// Pagination values are kept raw; `page()` and `page_size()` apply the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
  #[serde(default)]
  pub q: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub min_price: Option<f64>,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub max_price: Option<f64>,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub page: Option<i64>,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub page_size: Option<i64>,
}

impl SearchRequest {
  /// An unfiltered listing request.
  pub fn all(page: Option<i64>, page_size: Option<i64>) -> Self {
    Self {
      page,
      page_size,
      ..Self::default()
    }
  }

  pub fn text(&self) -> Option<&str> {
    non_blank(self.q.as_deref())
  }

  pub fn category(&self) -> Option<&str> {
    non_blank(self.category.as_deref())
  }

  /// 1-based page number; anything below 1 becomes 1.
  pub fn page(&self) -> u64 {
    match self.page {
      Some(p) if p >= 1 => p as u64,
      _ => 1,
    }
  }

  /// Anything below 1 falls back to the default page size.
  pub fn page_size(&self) -> u64 {
    match self.page_size {
      Some(s) if s >= 1 => s as u64,
      _ => DEFAULT_PAGE_SIZE,
    }
  }

  pub fn offset(&self) -> u64 {
    (self.page() - 1).saturating_mul(self.page_size())
  }

  pub fn validate(&self) -> SearchResult<()> {
    for (field, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
      if let Some(value) = bound {
        if !value.is_finite() || value < 0.0 {
          return Err(SearchError::Validation(format!(
            "{} must be a non-negative number, got {}",
            field, value
          )));
        }
      }
    }
    if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
      if min > max {
        return Err(SearchError::Validation(format!(
          "min_price ({}) must not exceed max_price ({})",
          min, max
        )));
      }
    }
    Ok(())
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

/// Query-string value that may also arrive as a bare JSON value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue<T> {
  Text(String),
  Value(T),
}

/// An empty or blank query value such as `?min_price=` counts as unset.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: FromStr + Deserialize<'de>,
  T::Err: Display,
{
  match Option::<RawValue<T>>::deserialize(deserializer)? {
    None => Ok(None),
    Some(RawValue::Value(v)) => Ok(Some(v)),
    Some(RawValue::Text(raw)) => {
      let raw = raw.trim();
      if raw.is_empty() {
        return Ok(None);
      }
      raw.parse::<T>().map(Some).map_err(|e| {
        serde::de::Error::custom(format!("invalid value '{}': {}", raw, e))
      })
    }
  }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
  pub products: Vec<Product>,
  /// Total number of matching documents, not the length of this page.
  pub total: u64,
  pub page: u64,
  #[serde(rename = "pageSize")]
  pub page_size: u64,
}
