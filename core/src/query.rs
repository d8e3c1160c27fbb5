// product_search/src/query.rs

//! Translates a [`SearchRequest`] into the engine's query document.

use serde_json::{json, Value};

use crate::models::SearchRequest;
use crate::ranking::SCORE_SCRIPT;

/// The engine refuses `from + size` beyond this (`index.max_result_window`).
pub const MAX_RESULT_WINDOW: u64 = 10_000;

/// Text fields searched for `q`, name weighted above description.
pub const TEXT_FIELDS: [&str; 4] = ["name.autocomplete^3", "name^2", "description.autocomplete", "description"];

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
  /// Exact match on the `category` keyword.
  Category(String),
  /// Inclusive bounds on `price`. At least one side is set.
  PriceRange { min: Option<f64>, max: Option<f64> },
}

impl Filter {
  fn to_clause(&self) -> Value {
    match self {
      Filter::Category(category) => json!({ "term": { "category": category } }),
      Filter::PriceRange { min, max } => {
        let mut range = serde_json::Map::new();
        if let Some(min) = min {
          range.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = max {
          range.insert("lte".to_string(), json!(max));
        }
        json!({ "range": { "price": range } })
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
  pub text: Option<String>,
  pub filters: Vec<Filter>,
  pub from: u64,
  /// Zero when the requested page lies entirely past the result window.
  pub size: u64,
}

impl ProductQuery {
  pub fn from_request(req: &SearchRequest) -> Self {
    let mut filters = Vec::new();
    if let Some(category) = req.category() {
      filters.push(Filter::Category(category.to_string()));
    }
    if req.min_price.is_some() || req.max_price.is_some() {
      filters.push(Filter::PriceRange {
        min: req.min_price,
        max: req.max_price,
      });
    }

    let (from, size) = clamp_to_window(req.offset(), req.page_size());
    Self {
      text: req.text().map(str::to_string),
      filters,
      from,
      size,
    }
  }

  /// The query only asks for the total match count.
  pub fn is_count_only(&self) -> bool {
    self.size == 0
  }

  /// Relevance and filter part, without the ranking script.
  pub fn match_clause(&self) -> Value {
    let relevance = match &self.text {
      Some(text) => json!({
        "multi_match": {
          "query": text,
          "fields": TEXT_FIELDS,
          "fuzziness": "AUTO",
          "type": "best_fields"
        }
      }),
      None => json!({ "match_all": {} }),
    };

    if self.filters.is_empty() {
      return relevance;
    }
    // Filter context keeps the base relevance of match_all at 1.0.
    let filters: Vec<Value> = self.filters.iter().map(Filter::to_clause).collect();
    json!({
      "bool": {
        "must": [relevance],
        "filter": filters
      }
    })
  }

  /// Full `_search` request body.
  pub fn to_body(&self) -> Value {
    json!({
      "query": {
        "script_score": {
          "query": self.match_clause(),
          "script": { "source": SCORE_SCRIPT }
        }
      },
      "from": self.from,
      "size": self.size,
      "track_total_hits": true,
      "sort": [{ "_score": { "order": "desc" } }]
    })
  }
}

fn clamp_to_window(offset: u64, page_size: u64) -> (u64, u64) {
  if offset >= MAX_RESULT_WINDOW {
    (0, 0)
  } else {
    (offset, page_size.min(MAX_RESULT_WINDOW - offset))
  }
}
