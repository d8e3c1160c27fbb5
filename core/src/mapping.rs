// product_search/src/mapping.rs

//! Index settings and field mapping for the product index.

use serde_json::{json, Value};

pub const AUTOCOMPLETE_MIN_GRAM: u32 = 3;
pub const AUTOCOMPLETE_MAX_GRAM: u32 = 15;

/// Body for index creation: analysis settings plus field mapping.
///
/// `autocomplete` indexes lower-cased edge n-grams so prefixes match at query
/// time, while queries themselves go through the `standard` analyzer.
pub fn index_definition() -> Value {
  json!({
    "settings": {
      "analysis": {
        "filter": {
          "autocomplete_filter": {
            "type": "edge_ngram",
            "min_gram": AUTOCOMPLETE_MIN_GRAM,
            "max_gram": AUTOCOMPLETE_MAX_GRAM
          }
        },
        "analyzer": {
          "autocomplete": {
            "type": "custom",
            "tokenizer": "standard",
            "filter": ["lowercase", "autocomplete_filter"]
          }
        }
      }
    },
    "mappings": {
      "properties": {
        "id": { "type": "keyword" },
        "name": {
          "type": "text",
          "fields": {
            "keyword": { "type": "keyword" },
            "autocomplete": autocomplete_subfield()
          }
        },
        "description": {
          "type": "text",
          "fields": {
            "autocomplete": autocomplete_subfield()
          }
        },
        "price": { "type": "float" },
        "category": { "type": "keyword" },
        "stock": { "type": "integer" },
        "rating": { "type": "float" },
        "review_count": { "type": "long" },
        "sales_count": { "type": "long" },
        "view_count": { "type": "long" },
        "ctr": { "type": "float" },
        "is_promoted": { "type": "boolean" },
        "margin": { "type": "float" },
        "created_at": { "type": "date" },
        "updated_at": { "type": "date" }
      }
    }
  })
}

fn autocomplete_subfield() -> Value {
  json!({
    "type": "text",
    "analyzer": "autocomplete",
    "search_analyzer": "standard"
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ranking::SCORE_SCRIPT;

  #[test]
  fn edge_ngram_filter_bounds() {
    let def = index_definition();
    let filter = &def["settings"]["analysis"]["filter"]["autocomplete_filter"];
    assert_eq!(filter["type"], "edge_ngram");
    assert_eq!(filter["min_gram"], 3);
    assert_eq!(filter["max_gram"], 15);
    assert_eq!(
      def["settings"]["analysis"]["analyzer"]["autocomplete"]["filter"],
      json!(["lowercase", "autocomplete_filter"])
    );
  }

  #[test]
  fn text_fields_carry_autocomplete_subfields() {
    let props = &index_definition()["mappings"]["properties"];
    assert_eq!(props["name"]["fields"]["autocomplete"]["analyzer"], "autocomplete");
    assert_eq!(props["description"]["fields"]["autocomplete"]["analyzer"], "autocomplete");
    assert_eq!(props["category"]["type"], "keyword");
  }

  #[test]
  fn every_script_field_is_mapped() {
    let props = &index_definition()["mappings"]["properties"];
    for field in ["stock", "rating", "review_count", "sales_count", "view_count", "ctr", "is_promoted", "margin"] {
      assert!(SCORE_SCRIPT.contains(field));
      assert!(props[field]["type"].is_string(), "{} has no mapping", field);
    }
  }
}
