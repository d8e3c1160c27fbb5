// product_search_api/src/services/mod.rs

//! Integrations the web layer builds on: the search engine client and catalog seeding.

pub mod elastic;
pub mod seed;

pub use elastic::ElasticClient;
