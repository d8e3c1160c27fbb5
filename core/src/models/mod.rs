// product_search/src/models/mod.rs

//! Data structures for product documents and search requests.

pub mod product;
pub mod search;

pub use product::{Product, ProductPayload};
pub use search::{ProductPage, SearchRequest, DEFAULT_PAGE_SIZE};
