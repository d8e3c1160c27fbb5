// src/lib.rs

//! product_search: the domain side of an Elasticsearch-backed product catalog.
//!
//! The engine does the heavy lifting (analysis, scoring, storage). This crate
//! owns what is specific to the catalog:
//!  - The product record and search request shapes, with validation.
//!  - The seven-factor business ranking formula, as a pure function and as the
//!    engine script that evaluates it per document.
//!  - Construction of the engine query document, including pagination limits.
//!  - The index mapping with edge n-gram autocomplete analysis.
//!  - A `SearchBackend` seam and a gateway implementing CRUD and search on it.

pub mod backend;
pub mod error;
pub mod gateway;
pub mod mapping;
pub mod models;
pub mod query;
pub mod ranking;

// --- Re-exports for the Public API ---

pub use crate::backend::{InMemoryBackend, SearchBackend, SearchHits};
pub use crate::error::{SearchError, SearchResult};
pub use crate::gateway::ProductGateway;
pub use crate::models::{Product, ProductPage, ProductPayload, SearchRequest};
pub use crate::query::ProductQuery;
pub use crate::ranking::{final_score, BoostFactors, RankingSignals};
