// product_search_api/src/state.rs
use product_search::ProductGateway;
use std::sync::Arc;

/// Shared with every handler. The gateway holds the only long-lived engine handle.
#[derive(Clone)]
pub struct AppState {
  pub gateway: Arc<ProductGateway>,
}
