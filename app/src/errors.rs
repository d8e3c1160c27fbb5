// product_search_api/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use product_search::SearchError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Search Engine Error: {0}")]
  Upstream(String),

  #[error("Configuration Error: {0}")]
  Config(String),
}

impl From<SearchError> for AppError {
  fn from(err: SearchError) -> Self {
    match err {
      SearchError::Validation(m) => AppError::Validation(m),
      SearchError::NotFound(m) => AppError::NotFound(m),
      SearchError::Upstream(m) => AppError::Upstream(m),
      SearchError::Serialization(e) => AppError::Upstream(format!("Malformed engine payload: {}", e)),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Upstream(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    match self {
      AppError::Validation(_) | AppError::NotFound(_) => tracing::warn!(application_error = %self, "Responding with error"),
      _ => tracing::error!(application_error = %self, "Responding with error"),
    }
    let body = match self {
      AppError::Validation(m) | AppError::NotFound(m) => json!({"error": m}),
      AppError::Upstream(m) => json!({"error": "Search engine request failed", "detail": m}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
    };
    HttpResponse::build(self.status_code()).json(body)
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
