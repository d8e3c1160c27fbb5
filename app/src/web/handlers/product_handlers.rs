// product_search_api/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use product_search::{ProductPayload, SearchRequest};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

/// Listing tolerates junk pagination values and falls back to the defaults.
#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub page: Option<String>,
  pub page_size: Option<String>,
}

fn lenient_int(raw: Option<&str>) -> Option<i64> {
  raw.and_then(|v| v.trim().parse::<i64>().ok())
}

#[instrument(name = "handler::create_product", skip(app_state, payload), fields(name = %payload.name))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.gateway.create(payload.into_inner()).await?;
  info!(product_id = %product.id, "Product created.");

  Ok(HttpResponse::Created().json(json!({
      "message": "Product created successfully",
      "product": product
  })))
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let page = lenient_int(query_params.page.as_deref());
  let page_size = lenient_int(query_params.page_size.as_deref());

  let result = app_state.gateway.list(page, page_size).await?;
  info!("Listed {} of {} products.", result.products.len(), result.total);

  Ok(HttpResponse::Ok().json(result))
}

#[instrument(name = "handler::search_products", skip(app_state, query_params), fields(q = ?query_params.q))]
pub async fn search_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<SearchRequest>,
) -> Result<HttpResponse, AppError> {
  let result = app_state.gateway.search(&query_params).await?;
  info!("Search matched {} products, returning {}.", result.total, result.products.len());

  Ok(HttpResponse::Ok().json(result))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let product = app_state.gateway.get(&product_id).await?;

  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

#[instrument(name = "handler::update_product", skip(app_state, path, payload), fields(product_id = %path.as_str()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let product = app_state.gateway.update(&product_id, payload.into_inner()).await?;
  info!("Product {} updated.", product_id);

  Ok(HttpResponse::Ok().json(json!({
      "message": "Product updated successfully",
      "product": product
  })))
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  app_state.gateway.delete(&product_id).await?;
  info!("Product {} deleted.", product_id);

  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}

#[cfg(test)]
mod tests {
  use super::lenient_int;

  #[test]
  fn lenient_int_ignores_garbage() {
    assert_eq!(lenient_int(Some("3")), Some(3));
    assert_eq!(lenient_int(Some(" 7 ")), Some(7));
    assert_eq!(lenient_int(Some("two")), None);
    assert_eq!(lenient_int(None), None);
  }
}
