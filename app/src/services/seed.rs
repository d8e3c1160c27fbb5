// product_search_api/src/services/seed.rs

//! Fills the catalog with synthetic products whose ranking signals are
//! correlated the way real catalogs tend to be.

use product_search::{ProductGateway, ProductPayload};
use rand::Rng;
use tracing::{info, instrument, warn};

const ADJECTIVES: [&str; 15] = [
  "Ultra", "Pro", "Gaming", "Smart", "Portable", "Compact", "Premium", "Eco", "Wireless", "Classic", "Advanced", "Budget",
  "Rugged", "Lightweight", "High-End",
];
const NOUNS: [&str; 15] = [
  "Laptop", "Headphones", "Keyboard", "Mouse", "Monitor", "Phone", "Tablet", "Camera", "Speaker", "Router", "Backpack",
  "Chair", "Desk", "Microphone", "Smartwatch",
];
const CATEGORIES: [&str; 5] = ["electronics", "accessories", "office", "audio", "gaming"];

/// Star weights for 1..=5 stars, skewed towards good ratings.
const STAR_WEIGHTS: [f64; 5] = [0.05, 0.10, 0.15, 0.30, 0.40];
const PROMOTED_SHARE: f64 = 0.15;

/// Creates `count` products. Failures are logged and skipped; returns how many were created.
#[instrument(name = "seed::seed_products", skip(gateway))]
pub async fn seed_products(gateway: &ProductGateway, count: usize) -> usize {
  let mut created = 0;
  for i in 0..count {
    // ThreadRng is not Send, so keep it out of scope across the await.
    let payload = random_payload(&mut rand::thread_rng());
    match gateway.create(payload).await {
      Ok(_) => created += 1,
      Err(e) => warn!(error = %e, "Failed to create seed product {}.", i + 1),
    }
  }
  info!("Seed complete. Created {}/{} products.", created, count);
  created
}

pub fn random_payload<R: Rng + ?Sized>(rng: &mut R) -> ProductPayload {
  let name = format!(
    "{} {}",
    ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())],
    NOUNS[rng.gen_range(0..NOUNS.len())]
  );
  let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
  let price = truncate(rng.gen_range(49.99..2499.99), 2);
  let rating = random_rating(rng);
  let review_count = (rating * 50.0) as u64 + rng.gen_range(0..200);
  let sales_count = (rating * 200.0) as u64 + rng.gen_range(0..500);
  // Conversion of 2-5% means 20-50 views per sale.
  let view_count = sales_count * rng.gen_range(20..50);

  ProductPayload {
    description: Some(format!("{} designed for {} use with premium build quality.", name, category)),
    rating,
    review_count,
    sales_count,
    view_count,
    ctr: random_ctr(rng, rating),
    is_promoted: rng.gen_bool(PROMOTED_SHARE),
    margin: random_margin(rng, price),
    ..ProductPayload::new(name, price, category, rng.gen_range(0..200))
  }
}

fn random_rating<R: Rng + ?Sized>(rng: &mut R) -> f64 {
  let roll: f64 = rng.gen();
  let mut cumulative = 0.0;
  for (i, weight) in STAR_WEIGHTS.iter().enumerate() {
    cumulative += weight;
    if roll <= cumulative {
      let rating = (i as f64 + 1.0 + rng.gen_range(0.0..0.9)).min(5.0);
      return truncate(rating, 1);
    }
  }
  4.5
}

fn random_ctr<R: Rng + ?Sized>(rng: &mut R, rating: f64) -> f64 {
  let base = 0.02 + (rating / 5.0) * 0.13;
  let jitter = (rng.gen::<f64>() - 0.5) * 0.03;
  truncate((base + jitter).clamp(0.01, 0.20), 3)
}

fn random_margin<R: Rng + ?Sized>(rng: &mut R, price: f64) -> f64 {
  let base = 0.15 + (price / 2500.0) * 0.20;
  truncate((base + rng.gen_range(0.0..0.10)).min(0.45), 2)
}

fn truncate(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).trunc() / factor
}

#[cfg(test)]
mod tests {
  use super::*;
  use product_search::InMemoryBackend;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use std::sync::Arc;

  #[test]
  fn generated_payloads_are_valid() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
      let payload = random_payload(&mut rng);
      assert!(payload.validate().is_ok(), "invalid payload {:?}", payload);
      assert!(payload.price > 49.0 && payload.price < 2500.0);
      assert!((0.01..=0.20).contains(&payload.ctr));
      assert!(payload.margin <= 0.45);
      assert!(payload.view_count >= payload.sales_count * 20);
    }
  }

  #[test]
  fn truncate_drops_extra_digits() {
    assert_eq!(truncate(4.789, 1), 4.7);
    assert_eq!(truncate(0.12345, 3), 0.123);
  }

  #[actix_web::test]
  async fn seeds_requested_number_of_products() {
    let backend = Arc::new(InMemoryBackend::new());
    let gateway = ProductGateway::new(backend.clone());
    assert_eq!(seed_products(&gateway, 25).await, 25);
    assert_eq!(backend.document_count(), 25);
  }
}
