// product_search/src/ranking.rs

//! The seven-factor business ranking applied on top of text relevance.
//!
//! The formula exists twice: as [`final_score`], evaluated in-process, and as
//! [`SCORE_SCRIPT`], the Painless source the engine evaluates per document in a
//! `script_score` query. Both multiply the factors in the same order. They agree
//! up to the f32 precision the index keeps for `rating`, `ctr` and `margin`,
//! which are mapped as `float`.

/// Multiplier applied to products with no stock.
pub const OUT_OF_STOCK_MULTIPLIER: f64 = 0.3;
/// Business boost for promoted products.
pub const PROMOTED_MULTIPLIER: f64 = 1.3;

/// Per-document inputs of the ranking formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingSignals {
  /// Engine text-match score; 1.0 when there is no text query.
  pub relevance: f64,
  pub stock: i64,
  pub rating: f64,
  pub review_count: u64,
  pub sales_count: u64,
  pub view_count: u64,
  pub ctr: f64,
  pub promoted: bool,
  pub margin: f64,
}

impl Default for RankingSignals {
  fn default() -> Self {
    Self {
      relevance: 1.0,
      stock: 0,
      rating: 0.0,
      review_count: 0,
      sales_count: 0,
      view_count: 0,
      ctr: 0.0,
      promoted: false,
      margin: 0.0,
    }
  }
}

/// The individual multiplicative terms for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostFactors {
  pub relevance: f64,
  pub stock: f64,
  pub rating: f64,
  pub reviews: f64,
  pub popularity: f64,
  pub engagement: f64,
  pub business: f64,
}

impl BoostFactors {
  pub fn compute(s: &RankingSignals) -> Self {
    Self {
      relevance: s.relevance,
      stock: stock_multiplier(s.stock),
      rating: rating_boost(s.rating, s.review_count),
      reviews: review_boost(s.review_count),
      popularity: popularity_boost(s.sales_count),
      engagement: engagement_boost(s.ctr, s.view_count),
      business: business_boost(s.promoted, s.margin),
    }
  }

  /// Left-to-right product, matching the evaluation order of the script.
  pub fn product(&self) -> f64 {
    self.relevance * self.stock * self.rating * self.reviews * self.popularity * self.engagement * self.business
  }
}

pub fn final_score(signals: &RankingSignals) -> f64 {
  BoostFactors::compute(signals).product()
}

pub fn stock_multiplier(stock: i64) -> f64 {
  if stock > 0 {
    1.0
  } else {
    OUT_OF_STOCK_MULTIPLIER
  }
}

/// Maps a 0-5 rating onto [0.6, 1.2]. Unreviewed products stay neutral.
pub fn rating_boost(rating: f64, review_count: u64) -> f64 {
  if review_count > 0 {
    0.6 + (rating / 5.0) * 0.6
  } else {
    1.0
  }
}

pub fn review_boost(review_count: u64) -> f64 {
  1.0 + log10_plus_one(review_count) * 0.1
}

pub fn popularity_boost(sales_count: u64) -> f64 {
  1.0 + log10_plus_one(sales_count) * 0.15
}

pub fn engagement_boost(ctr: f64, view_count: u64) -> f64 {
  1.0 + (ctr * 0.2) + (log10_plus_one(view_count) * 0.05)
}

pub fn business_boost(promoted: bool, margin: f64) -> f64 {
  let promotion = if promoted { PROMOTED_MULTIPLIER } else { 1.0 };
  promotion * (1.0 + margin * 0.1)
}

fn log10_plus_one(count: u64) -> f64 {
  (count as f64 + 1.0).log10()
}

/// Painless source for the engine's `script_score`. Reads the same document
/// fields as [`RankingSignals`]; `_score` is the inner query's relevance.
pub const SCORE_SCRIPT: &str = "\
double baseScore = _score;
double stockMultiplier = doc['stock'].value > 0 ? 1.0 : 0.3;
double ratingBoost = doc['review_count'].value > 0 ? 0.6 + (doc['rating'].value / 5.0) * 0.6 : 1.0;
double reviewBoost = 1.0 + Math.log10(doc['review_count'].value + 1) * 0.1;
double popularityBoost = 1.0 + Math.log10(doc['sales_count'].value + 1) * 0.15;
double engagementBoost = 1.0 + (doc['ctr'].value * 0.2) + (Math.log10(doc['view_count'].value + 1) * 0.05);
double businessBoost = (doc['is_promoted'].value ? 1.3 : 1.0) * (1.0 + doc['margin'].value * 0.1);
return baseScore * stockMultiplier * ratingBoost * reviewBoost * popularityBoost * engagementBoost * businessBoost;";
