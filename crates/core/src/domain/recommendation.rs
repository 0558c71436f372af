use serde::{Deserialize, Serialize};

/// Result of one recommendation request. Built fresh per call and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRecommendation {
    pub product_name: String,
    pub predicted_price: f64,
    pub discount_percent: f64,
    pub discounted_price: f64,
    pub estimated_revenue: f64,
    pub waste_reduction: f64,
    pub confidence: f64,
    pub reasoning: String,
}
