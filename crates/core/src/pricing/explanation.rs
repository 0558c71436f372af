use crate::domain::product::{Region, Season};

pub const MAX_CONFIDENCE: f64 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceInput {
    pub sales_volume: u32,
    pub inventory_turnover_rate: f64,
    pub days_to_expiry: u32,
    pub stock_quantity: u32,
}

/// Data-completeness heuristic in `[0.6, 0.95]`.
pub fn confidence_score(input: &ConfidenceInput) -> f64 {
    let data_quality =
        ((f64::from(input.sales_volume) + input.inventory_turnover_rate) / 100.0).min(1.0);
    let time_confidence = if input.days_to_expiry > 0 { 1.0 } else { 0.7 };
    let stock_confidence = if input.stock_quantity > 0 { 1.0 } else { 0.5 };

    (0.6 + data_quality * 0.2 + time_confidence * 0.1 + stock_confidence * 0.1).min(MAX_CONFIDENCE)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReasoningInput {
    pub discount_percent: f64,
    pub days_to_expiry: u32,
    pub stock_quantity: u32,
    pub turnover_rate: f64,
    pub day: u32,
    pub region: Option<Region>,
    pub season: Option<Season>,
}

pub fn generate_reasoning(input: &ReasoningInput) -> String {
    let mut reasons = Vec::new();

    if input.days_to_expiry <= 1 {
        reasons.push("URGENT: Product expires within 24 hours".to_string());
    } else if input.days_to_expiry <= 3 {
        reasons.push(format!("Product expires in {} days", input.days_to_expiry));
    }

    if input.stock_quantity > 100 {
        reasons.push("High inventory levels detected".to_string());
    } else if input.stock_quantity < 10 {
        reasons.push("Low stock - limited discount applied".to_string());
    }

    if input.turnover_rate < 0.2 {
        reasons.push("Slow-moving product".to_string());
    } else if input.turnover_rate > 0.6 {
        reasons.push("Fast-moving product".to_string());
    }

    if input.day > 1 {
        reasons.push(format!("Day {} simulation - stock and expiry adjusted", input.day));
    }

    if let Some(region) = input.region {
        reasons.push(format!("Regional factor: {region}"));
    }
    if let Some(season) = input.season {
        reasons.push(format!("Seasonal factor: {season}"));
    }

    format!(
        "AI recommends {}% discount based on: {}. This optimizes revenue while minimizing waste.",
        input.discount_percent,
        reasons.join(", ")
    )
}
