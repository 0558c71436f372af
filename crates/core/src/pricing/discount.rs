use crate::domain::product::{Region, Season};
use crate::reference::ReferenceTables;

pub const MAX_DISCOUNT_PCT: f64 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscountInput {
    pub base_discount_pct: f64,
    pub days_to_expiry: u32,
    pub stock_quantity: u32,
    pub turnover_rate: f64,
    pub sales_volume: u32,
    pub region: Region,
    pub season: Season,
}

/// Layers the business rules over the base action. Every step runs on every
/// call, in this order; only the branches inside a step are exclusive.
pub fn compute_discount(input: &DiscountInput, references: &ReferenceTables) -> f64 {
    let days = input.days_to_expiry;
    let mut discount = input.base_discount_pct;

    if let Some(floor) = urgency_floor(days) {
        discount = discount.max(floor);
    }

    if input.stock_quantity > 100 && days <= 7 {
        discount += 5.0;
    } else if input.stock_quantity < 10 {
        discount = (discount - 5.0).max(0.0);
    }

    if input.turnover_rate < 0.1 && days <= 5 {
        discount += 5.0;
    } else if input.turnover_rate > 0.8 {
        discount = (discount - 3.0).max(0.0);
    }

    if input.sales_volume < 5 && days <= 3 {
        discount += 3.0;
    }

    discount = discount.max(references.seasonal_floor(input.region, input.season));

    discount.max(0.0).min(MAX_DISCOUNT_PCT)
}

pub fn urgency_floor(days_to_expiry: u32) -> Option<f64> {
    match days_to_expiry {
        0..=1 => Some(25.0),
        2 => Some(20.0),
        3 => Some(15.0),
        4..=5 => Some(10.0),
        _ => None,
    }
}
