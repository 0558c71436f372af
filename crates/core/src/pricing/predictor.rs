use crate::domain::product::Product;

use super::projection::{project, DayOffset, ProductProjection};

/// Predicted prices never drop below this share of the listed unit price.
pub const PRICE_FLOOR_RATIO: f64 = 0.6;

const PERISHABLE_KEYWORDS: [&str; 3] = ["dairy", "meat", "seafood"];
const SHELF_STABLE_KEYWORDS: [&str; 2] = ["pantry", "canned"];

pub fn predict_price(product: &Product, day: DayOffset) -> f64 {
    predict_from_projection(product, &project(product, day))
}

pub fn predict_from_projection(product: &Product, projection: &ProductProjection) -> f64 {
    let base_price = product.unit_price;
    // Expired stock is priced as if it had one day left.
    let days_to_expiry = f64::from(projection.days_to_expiry.max(1));
    let mut price = base_price;

    price *= urgency_multiplier(days_to_expiry);

    let stock_pressure = f64::from(projection.stock_quantity)
        / f64::from(projection.original_stock_quantity.max(1));
    if stock_pressure > 0.8 {
        price *= 0.95;
    } else if stock_pressure < 0.3 {
        price *= 1.05;
    }

    if projection.turnover_rate > 0.6 {
        price *= 1.03;
    } else if projection.turnover_rate < 0.2 {
        price *= 0.97;
    }

    let category = product.category.to_lowercase();
    if contains_any(&category, &PERISHABLE_KEYWORDS) {
        if days_to_expiry <= 3.0 {
            price *= 0.9;
        }
    } else if contains_any(&category, &SHELF_STABLE_KEYWORDS) {
        price *= 1.02;
    }

    price.max(base_price * PRICE_FLOOR_RATIO)
}

fn urgency_multiplier(days_to_expiry: f64) -> f64 {
    (1.0 - (7.0 - days_to_expiry) * 0.05).max(0.7)
}

fn contains_any(category: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| category.contains(keyword))
}
