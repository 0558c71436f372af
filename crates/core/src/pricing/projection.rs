use serde::{Deserialize, Serialize};

use crate::domain::product::{turnover_rate, Product};

/// Simulated days elapsed since the dataset snapshot. Day 1 is "today".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayOffset(u32);

impl DayOffset {
    pub const FIRST: DayOffset = DayOffset(1);

    /// Offsets below 1 are clamped to 1 so the engine stays total.
    pub fn new(day: i64) -> Self {
        Self(day.clamp(1, i64::from(u32::MAX)) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn elapsed_days(self) -> u32 {
        self.0 - 1
    }
}

impl Default for DayOffset {
    fn default() -> Self {
        Self::FIRST
    }
}

/// A product aged by a day offset: expiry and stock depleted, turnover recomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductProjection {
    pub day: DayOffset,
    pub days_to_expiry: u32,
    pub stock_quantity: u32,
    pub original_stock_quantity: u32,
    pub sales_volume: u32,
    pub turnover_rate: f64,
}

pub fn daily_sales(sales_volume: u32) -> u32 {
    (sales_volume / 7).max(1)
}

pub fn project(product: &Product, day: DayOffset) -> ProductProjection {
    let elapsed = day.elapsed_days();
    let depleted = u64::from(elapsed) * u64::from(daily_sales(product.sales_volume));
    let stock_quantity = u64::from(product.stock_quantity).saturating_sub(depleted) as u32;

    ProductProjection {
        day,
        days_to_expiry: product.days_to_expiry.saturating_sub(elapsed),
        stock_quantity,
        original_stock_quantity: product.stock_quantity,
        sales_volume: product.sales_volume,
        turnover_rate: turnover_rate(product.sales_volume, stock_quantity),
    }
}
