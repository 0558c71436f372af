//! Batch pricing report over a whole dataset.

use std::collections::BTreeSet;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::domain::product::Product;
use crate::domain::recommendation::PricingRecommendation;

/// Products at or below this many days to expiry count as urgent.
pub const URGENT_DAYS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub product_name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub discount_percent: f64,
    pub final_price: Decimal,
    pub expected_revenue: Decimal,
    pub waste_reduction: f64,
    pub days_to_expiry: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub total_products: usize,
    pub urgent_products: usize,
    pub total_stock_value: Decimal,
    pub category_count: usize,
    pub total_expected_revenue: Decimal,
    pub total_waste_reduction: f64,
    pub average_discount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingReport {
    pub day: u32,
    pub rows: Vec<ReportRow>,
    pub summary: DatasetSummary,
}

impl PricingReport {
    /// Pairs each recommendation with its product. Recommendations for names
    /// the dataset does not hold are left out of the rows.
    pub fn build(dataset: &Dataset, day: u32, recommendations: &[PricingRecommendation]) -> Self {
        let rows = recommendations
            .iter()
            .filter_map(|recommendation| {
                let product = dataset.get(&recommendation.product_name)?;
                Some(ReportRow {
                    product_name: recommendation.product_name.clone(),
                    category: product.category.clone(),
                    unit_price: money(product.unit_price),
                    discount_percent: recommendation.discount_percent,
                    final_price: money(recommendation.discounted_price),
                    expected_revenue: money(recommendation.estimated_revenue),
                    waste_reduction: recommendation.waste_reduction,
                    days_to_expiry: product.days_to_expiry,
                })
            })
            .collect::<Vec<_>>();

        let categories =
            dataset.iter().map(|product| product.category.as_str()).collect::<BTreeSet<_>>();
        let total_stock_value = dataset.iter().map(Product::stock_value).sum::<f64>();
        let total_revenue = recommendations.iter().map(|rec| rec.estimated_revenue).sum::<f64>();
        let total_waste_reduction =
            recommendations.iter().map(|rec| rec.waste_reduction).sum::<f64>();
        let average_discount = if recommendations.is_empty() {
            0.0
        } else {
            recommendations.iter().map(|rec| rec.discount_percent).sum::<f64>()
                / recommendations.len() as f64
        };

        let summary = DatasetSummary {
            total_products: dataset.len(),
            urgent_products: dataset
                .iter()
                .filter(|product| product.days_to_expiry <= URGENT_DAYS)
                .count(),
            total_stock_value: money(total_stock_value),
            category_count: categories.len(),
            total_expected_revenue: money(total_revenue),
            total_waste_reduction,
            average_discount,
        };

        Self { day, rows, summary }
    }
}

fn money(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO).round_dp(2)
}
