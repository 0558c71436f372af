use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandEstimate {
    pub demand_multiplier: f64,
    pub estimated_demand: f64,
    /// Demand capped by the stock actually on hand.
    pub actual_sales: f64,
    pub estimated_revenue: f64,
    pub waste_reduction: f64,
}

/// Demand lift from the price cut, scaled by category elasticity. Never below 1.
pub fn demand_multiplier(predicted_price: f64, discounted_price: f64, elasticity: f64) -> f64 {
    if predicted_price <= 0.0 {
        return 1.0;
    }
    let price_change = (predicted_price - discounted_price) / predicted_price;
    (1.0 + price_change * elasticity).max(1.0)
}

pub fn estimate_demand(
    predicted_price: f64,
    discounted_price: f64,
    base_sales_volume: u32,
    stock_on_hand: u32,
    elasticity: f64,
) -> DemandEstimate {
    let base_demand = f64::from(base_sales_volume);
    let demand_multiplier = demand_multiplier(predicted_price, discounted_price, elasticity);
    let estimated_demand = base_demand * demand_multiplier;
    let actual_sales = estimated_demand.min(f64::from(stock_on_hand));

    DemandEstimate {
        demand_multiplier,
        estimated_demand,
        actual_sales,
        estimated_revenue: (actual_sales * discounted_price).max(0.0),
        waste_reduction: (actual_sales - base_demand).max(0.0),
    }
}
