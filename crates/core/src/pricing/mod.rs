pub mod action_table;
pub mod demand;
pub mod discount;
pub mod discretizer;
pub mod explanation;
pub mod predictor;
pub mod projection;

use tracing::{debug, warn};

use crate::dataset::{ActionTableSource, DatasetSource, ProductCatalog};
use crate::domain::product::{Product, Region, Season};
use crate::domain::recommendation::PricingRecommendation;
use crate::errors::RecommendationError;
use crate::reference::ReferenceTables;

use self::{
    action_table::ActionTable,
    demand::estimate_demand,
    discount::{compute_discount, DiscountInput},
    discretizer::discretize,
    explanation::{confidence_score, generate_reasoning, ConfidenceInput, ReasoningInput},
    predictor::predict_from_projection,
    projection::{project, DayOffset},
};

#[derive(Clone, Copy, Debug)]
pub struct RecommendationInput<'a> {
    pub product: &'a Product,
    pub action_table: &'a ActionTable,
    pub day: DayOffset,
}

pub trait PricingEngine: Send + Sync {
    fn recommend(&self, input: RecommendationInput<'_>) -> PricingRecommendation;
}

/// Region and season applied when a product record carries neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricingDefaults {
    pub region: Region,
    pub season: Season,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self { region: Region::West, season: Season::Regular }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DeterministicPricingEngine {
    references: ReferenceTables,
    defaults: PricingDefaults,
}

impl DeterministicPricingEngine {
    pub fn new(references: ReferenceTables, defaults: PricingDefaults) -> Self {
        Self { references, defaults }
    }

    pub fn references(&self) -> &ReferenceTables {
        &self.references
    }

    /// Region stated by the record itself, directly or through its state.
    fn recorded_region(&self, product: &Product) -> Option<Region> {
        product.region.or_else(|| {
            product.state.as_deref().and_then(|state| self.references.region_for_state(state))
        })
    }
}

impl PricingEngine for DeterministicPricingEngine {
    fn recommend(&self, input: RecommendationInput<'_>) -> PricingRecommendation {
        let product = input.product;
        let projection = project(product, input.day);
        let recorded_region = self.recorded_region(product);
        let region = recorded_region.unwrap_or(self.defaults.region);
        let season = product.season.unwrap_or(self.defaults.season);

        let bin = discretize(projection.days_to_expiry, projection.stock_quantity);
        let base_discount_pct = input.action_table.base_discount_pct(bin);
        let discount_percent = compute_discount(
            &DiscountInput {
                base_discount_pct,
                days_to_expiry: projection.days_to_expiry,
                stock_quantity: projection.stock_quantity,
                turnover_rate: projection.turnover_rate,
                sales_volume: projection.sales_volume,
                region,
                season,
            },
            &self.references,
        );

        let predicted_price = predict_from_projection(product, &projection);
        let discounted_price = predicted_price * (1.0 - discount_percent / 100.0);

        let demand = estimate_demand(
            predicted_price,
            discounted_price,
            projection.sales_volume,
            projection.stock_quantity,
            self.references.price_elasticity(&product.category),
        );

        let confidence = confidence_score(&ConfidenceInput {
            sales_volume: projection.sales_volume,
            inventory_turnover_rate: product.inventory_turnover_rate,
            days_to_expiry: projection.days_to_expiry,
            stock_quantity: projection.stock_quantity,
        });

        let reasoning = generate_reasoning(&ReasoningInput {
            discount_percent,
            days_to_expiry: projection.days_to_expiry,
            stock_quantity: projection.stock_quantity,
            turnover_rate: projection.turnover_rate,
            day: input.day.get(),
            region: recorded_region,
            season: product.season,
        });

        debug!(
            event_name = "pricing.recommendation.computed",
            product = %product.name,
            day = input.day.get(),
            days_bin = bin.days,
            stock_bin = bin.stock,
            base_discount_pct,
            discount_percent,
            predicted_price,
            "pricing recommendation computed"
        );

        PricingRecommendation {
            product_name: product.name.clone(),
            predicted_price,
            discount_percent,
            discounted_price,
            estimated_revenue: demand.estimated_revenue,
            waste_reduction: demand.waste_reduction,
            confidence,
            reasoning,
        }
    }
}

/// Resolves products from a dataset source and runs them through a pricing engine.
pub struct RecommendationService<E = DeterministicPricingEngine> {
    engine: E,
}

impl Default for RecommendationService<DeterministicPricingEngine> {
    fn default() -> Self {
        Self::new(DeterministicPricingEngine::default())
    }
}

impl<E: PricingEngine> RecommendationService<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn compute_recommendation<S>(
        &self,
        source: &S,
        product_name: &str,
        day: DayOffset,
    ) -> Result<PricingRecommendation, RecommendationError>
    where
        S: ProductCatalog + ActionTableSource + ?Sized,
    {
        if !source.has_data() {
            return Err(no_data(product_name));
        }

        let Some(product) = source.find_product(product_name) else {
            warn!(
                event_name = "pricing.recommendation.not_found",
                product = product_name,
                "product not found in active dataset"
            );
            return Err(RecommendationError::NotFound {
                product: product_name.to_string(),
                available: source.product_names(),
            });
        };

        let action_table = source.action_table();
        Ok(self.engine.recommend(RecommendationInput {
            product: &product,
            action_table: &action_table,
            day,
        }))
    }

    /// Reads the source's active dataset once, so every lookup in this call
    /// sees the same products and action table.
    pub fn recommend_current<S>(
        &self,
        source: &S,
        product_name: &str,
        day: DayOffset,
    ) -> Result<PricingRecommendation, RecommendationError>
    where
        S: DatasetSource + ?Sized,
    {
        match source.current() {
            Some(dataset) => self.compute_recommendation(dataset.as_ref(), product_name, day),
            None => Err(no_data(product_name)),
        }
    }

    /// One recommendation per product, in dataset order.
    pub fn recommend_all<S>(
        &self,
        source: &S,
        day: DayOffset,
    ) -> Result<Vec<PricingRecommendation>, RecommendationError>
    where
        S: ProductCatalog + ActionTableSource + ?Sized,
    {
        if !source.has_data() {
            return Err(RecommendationError::NoDataAvailable);
        }

        let action_table = source.action_table();
        Ok(source
            .products()
            .iter()
            .map(|product| {
                self.engine.recommend(RecommendationInput {
                    product,
                    action_table: &action_table,
                    day,
                })
            })
            .collect())
    }
}

fn no_data(product_name: &str) -> RecommendationError {
    warn!(
        event_name = "pricing.recommendation.no_data",
        product = product_name,
        "no dataset loaded for recommendation"
    );
    RecommendationError::NoDataAvailable
}
