use clap::Args;
use shelfwise_core::errors::ApplicationError;
use shelfwise_core::pricing::projection::DayOffset;
use shelfwise_core::pricing::{DeterministicPricingEngine, RecommendationService};

use crate::commands::{open_session, CommandResult, SourceArgs};

#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Exact product name as it appears in the dataset")]
    pub product: String,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Day offset, 1 = today (defaults to pricing.default_day)"
    )]
    pub day: Option<i64>,
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: RecommendArgs) -> CommandResult {
    let session = match open_session("recommend", &args.source) {
        Ok(session) => session,
        Err(failure) => return failure,
    };

    let day = DayOffset::new(args.day.unwrap_or(i64::from(session.config.pricing.default_day)));
    let service = RecommendationService::new(DeterministicPricingEngine::new(
        session.references,
        session.config.pricing_defaults(),
    ));

    match service.recommend_current(&session.store, &args.product, day) {
        Ok(recommendation) => {
            let message = format!(
                "{}: {}% off, {:.2} -> {:.2}",
                recommendation.product_name,
                recommendation.discount_percent,
                recommendation.predicted_price,
                recommendation.discounted_price
            );
            CommandResult::success_with_data("recommend", message, Some(recommendation))
        }
        Err(error) => {
            CommandResult::from_application_error("recommend", ApplicationError::from(error))
        }
    }
}
