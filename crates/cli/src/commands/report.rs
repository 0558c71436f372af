use clap::{Args, ValueEnum};
use shelfwise_core::errors::{ApplicationError, RecommendationError};
use shelfwise_core::pricing::projection::DayOffset;
use shelfwise_core::pricing::{DeterministicPricingEngine, RecommendationService};
use shelfwise_core::report::{PricingReport, ReportRow};

use crate::commands::{open_session, CommandResult, SourceArgs};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    #[arg(long, allow_negative_numbers = true, help = "Day offset, 1 = today")]
    pub day: Option<i64>,
    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    pub format: ReportFormat,
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: ReportArgs) -> CommandResult {
    let session = match open_session("report", &args.source) {
        Ok(session) => session,
        Err(failure) => return failure,
    };

    let day = DayOffset::new(args.day.unwrap_or(i64::from(session.config.pricing.default_day)));
    let service = RecommendationService::new(DeterministicPricingEngine::new(
        session.references,
        session.config.pricing_defaults(),
    ));

    let Some(dataset) = session.store.snapshot() else {
        return CommandResult::from_application_error(
            "report",
            ApplicationError::from(RecommendationError::NoDataAvailable),
        );
    };
    let recommendations = match service.recommend_all(dataset.as_ref(), day) {
        Ok(recommendations) => recommendations,
        Err(error) => {
            return CommandResult::from_application_error("report", ApplicationError::from(error))
        }
    };
    let report = PricingReport::build(&dataset, day.get(), &recommendations);

    match args.format {
        ReportFormat::Json => {
            let message = format!(
                "day {} report: {} products, {} urgent, average discount {:.1}%",
                report.day,
                report.summary.total_products,
                report.summary.urgent_products,
                report.summary.average_discount
            );
            CommandResult::success_with_data("report", message, Some(report))
        }
        ReportFormat::Csv => match render_csv(&report.rows) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure(
                "report",
                "serialization",
                format!("failed to render CSV report: {error:#}"),
                1,
            ),
        },
    }
}

fn render_csv(rows: &[ReportRow]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|error| anyhow::anyhow!(error.to_string()))?;
    Ok(String::from_utf8(bytes)?.trim_end().to_string())
}
