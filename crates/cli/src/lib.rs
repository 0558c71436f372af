pub mod commands;
pub mod loader;
pub mod logging;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::{recommend::RecommendArgs, report::ReportArgs, status::StatusArgs};

#[derive(Debug, Parser)]
#[command(
    name = "shelfwise",
    about = "Shelfwise perishable pricing CLI",
    long_about = "Compute expiry-aware discount recommendations for perishable inventory.",
    after_help = "Examples:\n  shelfwise recommend --product Strawberries --demo\n  shelfwise report --dataset inventory.csv --day 3 --format csv\n  shelfwise status --dataset inventory.csv\n  shelfwise config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Recommend a discount for one product on a given day")]
    Recommend(RecommendArgs),
    #[command(about = "Price every product in the dataset and summarize the result")]
    Report(ReportArgs),
    #[command(about = "Show whether a dataset is loaded and how many products it holds")]
    Status(StatusArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::init_from_environment();

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(args),
        Command::Report(args) => commands::report::run(args),
        Command::Status(args) => commands::status::run(args),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
