use clap::Args;

use crate::commands::{open_session, CommandResult, SourceArgs};

#[derive(Debug, Clone, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: StatusArgs) -> CommandResult {
    let session = match open_session("status", &args.source) {
        Ok(session) => session,
        Err(failure) => return failure,
    };

    let status = session.store.status();
    let message = if status.has_data {
        format!("{} products loaded", status.product_count)
    } else {
        "no dataset loaded; pass --dataset or --demo".to_string()
    };
    CommandResult::success_with_data("status", message, Some(status))
}
