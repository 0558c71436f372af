use std::process::ExitCode;

fn main() -> ExitCode {
    shelfwise_cli::run()
}
