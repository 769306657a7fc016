mod analyze;
mod fundamentals;
mod periods;

use std::process::ExitCode;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    match &cli.command {
        Command::Analyze(args) => analyze::run(args, cli.format, cli.pretty).await,
        Command::Fundamentals(args) => fundamentals::run(args, cli.format, cli.pretty).await,
        Command::Periods => periods::run(cli.format, cli.pretty),
    }
}
