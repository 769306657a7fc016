use std::process::ExitCode;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

pub fn run(format: OutputFormat, pretty: bool) -> Result<ExitCode, CliError> {
    output::render_periods(format, pretty)?;
    Ok(ExitCode::SUCCESS)
}
