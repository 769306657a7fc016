use std::process::ExitCode;

use tickerscope_core::{ErrorKind, FundamentalsFetcher, Symbol, YahooFetcher};
use tracing::warn;

use crate::cli::{FundamentalsArgs, OutputFormat};
use crate::error::{CliError, ANALYSIS_ERROR_EXIT};
use crate::output;

pub async fn run(args: &FundamentalsArgs, format: OutputFormat, pretty: bool) -> Result<ExitCode, CliError> {
    let symbol = match Symbol::parse(&args.symbol) {
        Ok(symbol) => symbol,
        Err(error) => return Ok(lookup_failed(ErrorKind::from(&error), &args.symbol)),
    };

    let mut yahoo = YahooFetcher::default().with_timeout_ms(args.timeout_ms);
    if let Some(base_url) = &args.base_url {
        yahoo = yahoo.with_base_url(base_url.as_str());
    }

    match yahoo.fundamentals(&symbol).await {
        Ok(fundamentals) => {
            output::render_fundamentals(&fundamentals, format, pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            warn!(%symbol, %error, "fundamentals lookup failed");
            Ok(lookup_failed(ErrorKind::from(&error), &args.symbol))
        }
    }
}

fn lookup_failed(kind: ErrorKind, input: &str) -> ExitCode {
    eprintln!("error [{kind}]: {}", kind.user_message(input));
    ExitCode::from(ANALYSIS_ERROR_EXIT)
}
