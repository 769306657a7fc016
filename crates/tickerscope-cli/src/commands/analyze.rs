use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tickerscope_core::{
    validate_currency_code, AnalysisPipeline, MarketDataFetcher, PipelineConfig, RetryPolicy,
    RetryingFetcher, TimeoutFetcher, YahooFetcher,
};
use tracing::{info, warn};

use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::error::{CliError, ANALYSIS_ERROR_EXIT};
use crate::{export, output};

pub async fn run(args: &AnalyzeArgs, format: OutputFormat, pretty: bool) -> Result<ExitCode, CliError> {
    let pipeline = AnalysisPipeline::new(build_fetcher(args), build_config(args)?);
    let result = pipeline.run(&args.symbol, args.period).await;

    output::render_analysis(&result, format, pretty)?;

    if let Some(path) = &args.csv {
        if result.series().is_empty() {
            warn!(path = %path.display(), "no price history to export");
        } else {
            let rows = export::write_series_csv(path, result.series())?;
            info!(path = %path.display(), rows, "exported price history");
        }
    }

    if result.status().is_error() {
        return Ok(ExitCode::from(ANALYSIS_ERROR_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}

fn build_config(args: &AnalyzeArgs) -> Result<PipelineConfig, CliError> {
    let currency = validate_currency_code(&args.currency).ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "currency '{}' must be a 3-letter ISO code",
            args.currency
        ))
    })?;

    let mut config = PipelineConfig::default().with_fallback_currency(&currency);
    if !args.windows.is_empty() {
        config = config.with_windows(args.windows.iter().copied());
    }
    Ok(config)
}

/// Yahoo, bounded per attempt by the timeout, wrapped in the retry policy.
fn build_fetcher(args: &AnalyzeArgs) -> Arc<dyn MarketDataFetcher> {
    let mut yahoo = YahooFetcher::default().with_timeout_ms(args.timeout_ms);
    if let Some(base_url) = &args.base_url {
        yahoo = yahoo.with_base_url(base_url.as_str());
    }

    let bounded = TimeoutFetcher::new(Arc::new(yahoo), Duration::from_millis(args.timeout_ms));
    let policy = RetryPolicy::new(args.retries.saturating_add(1));
    Arc::new(RetryingFetcher::new(Arc::new(bounded), policy))
}
