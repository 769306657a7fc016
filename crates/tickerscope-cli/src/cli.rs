//! CLI argument definitions for tickerscope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Fetch a daily history and derive summary metrics |
//! | `fundamentals` | Company profile and key financial statistics |
//! | `periods` | List supported lookback periods |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `text` | Output format (text, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! tickerscope analyze AAPL
//! tickerscope analyze brk.b --period 5y --window 50 --window 200
//! tickerscope analyze MSFT --format json --pretty --csv msft.csv
//! tickerscope fundamentals AAPL
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickerscope_core::config::DEFAULT_CURRENCY;
use tickerscope_core::http_client::DEFAULT_TIMEOUT_MS;
use tickerscope_core::retry::MAX_ATTEMPTS_CAP;
use tickerscope_core::Period;

/// Stock ticker lookup with summary metrics and moving averages.
#[derive(Debug, Parser)]
#[command(
    name = "tickerscope",
    author,
    version,
    about = "Look up a ticker's daily price history and summary metrics"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log debug detail to stderr. `RUST_LOG` takes precedence.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// Full analysis result as JSON.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one ticker over a lookback period.
    ///
    /// # Examples
    ///
    ///   tickerscope analyze AAPL
    ///   tickerscope analyze 7203.T --period 6mo --currency JPY
    Analyze(AnalyzeArgs),

    /// Show company information and key financial statistics.
    Fundamentals(FundamentalsArgs),

    /// List supported lookback periods.
    Periods,
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol (e.g. AAPL, BRK.B, 0700.HK). Case and surrounding whitespace are ignored.
    pub symbol: String,

    /// Lookback period: 1mo, 3mo, 6mo, 1y, 2y or 5y.
    #[arg(long, short, default_value = "1y")]
    pub period: Period,

    /// Moving-average window in trading days. Repeat for several; defaults to 20 and 50.
    #[arg(long = "window", short = 'w')]
    pub windows: Vec<usize>,

    /// Provider request timeout in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Extra attempts after a transport failure.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..MAX_ATTEMPTS_CAP as i64))]
    pub retries: u32,

    /// Also write the price history to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Currency assumed when the provider reports none.
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Override the provider base URL (for mirrors and testing).
    #[arg(long, hide = true)]
    pub base_url: Option<String>,
}

/// Arguments for the `fundamentals` command.
#[derive(Debug, Args)]
pub struct FundamentalsArgs {
    /// Ticker symbol. Case and surrounding whitespace are ignored.
    pub symbol: String,

    /// Provider request timeout in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Override the provider base URL (for mirrors and testing).
    #[arg(long, hide = true)]
    pub base_url: Option<String>,
}
