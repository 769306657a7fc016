use std::io::{self, Write};

use serde::Serialize;
use serde_json::json;
use tickerscope_core::config::DEFAULT_CURRENCY;
use tickerscope_core::format::{
    display_compact_currency, display_currency, display_fraction, display_number, display_percent,
    display_ratio, NOT_AVAILABLE,
};
use tickerscope_core::{AnalysisResult, AnalysisStatus, Fundamentals, Period};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render_analysis(
    result: &AnalysisResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(result, pretty),
        OutputFormat::Text => write_text(&analysis_text(result)),
    }
}

pub fn render_fundamentals(
    fundamentals: &Fundamentals,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(fundamentals, pretty),
        OutputFormat::Text => write_text(&fundamentals_text(fundamentals)),
    }
}

pub fn render_periods(format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let periods = Period::ALL
                .iter()
                .map(|period| json!({ "code": period.as_str(), "label": period.label() }))
                .collect::<Vec<_>>();
            write_json(&periods, pretty)
        }
        OutputFormat::Text => {
            let text = Period::ALL
                .iter()
                .map(|period| format!("{:<4} {}", period.as_str(), period.label()))
                .collect::<Vec<_>>()
                .join("\n");
            write_text(&text)
        }
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    write_text(&payload)
}

fn write_text(text: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

/// Human-readable summary of one analysis.
pub fn analysis_text(result: &AnalysisResult) -> String {
    let mut lines = vec![heading(result)];

    match result.status() {
        AnalysisStatus::Error { kind, message } => {
            lines.push(format!("error [{kind}]: {message}"));
            return lines.join("\n");
        }
        AnalysisStatus::Empty => {
            lines.push(format!(
                "No price data available for {}.",
                result.period().label().to_lowercase()
            ));
            return lines.join("\n");
        }
        AnalysisStatus::Ok => {}
    }

    let metrics = result.metrics();
    let instrument = result.instrument();
    let currency = result.currency();
    let price = |value: Option<f64>| display_currency(value, currency);

    let mut rows = vec![
        ("Latest close", price(metrics.latest_close)),
        ("Market price", price(instrument.market_price)),
        (
            "Previous close",
            price(instrument.previous_close.or(metrics.previous_close)),
        ),
        (
            "Day change",
            change_text(price(metrics.day_change), display_percent(metrics.day_change_percent)),
        ),
        (
            "Period change",
            change_text(price(metrics.absolute_change), display_percent(metrics.percent_change)),
        ),
        (
            "Close range",
            format!("{} - {}", price(metrics.min_close), price(metrics.max_close)),
        ),
        (
            "Trading range",
            format!("{} - {}", price(metrics.range_low), price(metrics.range_high)),
        ),
        ("Day range", range_text(instrument.day_range(), currency)),
        ("52-week range", range_text(instrument.fifty_two_week_range(), currency)),
        ("Avg volume", display_number(metrics.average_volume)),
    ];

    let averages = metrics
        .moving_averages
        .values()
        .map(|average| (format!("MA{}", average.window), price(average.last())))
        .collect::<Vec<_>>();

    let mut points = result.series().len().to_string();
    if result.dropped_rows() > 0 {
        points.push_str(&format!(" ({} malformed rows skipped)", result.dropped_rows()));
    }

    rows.push(("Data points", points));
    for (label, value) in &rows {
        lines.push(format!("{label:<14} {value}"));
    }
    for (label, value) in &averages {
        lines.push(format!("{label:<14} {value}"));
    }

    lines.join("\n")
}

fn heading(result: &AnalysisResult) -> String {
    let symbol = result
        .symbol()
        .map(|symbol| symbol.as_str())
        .unwrap_or(result.raw_input().trim());

    let mut heading = match result.instrument().name.as_deref() {
        Some(name) => format!("{name} ({symbol})"),
        None => symbol.to_owned(),
    };
    heading.push_str(&format!(" · {}", result.period().label()));
    if let Some(exchange) = &result.instrument().exchange {
        heading.push_str(&format!(" · {exchange}"));
    }
    heading
}

/// Company information followed by key statistics.
pub fn fundamentals_text(fundamentals: &Fundamentals) -> String {
    let profile = &fundamentals.profile;
    let stats = &fundamentals.statistics;
    let currency = profile.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    let price = |value: Option<f64>| display_currency(value, currency);
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| String::from(NOT_AVAILABLE));
    let count = |value: Option<u64>| display_number(value.map(|count| count as f64));

    let symbol = fundamentals.symbol.as_str();
    let mut heading = match &profile.name {
        Some(name) => format!("{name} ({symbol})"),
        None => symbol.to_owned(),
    };
    if let Some(exchange) = &profile.exchange {
        heading.push_str(&format!(" · {exchange}"));
    }

    let company = [
        ("Sector", text(&profile.sector)),
        ("Industry", text(&profile.industry)),
        ("Country", text(&profile.country)),
        ("Website", text(&profile.website)),
        ("Employees", count(profile.employees)),
        ("Currency", text(&profile.currency)),
    ];

    let statistics = [
        ("Current price", price(stats.current_price)),
        ("Previous close", price(stats.previous_close)),
        (
            "Price change",
            change_text(price(stats.price_change()), display_percent(stats.price_change_percent())),
        ),
        ("Day range", range_text(stats.day_low.zip(stats.day_high), currency)),
        (
            "52-week range",
            range_text(stats.fifty_two_week_low.zip(stats.fifty_two_week_high), currency),
        ),
        ("Volume", count(stats.volume)),
        ("Average volume", count(stats.average_volume)),
        ("Market cap", display_compact_currency(stats.market_cap, currency)),
        ("Enterprise value", display_compact_currency(stats.enterprise_value, currency)),
        ("P/E ratio", display_ratio(stats.trailing_pe)),
        ("Forward P/E", display_ratio(stats.forward_pe)),
        ("Price to book", display_ratio(stats.price_to_book)),
        ("Price to sales", display_ratio(stats.price_to_sales)),
        ("Dividend yield", display_fraction(stats.dividend_yield)),
        ("Beta", display_ratio(stats.beta)),
        ("EPS (TTM)", price(stats.trailing_eps)),
        ("Revenue (TTM)", display_compact_currency(stats.total_revenue, currency)),
        ("Profit margin", display_fraction(stats.profit_margin)),
        ("Operating margin", display_fraction(stats.operating_margin)),
    ];

    let mut lines = vec![heading, String::new(), String::from("Company information")];
    lines.extend(company.iter().map(|(label, value)| format!("{label:<17} {value}")));
    lines.push(String::new());
    lines.push(String::from("Key statistics"));
    lines.extend(statistics.iter().map(|(label, value)| format!("{label:<17} {value}")));

    if let Some(summary) = &profile.summary {
        lines.push(String::new());
        lines.push(summary.clone());
    }

    lines.join("\n")
}

fn range_text(range: Option<(f64, f64)>, currency: &str) -> String {
    match range {
        Some((low, high)) => format!(
            "{} - {}",
            display_currency(Some(low), currency),
            display_currency(Some(high), currency)
        ),
        None => String::from(NOT_AVAILABLE),
    }
}

fn change_text(amount: String, percent: String) -> String {
    if percent == NOT_AVAILABLE {
        amount
    } else {
        format!("{amount} ({percent})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tickerscope_core::{
        AnalysisPipeline, CompanyProfile, FetchError, FetchFuture, FetchedSeries, HistoricalSeries,
        InstrumentMeta, KeyStatistics, MarketDataFetcher, PipelineConfig, PricePoint, Symbol,
    };
    use time::macros::date;
    use time::Duration;

    struct FixedFetcher(Result<FetchedSeries, FetchError>);

    impl MarketDataFetcher for FixedFetcher {
        fn fetch<'a>(&'a self, _symbol: &'a Symbol, _period: Period) -> FetchFuture<'a> {
            let outcome = self.0.clone();
            Box::pin(async move { outcome })
        }
    }

    fn series(closes: &[f64]) -> HistoricalSeries {
        let start = date!(2024 - 01 - 02);
        HistoricalSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(index, &close)| {
                    PricePoint::new(
                        start + Duration::days(index as i64),
                        close,
                        close,
                        close,
                        close,
                        2_000_000,
                    )
                    .expect("valid")
                })
                .collect(),
        )
        .expect("ordered")
    }

    async fn analyze(raw: &str, outcome: Result<FetchedSeries, FetchError>) -> AnalysisResult {
        let config = PipelineConfig::default().with_windows([2, 50]);
        AnalysisPipeline::new(Arc::new(FixedFetcher(outcome)), config)
            .run(raw, Period::OneMonth)
            .await
    }

    fn apple(series: HistoricalSeries) -> FetchedSeries {
        FetchedSeries {
            series,
            instrument: InstrumentMeta {
                currency: Some(String::from("USD")),
                exchange: Some(String::from("NasdaqGS")),
                name: Some(String::from("Apple Inc.")),
                market_price: Some(111.0),
                day_low: Some(109.0),
                day_high: Some(112.0),
                ..InstrumentMeta::default()
            },
            dropped_rows: 1,
        }
    }

    #[tokio::test]
    async fn summary_lists_formatted_metrics() {
        let result = analyze(" aapl ", Ok(apple(series(&[100.0, 110.0])))).await;
        let text = analysis_text(&result);

        assert!(text.starts_with("Apple Inc. (AAPL) · 1 Month · NasdaqGS"));
        assert!(text.contains("Latest close   $110.00"));
        assert!(text.contains("Period change  $10.00 (+10.00%)"));
        assert!(text.contains("Avg volume     2.00M"));
        assert!(text.contains("MA2            $105.00"));
        assert!(text.contains("Market price   $111.00"));
        assert!(text.contains("Previous close $100.00"));
        assert!(text.contains("Day range      $109.00 - $112.00"));
        assert!(text.contains("52-week range  N/A"));
        assert!(text.contains("2 (1 malformed rows skipped)"));
        assert!(!text.contains("MA50"));
    }

    #[tokio::test]
    async fn error_status_shows_kind_and_message() {
        let result = analyze("ZZZZZZ999", Err(FetchError::unknown_symbol("ZZZZZZ999"))).await;
        let text = analysis_text(&result);

        assert!(text.starts_with("ZZZZZZ999 · 1 Month"));
        assert!(text.contains("error [UnknownSymbol]"));
        assert!(text.contains("'ZZZZZZ999'"));
    }

    #[tokio::test]
    async fn invalid_input_is_echoed_in_the_heading() {
        let text = analysis_text(&analyze(" a$b ", Ok(FetchedSeries::default())).await);
        assert!(text.starts_with("a$b · 1 Month"));
        assert!(text.contains("error [InvalidFormat]"));
    }

    #[tokio::test]
    async fn empty_status_explains_missing_data() {
        let text = analysis_text(&analyze("AAPL", Ok(apple(HistoricalSeries::empty()))).await);
        assert!(text.contains("No price data available for 1 month."));
        assert!(!text.contains("Latest close"));
    }

    #[test]
    fn fundamentals_list_company_and_statistics() {
        let fundamentals = Fundamentals::new(
            Symbol::parse("AAPL").expect("valid"),
            CompanyProfile {
                name: Some(String::from("Apple Inc.")),
                sector: Some(String::from("Technology")),
                employees: Some(161_000),
                exchange: Some(String::from("NasdaqGS")),
                currency: Some(String::from("USD")),
                summary: Some(String::from("Designs phones.")),
                ..CompanyProfile::default()
            },
            KeyStatistics {
                current_price: Some(185.0),
                previous_close: Some(184.0),
                market_cap: Some(2.87e12),
                trailing_pe: Some(29.4),
                dividend_yield: Some(0.0052),
                total_revenue: Some(3.83e11),
                ..KeyStatistics::default()
            },
        )
        .expect("valid figures");

        let text = fundamentals_text(&fundamentals);

        assert!(text.starts_with("Apple Inc. (AAPL) · NasdaqGS"));
        assert!(text.contains("Sector            Technology"));
        assert!(text.contains("Industry          N/A"));
        assert!(text.contains("Employees         161.00K"));
        assert!(text.contains("Price change      $1.00 (+0.54%)"));
        assert!(text.contains("Market cap        $2.87T"));
        assert!(text.contains("Revenue (TTM)     $383.00B"));
        assert!(text.contains("P/E ratio         29.40"));
        assert!(text.contains("Dividend yield    0.52%"));
        assert!(text.contains("Beta              N/A"));
        assert!(text.ends_with("Designs phones."));
    }
}
