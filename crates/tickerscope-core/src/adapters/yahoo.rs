use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::fetcher::{
    FetchFuture, FetchedSeries, FundamentalsFetcher, FundamentalsFuture, MarketDataFetcher,
};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{
    validate_currency_code, CompanyProfile, FetchError, Fundamentals, HistoricalSeries,
    InstrumentMeta, KeyStatistics, Period, PricePoint, Symbol,
};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Error code Yahoo uses for symbols it has no record of.
const UNKNOWN_SYMBOL_CODE: &str = "Not Found";

/// Daily history fetcher backed by Yahoo Finance's public chart endpoint.
#[derive(Clone)]
pub struct YahooFetcher {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooFetcher {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()))
    }
}

impl YahooFetcher {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn chart_url(&self, symbol: &Symbol, period: Period) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d&includePrePost=false&events=div,split",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            period.provider_range()
        )
    }

    /// quoteSummary modules backing [`FundamentalsFetcher::fundamentals`].
    const SUMMARY_MODULES: &'static str =
        "assetProfile,price,summaryDetail,defaultKeyStatistics,financialData";

    pub fn fundamentals_url(&self, symbol: &Symbol) -> String {
        format!(
            "{}/v10/finance/quoteSummary/{}?modules={}",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            Self::SUMMARY_MODULES
        )
    }

    async fn fetch_chart(&self, symbol: &Symbol, period: Period) -> Result<FetchedSeries, FetchError> {
        let url = self.chart_url(symbol, period);
        debug!(%symbol, %period, %url, "requesting yahoo chart");

        let chart = self.get::<YahooChartResponse>(symbol, url).await?.chart;

        let Some(result) = chart.result.and_then(|results| results.into_iter().next()) else {
            debug!(%symbol, %period, "yahoo chart has no result; treating as empty history");
            return Ok(FetchedSeries::default());
        };

        Ok(normalize_chart(symbol, result))
    }

    async fn fetch_fundamentals(&self, symbol: &Symbol) -> Result<Fundamentals, FetchError> {
        let url = self.fundamentals_url(symbol);
        debug!(%symbol, %url, "requesting yahoo quote summary");

        let summary = self
            .get::<YahooQuoteSummaryResponse>(symbol, url)
            .await?
            .quote_summary;
        let result = summary
            .result
            .and_then(|results| results.into_iter().next())
            .unwrap_or_default();

        Fundamentals::new(symbol.clone(), result.profile(), result.statistics()).map_err(|error| {
            warn!(%symbol, %error, "yahoo quote summary failed validation");
            FetchError::transport(format!("invalid yahoo fundamentals: {error}"))
        })
    }

    /// One GET, classified: transport failures, unknown symbols (reported on
    /// any status) and non-2xx statuses become [`FetchError`]s.
    async fn get<T>(&self, symbol: &Symbol, url: String) -> Result<T, FetchError>
    where
        T: DeserializeOwned + YahooEnvelope,
    {
        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(%symbol, timed_out = error.timed_out(), "yahoo transport failure: {}", error.message());
            FetchError::transport(format!("yahoo request failed: {}", error.message()))
        })?;

        let parsed = serde_json::from_str::<T>(&response.body);

        if !response.is_success() {
            if let Ok(envelope) = &parsed {
                if envelope.error().is_some_and(YahooError::is_unknown_symbol) {
                    return Err(FetchError::unknown_symbol(symbol.as_str()));
                }
            }
            warn!(%symbol, status = response.status, "yahoo returned non-success status");
            return Err(FetchError::transport(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        let envelope =
            parsed.map_err(|e| FetchError::transport(format!("malformed yahoo payload: {e}")))?;

        if let Some(error) = envelope.error() {
            if error.is_unknown_symbol() {
                return Err(FetchError::unknown_symbol(symbol.as_str()));
            }
            return Err(FetchError::transport(format!("yahoo error: {}", error.describe())));
        }

        Ok(envelope)
    }
}

impl MarketDataFetcher for YahooFetcher {
    fn fetch<'a>(&'a self, symbol: &'a Symbol, period: Period) -> FetchFuture<'a> {
        Box::pin(self.fetch_chart(symbol, period))
    }
}

impl FundamentalsFetcher for YahooFetcher {
    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> FundamentalsFuture<'a> {
        Box::pin(self.fetch_fundamentals(symbol))
    }
}

/// Map the loosely typed chart result into a validated series, dropping bad rows.
fn normalize_chart(symbol: &Symbol, result: YahooChartResult) -> FetchedSeries {
    let instrument = result
        .meta
        .as_ref()
        .map(YahooChartMeta::instrument)
        .unwrap_or_default();
    let gmt_offset = result.meta.as_ref().and_then(|meta| meta.gmtoffset).unwrap_or(0);

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.and_then(|indicators| indicators.quote.into_iter().next());

    let mut series = HistoricalSeries::with_capacity(timestamps.len());
    let mut dropped_rows = 0_usize;

    for (index, raw_ts) in timestamps.iter().enumerate() {
        let point = quote
            .as_ref()
            .and_then(|quote| row_at(quote, index, raw_ts, gmt_offset));

        match point {
            Some(point) => {
                if let Err(error) = series.try_push(point) {
                    debug!(%symbol, index, %error, "dropping out-of-order row");
                    dropped_rows += 1;
                }
            }
            None => {
                debug!(%symbol, index, "dropping malformed row");
                dropped_rows += 1;
            }
        }
    }

    if dropped_rows > 0 {
        warn!(%symbol, dropped_rows, kept = series.len(), "dropped malformed yahoo rows");
    }

    FetchedSeries {
        series,
        instrument,
        dropped_rows,
    }
}

fn row_at(quote: &YahooChartQuote, index: usize, raw_ts: &Value, gmt_offset: i64) -> Option<PricePoint> {
    let ts = raw_ts.as_i64()?;
    let date = OffsetDateTime::from_unix_timestamp(ts.checked_add(gmt_offset)?)
        .ok()?
        .date();

    let open = price_at(&quote.open, index)?;
    let high = price_at(&quote.high, index)?;
    let low = price_at(&quote.low, index)?;
    let close = price_at(&quote.close, index)?;
    let volume = volume_at(&quote.volume, index)?;

    PricePoint::new(date, open, high, low, close, volume).ok()
}

fn price_at(values: &[Value], index: usize) -> Option<f64> {
    values.get(index)?.as_f64().filter(|value| value.is_finite())
}

/// Missing volume counts as zero; a present but invalid volume rejects the row.
fn volume_at(values: &[Value], index: usize) -> Option<u64> {
    match values.get(index) {
        None | Some(Value::Null) => Some(0),
        Some(value) => value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|volume| volume.is_finite() && *volume >= 0.0)
                .map(|volume| volume.round() as u64)
        }),
    }
}

// Yahoo Finance chart response structures

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

/// Top-level response shapes that carry Yahoo's `{code, description}` error object.
trait YahooEnvelope {
    fn error(&self) -> Option<&YahooError>;
}

impl YahooEnvelope for YahooChartResponse {
    fn error(&self) -> Option<&YahooError> {
        self.chart.error.as_ref()
    }
}

impl YahooEnvelope for YahooQuoteSummaryResponse {
    fn error(&self) -> Option<&YahooError> {
        self.quote_summary.error.as_ref()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooError {
    fn is_unknown_symbol(&self) -> bool {
        self.code.as_deref() == Some(UNKNOWN_SYMBOL_CODE)
    }

    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(code), None) => code.clone(),
            (None, Some(description)) => description.clone(),
            (None, None) => String::from("unspecified error"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<Value>>,
    #[serde(default)]
    indicators: Option<YahooChartIndicators>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooChartMeta {
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    exchange_name: Option<String>,
    #[serde(default)]
    full_exchange_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    gmtoffset: Option<i64>,
    #[serde(default)]
    regular_market_price: Option<Value>,
    #[serde(default)]
    previous_close: Option<Value>,
    #[serde(default)]
    chart_previous_close: Option<Value>,
    #[serde(default)]
    regular_market_day_low: Option<Value>,
    #[serde(default)]
    regular_market_day_high: Option<Value>,
    #[serde(default)]
    fifty_two_week_low: Option<Value>,
    #[serde(default)]
    fifty_two_week_high: Option<Value>,
}

impl YahooChartMeta {
    fn instrument(&self) -> InstrumentMeta {
        let price = |value: &Option<Value>| value.as_ref().and_then(quote_price);

        InstrumentMeta {
            currency: self.currency.as_deref().and_then(validate_currency_code),
            exchange: self
                .full_exchange_name
                .clone()
                .or_else(|| self.exchange_name.clone()),
            name: self.long_name.clone().or_else(|| self.short_name.clone()),
            market_price: price(&self.regular_market_price),
            previous_close: price(&self.previous_close),
            chart_previous_close: price(&self.chart_previous_close),
            day_low: price(&self.regular_market_day_low),
            day_high: price(&self.regular_market_day_high),
            fifty_two_week_low: price(&self.fifty_two_week_low),
            fifty_two_week_high: price(&self.fifty_two_week_high),
        }
    }
}

/// Quoted prices must be finite and non-negative; anything else is treated as absent.
fn quote_price(value: &Value) -> Option<f64> {
    raw_number(value).filter(|price| *price >= 0.0)
}

/// quoteSummary wraps most figures as `{"raw": 1.23, "fmt": "1.23"}`; the chart
/// meta uses bare numbers. Both are accepted.
fn raw_number(value: &Value) -> Option<f64> {
    match value {
        Value::Object(wrapped) => wrapped.get("raw").and_then(Value::as_f64),
        other => other.as_f64(),
    }
    .filter(|number| number.is_finite())
}

fn raw_count(value: &Value) -> Option<u64> {
    raw_number(value)
        .filter(|count| *count >= 0.0)
        .map(|count| count.round() as u64)
}

// Yahoo Finance quoteSummary response structures

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteSummaryResult {
    #[serde(default)]
    asset_profile: YahooModule,
    #[serde(default)]
    price: YahooModule,
    #[serde(default)]
    summary_detail: YahooModule,
    #[serde(default)]
    default_key_statistics: YahooModule,
    #[serde(default)]
    financial_data: YahooModule,
}

impl YahooQuoteSummaryResult {
    fn profile(&self) -> CompanyProfile {
        let asset = &self.asset_profile;
        CompanyProfile {
            name: self.price.text("longName").or_else(|| self.price.text("shortName")),
            sector: asset.text("sector"),
            industry: asset.text("industry"),
            country: asset.text("country"),
            website: asset.text("website"),
            employees: asset.count("fullTimeEmployees"),
            exchange: self.price.text("exchangeName"),
            currency: self.price.text("currency").as_deref().and_then(validate_currency_code),
            summary: asset.text("longBusinessSummary"),
        }
    }

    fn statistics(&self) -> KeyStatistics {
        let detail = &self.summary_detail;
        let key_stats = &self.default_key_statistics;
        let financial = &self.financial_data;

        KeyStatistics {
            current_price: financial
                .number("currentPrice")
                .or_else(|| self.price.number("regularMarketPrice")),
            previous_close: detail.number("previousClose"),
            day_low: detail.number("dayLow"),
            day_high: detail.number("dayHigh"),
            fifty_two_week_low: detail.number("fiftyTwoWeekLow"),
            fifty_two_week_high: detail.number("fiftyTwoWeekHigh"),
            volume: detail.count("volume"),
            average_volume: detail.count("averageVolume"),
            market_cap: self.price.number("marketCap").or_else(|| detail.number("marketCap")),
            enterprise_value: key_stats.number("enterpriseValue"),
            trailing_pe: detail.number("trailingPE"),
            forward_pe: detail.number("forwardPE").or_else(|| key_stats.number("forwardPE")),
            price_to_book: key_stats.number("priceToBook"),
            price_to_sales: detail.number("priceToSalesTrailing12Months"),
            dividend_yield: detail.number("dividendYield"),
            beta: detail.number("beta").or_else(|| key_stats.number("beta")),
            trailing_eps: key_stats.number("trailingEps"),
            total_revenue: financial.number("totalRevenue"),
            profit_margin: financial
                .number("profitMargins")
                .or_else(|| key_stats.number("profitMargins")),
            operating_margin: financial.number("operatingMargins"),
        }
    }
}

/// One quoteSummary module, read field by field so an odd value only loses itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
struct YahooModule(Option<Map<String, Value>>);

impl YahooModule {
    fn field(&self, key: &str) -> Option<&Value> {
        self.0.as_ref()?.get(key)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.field(key).and_then(raw_number)
    }

    fn count(&self, key: &str) -> Option<u64> {
        self.field(key).and_then(raw_count)
    }

    fn text(&self, key: &str) -> Option<String> {
        let text = self.field(key)?.as_str()?.trim();
        (!text.is_empty()).then(|| text.to_owned())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Value>,
    #[serde(default)]
    high: Vec<Value>,
    #[serde(default)]
    low: Vec<Value>,
    #[serde(default)]
    close: Vec<Value>,
    #[serde(default)]
    volume: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use time::macros::date;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn replying(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    #[tokio::test]
    async fn builds_chart_url_from_symbol_and_period_range() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(
            json!({ "chart": { "result": [], "error": null } }).to_string(),
        ))));
        let fetcher = YahooFetcher::new(client.clone())
            .with_base_url("http://mirror.test/")
            .with_timeout_ms(2_500);

        fetcher
            .fetch(&symbol("brk.b"), Period::SixMonths)
            .await
            .expect("empty result is a success");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "http://mirror.test/v8/finance/chart/BRK.B?range=6mo&interval=1d&includePrePost=false&events=div,split"
        );
        assert_eq!(requests[0].timeout_ms, 2_500);
    }

    #[tokio::test]
    async fn shifts_timestamps_into_exchange_local_dates() {
        // 2024-01-02T14:30:00Z is the NYSE open; with a -5h offset it is still Jan 2.
        // 2024-01-03T02:00:00Z would be Jan 3 in UTC but Jan 2 local, so it collides and is dropped.
        let body = json!({
            "chart": {
                "result": [{
                    "meta": { "currency": "usd", "gmtoffset": -18000, "exchangeName": "NMS" },
                    "timestamp": [1704205800, 1704247200],
                    "indicators": { "quote": [{
                        "open": [10.0, 10.0],
                        "high": [11.0, 11.0],
                        "low": [9.0, 9.0],
                        "close": [10.5, 10.5],
                        "volume": [1000, 1000]
                    }]}
                }],
                "error": null
            }
        });
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(body.to_string()))));

        let fetched = YahooFetcher::new(client)
            .fetch(&symbol("AAPL"), Period::OneMonth)
            .await
            .expect("fetch should succeed");

        assert_eq!(fetched.series.len(), 1);
        assert_eq!(fetched.series.points()[0].date, date!(2024 - 01 - 02));
        assert_eq!(fetched.dropped_rows, 1);
        assert_eq!(fetched.instrument.currency.as_deref(), Some("USD"));
        assert_eq!(fetched.instrument.exchange.as_deref(), Some("NMS"));
    }

    #[tokio::test]
    async fn wrongly_typed_cells_drop_only_their_row() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [1704205800, 1704292200, "oops"],
                    "indicators": { "quote": [{
                        "open": [10.0, "ten", 10.0],
                        "high": [11.0, 11.0, 11.0],
                        "low": [9.0, 9.0, 9.0],
                        "close": [10.5, 10.5, 10.5],
                        "volume": [1000, null, 1000]
                    }]}
                }]
            }
        });
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(body.to_string()))));

        let fetched = YahooFetcher::new(client)
            .fetch(&symbol("AAPL"), Period::OneMonth)
            .await
            .expect("fetch should succeed");

        assert_eq!(fetched.series.len(), 1);
        assert_eq!(fetched.dropped_rows, 2);
    }

    #[test]
    fn missing_volume_defaults_to_zero_but_negative_volume_is_rejected() {
        assert_eq!(volume_at(&[], 0), Some(0));
        assert_eq!(volume_at(&[Value::Null], 0), Some(0));
        assert_eq!(volume_at(&[json!(1200)], 0), Some(1200));
        assert_eq!(volume_at(&[json!(1200.4)], 0), Some(1200));
        assert_eq!(volume_at(&[json!(-5)], 0), None);
    }

    #[tokio::test]
    async fn non_not_found_errors_are_transport_failures() {
        let body = json!({
            "chart": { "result": null, "error": { "code": "Internal Server Error", "description": "boom" } }
        });
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::new(500, body.to_string()))));

        let error = YahooFetcher::new(client)
            .fetch(&symbol("AAPL"), Period::OneYear)
            .await
            .expect_err("must fail");

        assert!(matches!(error, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn chart_meta_carries_quote_ranges() {
        let body = json!({
            "chart": {
                "result": [{
                    "meta": {
                        "currency": "USD",
                        "regularMarketPrice": 189.84,
                        "chartPreviousClose": 150.1,
                        "regularMarketDayLow": 188.19,
                        "regularMarketDayHigh": 190.32,
                        "fiftyTwoWeekLow": "n/a",
                        "fiftyTwoWeekHigh": 199.62
                    },
                    "timestamp": [],
                    "indicators": { "quote": [{}] }
                }]
            }
        });
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(body.to_string()))));

        let instrument = YahooFetcher::new(client)
            .fetch(&symbol("AAPL"), Period::OneYear)
            .await
            .expect("fetch should succeed")
            .instrument;

        assert_eq!(instrument.market_price, Some(189.84));
        assert_eq!(instrument.chart_previous_close, Some(150.1));
        assert_eq!(instrument.previous_close, None);
        assert_eq!(instrument.day_range(), Some((188.19, 190.32)));
        assert_eq!(instrument.fifty_two_week_high, Some(199.62));
        assert_eq!(instrument.fifty_two_week_range(), None);
    }

    #[tokio::test]
    async fn fundamentals_map_quote_summary_modules() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "assetProfile": {
                        "sector": "Technology",
                        "industry": "Consumer Electronics",
                        "country": "United States",
                        "website": "https://www.apple.com",
                        "fullTimeEmployees": 161000,
                        "longBusinessSummary": "  Designs phones.  "
                    },
                    "price": {
                        "longName": "Apple Inc.",
                        "exchangeName": "NasdaqGS",
                        "currency": "usd",
                        "marketCap": { "raw": 2.87e12, "fmt": "2.87T" },
                        "regularMarketPrice": { "raw": 185.0 }
                    },
                    "summaryDetail": {
                        "previousClose": { "raw": 184.25 },
                        "trailingPE": { "raw": 29.4 },
                        "forwardPE": {},
                        "dividendYield": { "raw": 0.0052 },
                        "beta": { "raw": 1.29 },
                        "volume": { "raw": 52000000 },
                        "averageVolume": { "raw": 58410000 }
                    },
                    "defaultKeyStatistics": {
                        "forwardPE": { "raw": 27.1 },
                        "enterpriseValue": { "raw": 2.9e12 },
                        "trailingEps": { "raw": 6.42 }
                    },
                    "financialData": {
                        "currentPrice": { "raw": 185.64 },
                        "totalRevenue": { "raw": 3.83e11 },
                        "profitMargins": { "raw": 0.253 },
                        "operatingMargins": null
                    }
                }],
                "error": null
            }
        });
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(body.to_string()))));
        let fetcher = YahooFetcher::new(client.clone()).with_base_url("http://mirror.test");

        let fundamentals = fetcher
            .fundamentals(&symbol("aapl"))
            .await
            .expect("fundamentals should parse");

        assert_eq!(
            client.recorded_requests()[0].url,
            "http://mirror.test/v10/finance/quoteSummary/AAPL?modules=assetProfile,price,summaryDetail,defaultKeyStatistics,financialData"
        );
        let profile = &fundamentals.profile;
        assert_eq!(profile.name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.employees, Some(161_000));
        assert_eq!(profile.currency.as_deref(), Some("USD"));
        assert_eq!(profile.summary.as_deref(), Some("Designs phones."));

        let stats = &fundamentals.statistics;
        assert_eq!(stats.current_price, Some(185.64));
        assert_eq!(stats.market_cap, Some(2.87e12));
        assert_eq!(stats.forward_pe, Some(27.1));
        assert_eq!(stats.dividend_yield, Some(0.0052));
        assert_eq!(stats.average_volume, Some(58_410_000));
        assert_eq!(stats.operating_margin, None);
        assert_eq!(stats.price_to_book, None);
    }

    #[tokio::test]
    async fn fundamentals_for_unknown_symbol_are_classified() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for symbol: ZZZZZZ999" }
            }
        });
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::new(404, body.to_string()))));

        let error = YahooFetcher::new(client)
            .fundamentals(&symbol("ZZZZZZ999"))
            .await
            .expect_err("must fail");

        assert_eq!(error, FetchError::unknown_symbol("ZZZZZZ999"));
    }

    #[tokio::test]
    async fn fundamentals_with_impossible_figures_are_rejected() {
        let body = json!({
            "quoteSummary": {
                "result": [{ "price": { "marketCap": { "raw": -1.0 } } }],
                "error": null
            }
        });
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(body.to_string()))));

        let error = YahooFetcher::new(client)
            .fundamentals(&symbol("AAPL"))
            .await
            .expect_err("must fail");

        assert!(matches!(error, FetchError::Transport { .. }));
    }
}
