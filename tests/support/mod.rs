//! Shared doubles and fixtures for behaviour tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tickerscope_core::{HttpClient, HttpError, HttpRequest, HttpResponse, YahooFetcher};

/// 2024-01-02 14:30 UTC, the NYSE open.
pub const FIRST_SESSION_TS: i64 = 1_704_205_800;
pub const NEW_YORK_GMT_OFFSET: i64 = -18_000;

/// Serves scripted responses in order and records every request.
///
/// When the script runs out, the last response is repeated.
pub struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    last: Mutex<Option<Result<HttpResponse, HttpError>>>,
    delay: Duration,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl ScriptedHttpClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying_json(status: u16, body: Value) -> Self {
        Self::new(vec![Ok(HttpResponse::new(status, body.to_string()))])
    }

    pub fn replying_raw(status: u16, body: &str) -> Self {
        Self::new(vec![Ok(HttpResponse::new(status, body))])
    }

    pub fn failing(error: HttpError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Wait this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("url log").clone()
    }

    fn next_response(&self) -> Result<HttpResponse, HttpError> {
        let mut last = self.last.lock().expect("last response");
        if let Some(next) = self.responses.lock().expect("script").pop_front() {
            *last = Some(next);
        }
        last.clone()
            .unwrap_or_else(|| Err(HttpError::new("no scripted response")))
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().expect("url log").push(request.url.clone());
        let response = self.next_response();
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            response
        })
    }
}

pub fn yahoo_over(client: Arc<ScriptedHttpClient>) -> YahooFetcher {
    YahooFetcher::new(client).with_base_url("http://yahoo.test")
}

/// Close on trading day `index` of the generated fixture.
pub fn fixture_close(index: usize) -> f64 {
    100.0 + index as f64 * 0.5 + if index % 2 == 0 { 0.0 } else { 0.75 }
}

/// A well-formed chart payload with `points` consecutive daily sessions.
pub fn chart_body(points: usize) -> Value {
    let timestamps = (0..points)
        .map(|index| FIRST_SESSION_TS + index as i64 * 86_400)
        .collect::<Vec<_>>();
    let closes = (0..points).map(fixture_close).collect::<Vec<_>>();
    let opens = closes.iter().map(|close| close - 0.25).collect::<Vec<_>>();
    let highs = closes.iter().map(|close| close + 1.0).collect::<Vec<_>>();
    let lows = closes.iter().map(|close| close - 1.0).collect::<Vec<_>>();
    let volumes = (0..points)
        .map(|index| 1_000_000 + index as u64 * 1_000)
        .collect::<Vec<_>>();

    chart_with_quote(
        timestamps,
        json!({
            "open": opens,
            "high": highs,
            "low": lows,
            "close": closes,
            "volume": volumes,
        }),
    )
}

pub fn chart_with_quote(timestamps: Vec<i64>, quote: Value) -> Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "exchangeName": "NMS",
                    "fullExchangeName": "NasdaqGS",
                    "longName": "Apple Inc.",
                    "gmtoffset": NEW_YORK_GMT_OFFSET,
                    "regularMarketPrice": 189.84,
                    "chartPreviousClose": 99.5,
                    "regularMarketDayLow": 188.19,
                    "regularMarketDayHigh": 190.32,
                    "fiftyTwoWeekLow": 164.08,
                    "fiftyTwoWeekHigh": 199.62,
                },
                "timestamp": timestamps,
                "indicators": { "quote": [quote] }
            }],
            "error": null
        }
    })
}

/// A symbol with no trading data in the requested range.
pub fn empty_chart_body() -> Value {
    json!({
        "chart": {
            "result": [{
                "meta": { "currency": "USD", "gmtoffset": NEW_YORK_GMT_OFFSET },
                "indicators": { "quote": [{}] }
            }],
            "error": null
        }
    })
}

/// What Yahoo answers (with HTTP 404) for a symbol it does not know.
pub fn not_found_body() -> Value {
    json!({
        "chart": {
            "result": null,
            "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }
        }
    })
}

/// A quoteSummary payload with the modules the fundamentals lookup reads.
pub fn quote_summary_body() -> Value {
    json!({
        "quoteSummary": {
            "result": [{
                "assetProfile": {
                    "sector": "Technology",
                    "industry": "Consumer Electronics",
                    "country": "United States",
                    "fullTimeEmployees": 161000
                },
                "price": {
                    "longName": "Apple Inc.",
                    "exchangeName": "NasdaqGS",
                    "currency": "USD",
                    "marketCap": { "raw": 2.87e12, "fmt": "2.87T" }
                },
                "summaryDetail": {
                    "previousClose": { "raw": 184.25 },
                    "trailingPE": { "raw": 29.4 },
                    "dividendYield": { "raw": 0.0052 }
                },
                "financialData": {
                    "currentPrice": { "raw": 185.64 }
                }
            }],
            "error": null
        }
    })
}

/// quoteSummary's answer (with HTTP 404) for a symbol it does not know.
pub fn quote_summary_not_found_body() -> Value {
    json!({
        "quoteSummary": {
            "result": null,
            "error": {
                "code": "Not Found",
                "description": "Quote not found for symbol: ZZZZZZ999"
            }
        }
    })
}
