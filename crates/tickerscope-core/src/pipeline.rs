//! Request orchestration: validate, fetch, derive.
//!
//! [`AnalysisPipeline::run`] never fails. Validation and provider errors are
//! folded into [`AnalysisStatus::Error`] so every request yields exactly one
//! [`AnalysisResult`].

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::fetcher::MarketDataFetcher;
use crate::metrics::{derive, DerivedMetrics};
use crate::{ErrorKind, HistoricalSeries, InstrumentMeta, Period, Symbol};

/// Lifecycle of one request.
///
/// `Idle -> Validating -> Fetching -> Deriving -> Done`, with `Errored`
/// reachable from `Validating` and `Fetching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Validating,
    Fetching,
    Deriving,
    Done,
    Errored,
}

impl PipelineStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Deriving => "deriving",
            Self::Done => "done",
            Self::Errored => "errored",
        }
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Validating)
                | (Self::Validating, Self::Fetching)
                | (Self::Validating, Self::Errored)
                | (Self::Fetching, Self::Deriving)
                | (Self::Fetching, Self::Errored)
                | (Self::Deriving, Self::Done)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Errored)
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall outcome of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    /// The provider knows the symbol but returned no data for the period.
    Empty,
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl AnalysisStatus {
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Everything the presentation layer needs for one request.
///
/// Built once by [`AnalysisPipeline::run`] and read-only afterwards. Serialize-only:
/// a result cannot be rebuilt from JSON with a status that contradicts its series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    request_id: Uuid,
    symbol: Option<Symbol>,
    raw_input: String,
    period: Period,
    currency: String,
    series: HistoricalSeries,
    metrics: DerivedMetrics,
    instrument: InstrumentMeta,
    dropped_rows: usize,
    status: AnalysisStatus,
}

impl AnalysisResult {
    fn errored(
        request_id: Uuid,
        symbol: Option<Symbol>,
        raw_input: &str,
        period: Period,
        currency: &str,
        kind: ErrorKind,
    ) -> Self {
        Self {
            request_id,
            symbol,
            raw_input: raw_input.to_owned(),
            period,
            currency: currency.to_owned(),
            series: HistoricalSeries::empty(),
            metrics: DerivedMetrics::default(),
            instrument: InstrumentMeta::default(),
            dropped_rows: 0,
            status: AnalysisStatus::Error {
                kind,
                message: kind.user_message(raw_input),
            },
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Normalized symbol; absent when validation failed.
    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    /// The symbol exactly as the caller supplied it.
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Currency to format prices in: the provider's, else the configured fallback.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn series(&self) -> &HistoricalSeries {
        &self.series
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.metrics
    }

    pub fn instrument(&self) -> &InstrumentMeta {
        &self.instrument
    }

    /// Provider rows discarded as malformed.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == AnalysisStatus::Ok
    }

    /// Display name: instrument name when known, else the symbol, else the raw input.
    pub fn display_name(&self) -> &str {
        self.instrument
            .name
            .as_deref()
            .or_else(|| self.symbol.as_ref().map(Symbol::as_str))
            .unwrap_or(self.raw_input.as_str())
    }
}

/// Logs each stage change and refuses transitions the lifecycle does not allow.
#[derive(Debug)]
struct StageTracker {
    current: PipelineStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: PipelineStage::Idle,
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        if !self.current.can_transition_to(next) {
            warn!(from = %self.current, to = %next, "unexpected pipeline stage transition");
        }
        debug!(from = %self.current, to = %next, "pipeline stage");
        self.current = next;
    }
}

/// Runs one analysis per call. Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct AnalysisPipeline {
    fetcher: Arc<dyn MarketDataFetcher>,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(fetcher: Arc<dyn MarketDataFetcher>, config: PipelineConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, raw_symbol: &str, period: Period) -> AnalysisResult {
        let request_id = Uuid::new_v4();
        let span = info_span!("analysis", %request_id, input = raw_symbol, %period);
        self.run_stages(request_id, raw_symbol, period)
            .instrument(span)
            .await
    }

    async fn run_stages(&self, request_id: Uuid, raw_symbol: &str, period: Period) -> AnalysisResult {
        let mut stage = StageTracker::new();
        let fallback_currency = self.config.fallback_currency.as_str();
        info!("analysis started");

        stage.advance(PipelineStage::Validating);
        let symbol = match Symbol::parse(raw_symbol) {
            Ok(symbol) => symbol,
            Err(error) => {
                stage.advance(PipelineStage::Errored);
                let kind = ErrorKind::from(&error);
                info!(%kind, %error, "analysis rejected input");
                return AnalysisResult::errored(
                    request_id,
                    None,
                    raw_symbol,
                    period,
                    fallback_currency,
                    kind,
                );
            }
        };

        stage.advance(PipelineStage::Fetching);
        let fetched = match self.fetcher.fetch(&symbol, period).await {
            Ok(fetched) => fetched,
            Err(error) => {
                stage.advance(PipelineStage::Errored);
                let kind = ErrorKind::from(&error);
                warn!(%symbol, %kind, %error, "analysis fetch failed");
                return AnalysisResult::errored(
                    request_id,
                    Some(symbol),
                    raw_symbol,
                    period,
                    fallback_currency,
                    kind,
                );
            }
        };

        stage.advance(PipelineStage::Deriving);
        let metrics = derive(&fetched.series, &self.config.windows);
        let status = if fetched.series.is_empty() {
            AnalysisStatus::Empty
        } else {
            AnalysisStatus::Ok
        };
        let currency = fetched
            .instrument
            .currency
            .clone()
            .unwrap_or_else(|| fallback_currency.to_owned());

        stage.advance(PipelineStage::Done);
        info!(
            %symbol,
            points = fetched.series.len(),
            dropped_rows = fetched.dropped_rows,
            ?status,
            "analysis finished"
        );

        AnalysisResult {
            request_id,
            symbol: Some(symbol),
            raw_input: raw_symbol.to_owned(),
            period,
            currency,
            series: fetched.series,
            metrics,
            instrument: fetched.instrument,
            dropped_rows: fetched.dropped_rows,
            status,
        }
    }
}
