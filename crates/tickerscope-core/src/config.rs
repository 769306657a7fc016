use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOWS: [usize; 2] = [20, 50];
pub const DEFAULT_CURRENCY: &str = "USD";

/// Settings for an [`AnalysisPipeline`](crate::AnalysisPipeline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Moving-average window sizes. Zero is ignored.
    pub windows: BTreeSet<usize>,
    /// Currency assumed when the provider does not report one.
    pub fallback_currency: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS.into_iter().collect(),
            fallback_currency: String::from(DEFAULT_CURRENCY),
        }
    }
}

impl PipelineConfig {
    pub fn with_windows(mut self, windows: impl IntoIterator<Item = usize>) -> Self {
        self.windows = windows.into_iter().filter(|window| *window > 0).collect();
        self
    }

    /// Invalid codes keep the current fallback.
    pub fn with_fallback_currency(mut self, currency: &str) -> Self {
        if let Some(code) = crate::validate_currency_code(currency) {
            self.fallback_currency = code;
        }
        self
    }
}
