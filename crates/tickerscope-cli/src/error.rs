use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// An analysis that completes with an error status is not a `CliError`; it is
/// rendered normally and exits with [`ANALYSIS_ERROR_EXIT`].
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Exit code for a completed analysis whose status is an error.
pub const ANALYSIS_ERROR_EXIT: u8 = 3;

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArgument(_) => 2,
            Self::Serialization(_) => 4,
            Self::Csv(_) => 10,
            Self::Io(_) => 10,
        }
    }
}
