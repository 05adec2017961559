//! Domain error types.

/// Top-level error type for gbce.
#[derive(Debug, thiserror::Error)]
pub enum GbceError {
    #[error("unknown stock: {symbol}")]
    UnknownStock { symbol: String },

    #[error("stock {symbol} is already registered")]
    DuplicateStock { symbol: String },

    #[error("invalid stock {symbol}: {reason}")]
    InvalidStock { symbol: String, reason: String },

    #[error("invalid trade for {symbol}: {field} must be positive, got {value}")]
    InvalidTrade {
        symbol: String,
        field: &'static str,
        value: i64,
    },

    #[error("invalid time interval {value:?}: {reason}")]
    InvalidInterval { value: String, reason: String },

    #[error("no trades in the last {window_seconds} seconds")]
    NoTradesInWindow { window_seconds: f64 },

    #[error("metric computation failed: {reason}")]
    MetricComputation { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GbceError> for std::process::ExitCode {
    fn from(err: &GbceError) -> Self {
        let code: u8 = match err {
            GbceError::Io(_) => 1,
            GbceError::ConfigParse { .. }
            | GbceError::ConfigInvalid { .. } => 2,
            GbceError::Data { .. } => 3,
            GbceError::UnknownStock { .. }
            | GbceError::DuplicateStock { .. }
            | GbceError::InvalidStock { .. }
            | GbceError::InvalidTrade { .. } => 4,
            GbceError::InvalidInterval { .. }
            | GbceError::NoTradesInWindow { .. }
            | GbceError::MetricComputation { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
