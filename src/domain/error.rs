//! Domain error types.

/// A parse error with position information for indicator notation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for tradelens.
#[derive(Debug, thiserror::Error)]
pub enum TradelensError {
    #[error("invalid trade: {field} {reason}")]
    InvalidTrade { field: String, reason: String },

    #[error("invalid trade record at {location}: {reason}")]
    InvalidRecord { location: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    IndicatorParse(#[from] ParseError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradelensError {
    pub fn invalid_trade(field: &str, reason: &str) -> Self {
        TradelensError::InvalidTrade {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<&TradelensError> for std::process::ExitCode {
    fn from(err: &TradelensError) -> Self {
        let code: u8 = match err {
            TradelensError::Io(_) | TradelensError::Serialize(_) => 1,
            TradelensError::ConfigParse { .. }
            | TradelensError::ConfigMissing { .. }
            | TradelensError::ConfigInvalid { .. } => 2,
            TradelensError::Data { .. } => 3,
            TradelensError::InvalidTrade { .. } | TradelensError::InvalidRecord { .. } => 4,
            TradelensError::NoData { .. } => 5,
            TradelensError::IndicatorParse(_) => 6,
        };
        std::process::ExitCode::from(code)
    }
}
