//! Domain error types.

/// Top-level error type for tzutrader.
#[derive(Debug, thiserror::Error)]
pub enum TzuError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("history index {index} out of range (holding {len} values)")]
    OutOfRange { index: usize, len: usize },

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

    #[error("strategy {strategy} cannot consume {format} records")]
    UnsupportedInput { strategy: String, format: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TzuError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        TzuError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TzuError> for std::process::ExitCode {
    fn from(err: &TzuError) -> Self {
        let code: u8 = match err {
            TzuError::Io(_) => 1,
            TzuError::ConfigParse { .. }
            | TzuError::ConfigMissing { .. }
            | TzuError::ConfigInvalid { .. } => 2,
            TzuError::InvalidParameter { .. } | TzuError::UnsupportedInput { .. } => 3,
            TzuError::OutOfRange { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
