//! Domain error types.

/// Top-level error type for spikescan.
///
/// `Data` covers malformed input records and is always attributed to a
/// symbol so batch callers can skip the offender and keep going. Thin
/// history and empty forward windows are not errors; those candidates are
/// simply excluded from output.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("bad data for {symbol}: {reason}")]
    Data { symbol: String, reason: String },

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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("no symbols with usable data ({skipped} skipped)")]
    EmptyUniverse { skipped: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScanError> for std::process::ExitCode {
    fn from(err: &ScanError) -> Self {
        let code: u8 = match err {
            ScanError::Io(_) => 1,
            ScanError::ConfigParse { .. }
            | ScanError::ConfigMissing { .. }
            | ScanError::ConfigInvalid { .. } => 2,
            ScanError::Data { .. } => 3,
            ScanError::NoData { .. } | ScanError::EmptyUniverse { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
