use thiserror::Error;

/// Errors raised while analyzing a transaction snapshot.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A numeric transaction field could not be parsed.
    #[error("Failed to parse {field} '{value}' of transaction {hash}")]
    Parse {
        hash: String,
        field: &'static str,
        value: String,
    },

    /// A numeric field parsed but is out of range for f64.
    #[error("Field {field} of transaction {hash} is not representable as a finite number")]
    NonFinite { hash: String, field: &'static str },

    /// A numeric field carries a decimal exponent too large to process.
    #[error("Field {field} of transaction {hash} has decimal exponent {scale} outside the supported range")]
    OutOfRange {
        hash: String,
        field: &'static str,
        scale: i64,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Hash of the transaction that caused the failure.
    pub fn tx_hash(&self) -> &str {
        match self {
            Self::Parse { hash, .. }
            | Self::NonFinite { hash, .. }
            | Self::OutOfRange { hash, .. } => hash,
        }
    }
}
