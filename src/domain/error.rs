//! Domain error types.

use crate::domain::snapshot::SnapshotKind;

/// A required price is absent or unusable. Aborts the whole rebalance cycle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    #[error("missing {kind} price for {code}")]
    MissingPrice { code: String, kind: SnapshotKind },

    #[error("prior close for {code} is zero")]
    ZeroPriorClose { code: String },

    #[error("prior close for {code} is negative: {price}")]
    NonPositivePriorClose { code: String, price: f64 },

    #[error("invalid {kind} price for {code}: {price}")]
    InvalidPrice {
        code: String,
        kind: SnapshotKind,
        price: f64,
    },

    #[error("duplicate position for {code}")]
    DuplicatePosition { code: String },
}

/// The candidate list handed over by the ranking step is malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown asset: {code}")]
    UnknownAsset { code: String },

    #[error("duplicate candidate: {code}")]
    DuplicateCandidate { code: String },

    #[error("duplicate candidate rank: {rank}")]
    DuplicateRank { rank: u32 },
}

/// Top-level error type for countertrend.
#[derive(Debug, thiserror::Error)]
pub enum CountertrendError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

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

    #[error("data source error: {reason}")]
    Source { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CountertrendError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            CountertrendError::Io(_) => 1,
            CountertrendError::ConfigParse { .. }
            | CountertrendError::ConfigMissing { .. }
            | CountertrendError::ConfigInvalid { .. } => 2,
            CountertrendError::Configuration(_) => 3,
            CountertrendError::Data(_) => 4,
            CountertrendError::Source { .. } => 5,
        }
    }
}

impl From<&CountertrendError> for std::process::ExitCode {
    fn from(err: &CountertrendError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
