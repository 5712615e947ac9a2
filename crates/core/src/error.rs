use crate::world_state::StoreError;

/// Kind of document addressed by a failed lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Patient,
    Payment,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Patient => write!(f, "patient"),
            RecordKind::Payment => write!(f, "payment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("world state failure: {0}")]
    Infrastructure(#[from] StoreError),
    #[error("patient {0} already exists")]
    AlreadyExists(String),
    #[error("{kind} {id} does not exist")]
    NotFound { kind: RecordKind, id: String },
    #[error("failed to decode stored document: {0}")]
    Decode(serde_json::Error),
    #[error("failed to encode document: {0}")]
    Encode(serde_json::Error),
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("failed to get client identity: {0}")]
    IdentityUnavailable(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("unknown contract function: {0}")]
    UnknownFunction(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl LedgerError {
    pub(crate) fn not_found(kind: RecordKind, id: &str) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
