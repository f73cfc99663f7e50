use tripsplit_domain::services::{BalanceError, FxError, SettlementError, ShareBuildError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("trip has no participants who can share expenses")]
    NoParticipants,
    #[error("expense #{index}: {source}")]
    Shares {
        index: usize,
        #[source]
        source: ShareBuildError,
    },
    #[error("expense #{index}: {source}")]
    Currency {
        index: usize,
        #[source]
        source: FxError,
    },
    #[error("total spent on the trip is out of range")]
    TotalOutOfRange,
    #[error(transparent)]
    Balance(#[from] BalanceError),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

impl LedgerError {
    /// Position of the offending expense, for errors tied to one expense.
    pub fn expense_index(&self) -> Option<usize> {
        match self {
            Self::Shares { index, .. } | Self::Currency { index, .. } => Some(*index),
            Self::NoParticipants
            | Self::TotalOutOfRange
            | Self::Balance(_)
            | Self::Settlement(_) => None,
        }
    }
}
