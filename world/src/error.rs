use thiserror::Error;
use turret_defence_core::{StatsError, StoreError};

use crate::economy::ActionRejected;

/// Failures surfaced while running processors or factories.
#[derive(Debug, Error)]
pub enum SimError {
    /// A required entity or component was missing.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A kind had no sheet in the stats table.
    #[error(transparent)]
    Stats(#[from] StatsError),
    /// A player action broke an economic rule and had no effect.
    #[error("action rejected: {0}")]
    Rejected(#[from] ActionRejected),
}

impl SimError {
    /// Reports whether the error is an expected rule rejection rather than
    /// a programming error.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
