use thiserror::Error;

use crate::oracle::OracleError;

/// Errors surfaced by the classification core.
///
/// Everything except `Storage` is recoverable at the UI layer and leaves the
/// current prediction untouched.
#[derive(Debug, Error)]
pub enum IkaraError {
    #[error("Unknown art style '{0}'")]
    UnknownStyle(String),

    #[error("'{0}' is not a valid art style; select one of the recognized styles")]
    InvalidStyle(String),

    #[error("Please analyze at least 2 images to compare ({resolved} analyzed)")]
    InsufficientInput { resolved: usize },

    #[error("History index {index} is out of range ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("A confirmed prediction carries no correction to apply")]
    ConfirmationNotApplicable,

    #[error("No prediction is currently loaded")]
    NoCurrentPrediction,

    #[error("Maximum {max} images allowed for comparison")]
    TooManySlots { max: usize },

    #[error("Comparison slot '{0}' not found")]
    SlotNotFound(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("Storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, IkaraError>;
