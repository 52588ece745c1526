//! Crate-level error for a full reconciliation pass.

use thiserror::Error;

use crate::config::{MergeError, SnapshotError, ValidationError};
use crate::template::RenderError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(
        "invalid router configuration: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
