//! Errors raised by the editing session.
//!
//! Not-found style ids are not errors anywhere in the runtime: they come back
//! as `false`/`None`. The variants here are for caller mistakes (unknown
//! elements, badly typed values) and for snapshots that cannot be imported.

use quire_core::{ElementId, QuireError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A property name, category or value was rejected by the schema
    #[error(transparent)]
    Core(#[from] QuireError),

    /// The element is not part of this session
    #[error("Element {0} not found in this session")]
    ElementNotFound(ElementId),

    /// The snapshot is not valid JSON or does not have the snapshot shape
    #[error(
        "Malformed style snapshot: {0}\n\n\
        Nothing was imported."
    )]
    MalformedSnapshot(#[from] serde_json::Error),

    /// The snapshot parsed but one of its entries is inconsistent
    #[error(
        "Invalid style snapshot: {reason}\n\n\
        Nothing was imported."
    )]
    InvalidSnapshot { reason: String },
}

impl RuntimeError {
    pub fn invalid_snapshot(reason: impl Into<String>) -> Self {
        RuntimeError::InvalidSnapshot {
            reason: reason.into(),
        }
    }
}
