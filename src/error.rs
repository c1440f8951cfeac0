//! Error types for the populate engine.

use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while generating and committing records.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// The store failed a query or insert. Fatal to the run.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Rejection sampling gave up on one sample after hitting the attempt
    /// cap. Whether this skips the sample or aborts the run is a
    /// configuration choice.
    #[error("no available car found for sample {sample} after {attempts} attempts")]
    ConstraintExhausted { sample: u64, attempts: u32 },

    /// A reference set came back empty at startup. Fatal precondition
    /// failure; generation never starts.
    #[error("reference set '{0}' is empty")]
    EmptyReferenceSet(&'static str),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A fetched record lacks a field the decoder requires.
    #[error("record {id} is missing field '{field}'")]
    MissingField { id: Uuid, field: &'static str },

    /// A fetched record holds a field of an unexpected type or code.
    #[error("record {id} field '{field}' has an unexpected type or value")]
    UnexpectedValue { id: Uuid, field: &'static str },
}
