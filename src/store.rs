//! Abstract data-store interface the populator writes through.
//!
//! The populator never talks to a concrete backend directly. Everything it
//! needs from the remote store (paginated queries, option-set metadata
//! lookups, and single-record inserts) goes through the [`DataStore`] trait,
//! so any transactional backend can be plugged in by implementing three
//! methods. An in-memory implementation lives in [`crate::memory`] and backs
//! both the integration tests and `--dry-run` executions.

use crate::query::{QueryPage, QueryRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by a [`DataStore`] implementation.
///
/// Transport failures are fatal to a populate run; retries, if any, are the
/// backend's own concern and happen below this interface.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store is unreachable or rejected a call.
    #[error("transport error: {0}")]
    Transport(String),

    /// The query named an entity kind the store does not know.
    #[error("unknown entity kind: {0}")]
    UnknownEntity(String),

    /// The metadata lookup named an option set the store does not know.
    #[error("unknown option set: {0}")]
    UnknownOptionSet(String),

    /// A paging cursor token could not be interpreted.
    #[error("invalid cursor token: {0}")]
    InvalidCursor(String),
}

/// A single typed column value as stored or queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    String(String),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Date(NaiveDate),
    /// Foreign-key style reference to another record.
    Reference(Uuid),
}

impl FieldValue {
    /// Ordering between two values of the same variant.
    ///
    /// Returns `None` for mismatched variants (and for NaN floats), which
    /// filter evaluation treats as "no match".
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Int64(a), FieldValue::Int64(b)) => Some(a.cmp(b)),
            (FieldValue::Float64(a), FieldValue::Float64(b)) => a.partial_cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            (FieldValue::Reference(a), FieldValue::Reference(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<Uuid> {
        match self {
            FieldValue::Reference(id) => Some(*id),
            _ => None,
        }
    }
}

/// A record returned by a query: its identifier plus a typed field bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: Uuid, fields: HashMap<String, FieldValue>) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}

/// One entry of an enumerated option set (metadata, not row data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub code: i64,
    pub label: String,
}

/// The remote transactional store, as seen by the populator.
///
/// Contract:
/// - `query` supports equality/inequality/range conditions, AND-combined,
///   and cursor-token paging (see [`QueryRequest`] / [`QueryPage`]).
/// - `query_option_set` is a metadata lookup for an enumerated option set;
///   it is not paginated.
/// - `create` inserts a single record and returns its generated identifier.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> Result<QueryPage, StoreError>;

    async fn query_option_set(&self, name: &str) -> Result<Vec<OptionValue>, StoreError>;

    async fn create(
        &self,
        entity: &str,
        fields: HashMap<String, FieldValue>,
    ) -> Result<Uuid, StoreError>;
}
