//! Query descriptors and the paginated bulk-fetch executor.
//!
//! [`fetch_all`] hides the cursor bookkeeping of the store's paging protocol:
//! it walks pages starting at page 1 with an empty cursor token, carries the
//! returned token forward while the store signals more records, and returns
//! the fully materialized result set. Callers rely on getting a complete
//! in-memory list, not a lazy stream.

use crate::store::{DataStore, FieldValue, Record, StoreError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison operator for a query condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Ge,
    Le,
}

/// One column predicate. Conditions on a request are AND-combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub comparison: Comparison,
    pub value: FieldValue,
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: FieldValue) -> Self {
        Self::new(column, Comparison::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: FieldValue) -> Self {
        Self::new(column, Comparison::Ne, value)
    }

    pub fn ge(column: impl Into<String>, value: FieldValue) -> Self {
        Self::new(column, Comparison::Ge, value)
    }

    pub fn le(column: impl Into<String>, value: FieldValue) -> Self {
        Self::new(column, Comparison::Le, value)
    }

    fn new(column: impl Into<String>, comparison: Comparison, value: FieldValue) -> Self {
        Self {
            column: column.into(),
            comparison,
            value,
        }
    }

    /// Evaluate this condition against a record.
    ///
    /// A missing field or a type mismatch never matches, regardless of the
    /// operator.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(actual) = record.get(&self.column) else {
            return false;
        };
        let Some(ordering) = actual.compare(&self.value) else {
            return false;
        };
        match self.comparison {
            Comparison::Eq => ordering == Ordering::Equal,
            Comparison::Ne => ordering != Ordering::Equal,
            Comparison::Ge => ordering != Ordering::Less,
            Comparison::Le => ordering != Ordering::Greater,
        }
    }
}

/// Paging state carried between query calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based page number.
    pub number: u32,
    /// Records per page.
    pub size: u32,
    /// Opaque cursor token returned by the previous page; empty on page 1.
    pub cursor: String,
}

impl PageInfo {
    pub fn first(size: u32) -> Self {
        Self {
            number: 1,
            size,
            cursor: String::new(),
        }
    }
}

/// A query against one entity kind: projected columns, AND-combined
/// conditions, and optional explicit paging state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub entity: String,
    pub columns: Vec<String>,
    pub conditions: Vec<Condition>,
    pub page: Option<PageInfo>,
}

impl QueryRequest {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            columns: Vec::new(),
            conditions: Vec::new(),
            page: None,
        }
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPage {
    pub records: Vec<Record>,
    /// Whether the store holds further records beyond this page.
    pub more_records: bool,
    /// Cursor token to pass back when requesting the next page.
    pub cursor: String,
}

/// Execute `request` page by page and return all matching records.
///
/// If the request carries no paging state, paging starts at page 1 with
/// `page_size` records per page and an empty cursor token. Store errors
/// propagate unchanged; there is no retry at this layer.
pub async fn fetch_all<S: DataStore + ?Sized>(
    store: &S,
    mut request: QueryRequest,
    page_size: u32,
) -> Result<Vec<Record>, StoreError> {
    if request.page.is_none() {
        request.page = Some(PageInfo::first(page_size));
    }

    let mut records = Vec::new();
    loop {
        let page = store.query(&request).await?;
        records.extend(page.records);
        if !page.more_records {
            break;
        }
        if let Some(info) = request.page.as_mut() {
            info.number += 1;
            info.cursor = page.cursor;
        }
    }

    Ok(records)
}
