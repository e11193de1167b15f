//! The document store seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vitals_core::VitalsError;
use vitals_records::Document;

/// Collection holding one profile document per user.
pub const USERS_COLLECTION: &str = "users";

/// Path of a user's health record collection.
pub fn health_records_path(user_id: &str) -> String {
    format!("{USERS_COLLECTION}/{user_id}/health_records")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Ordering and limit applied to a collection read.
///
/// Ordering by a field excludes documents that do not carry it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Query {
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Permission denied on {0}")]
    PermissionDenied(String),
    #[error("Store backend failed: {0}")]
    Backend(String),
    #[error("Invalid store data: {0}")]
    InvalidData(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for VitalsError {
    fn from(err: StoreError) -> Self {
        VitalsError::Store(err.to_string())
    }
}

/// Minimal hosted-document-database surface used by the vitals crates.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read documents of `collection` after applying `query`.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Store `record` as a new document and return its id.
    async fn add_doc(
        &self,
        collection: &str,
        record: Map<String, Value>,
    ) -> Result<String, StoreError>;
}
