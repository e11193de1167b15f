//! In-process document store, optionally loaded from and saved to JSON.
//!
//! The file format is one object keyed by collection path, each holding an
//! object keyed by document id:
//!
//! ```json
//! { "users": { "u1": { "email": "ana@example.com" } },
//!   "users/u1/health_records": { "r1": { "fecha": "2025-11-20" } } }
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;
use vitals_records::Document;

use crate::store::{Direction, DocumentStore, Query, StoreError};

type Collection = BTreeMap<String, Map<String, Value>>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(contents: &str) -> Result<Self, StoreError> {
        let value: Value = serde_json::from_str(contents)?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &Value) -> Result<Self, StoreError> {
        let root = value
            .as_object()
            .ok_or_else(|| StoreError::InvalidData("store root must be an object".to_string()))?;

        let mut collections = BTreeMap::new();
        for (path, documents) in root {
            let documents = documents.as_object().ok_or_else(|| {
                StoreError::InvalidData(format!("collection {path} must be an object"))
            })?;

            let mut collection = Collection::new();
            for (id, fields) in documents {
                let fields = fields.as_object().ok_or_else(|| {
                    StoreError::InvalidData(format!("document {path}/{id} must be an object"))
                })?;
                collection.insert(id.clone(), fields.clone());
            }
            collections.insert(path.clone(), collection);
        }

        Ok(Self {
            collections: RwLock::new(collections),
        })
    }

    /// Current contents in the file format.
    pub async fn to_json(&self) -> Value {
        let collections = self.collections.read().await;
        let root: Map<String, Value> = collections
            .iter()
            .map(|(path, documents)| {
                let documents: Map<String, Value> = documents
                    .iter()
                    .map(|(id, fields)| (id.clone(), Value::Object(fields.clone())))
                    .collect();
                (path.clone(), Value::Object(documents))
            })
            .collect();
        Value::Object(root)
    }

    /// Store a document under a caller-chosen id, replacing any previous one.
    pub async fn insert(&self, collection: &str, id: impl Into<String>, record: Map<String, Value>) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.into(), record);
    }

    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = documents
            .iter()
            .filter(|(_, fields)| {
                query
                    .order_by
                    .as_ref()
                    .map_or(true, |order| fields.contains_key(&order.field))
            })
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect();

        if let Some(order) = &query.order_by {
            // Stable sort keeps id order among equal keys.
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.data.get(&order.field), b.data.get(&order.field));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        debug!(collection, documents = matched.len(), "memory store query");
        Ok(matched)
    }

    async fn add_doc(
        &self,
        collection: &str,
        record: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.insert(collection, id.clone(), record).await;
        Ok(id)
    }
}

/// Orders values of different kinds null < bool < number < string < others.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = (a.unwrap_or(&Value::Null), b.unwrap_or(&Value::Null));
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
