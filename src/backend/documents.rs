use super::error::BackendError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::fmt;

/// Field map of a stored document
pub type Fields = Map<String, Value>;

/// Hierarchical document store (collections of documents addressed by id)
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or fully replace the document at `path`
    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), BackendError>;

    /// Add a document with a store-assigned id and return that id
    async fn add(&self, collection: &CollectionPath, fields: Fields)
    -> Result<String, BackendError>;

    async fn query(&self, query: &Query) -> Result<Vec<Document>, BackendError>;
}

/// A document read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BackendError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| BackendError::Decode(format!("document {}: {}", self.id, e)))
    }
}

/// Serialize a record into a document field map
pub fn to_fields<T: Serialize>(record: &T) -> Result<Fields, BackendError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(BackendError::Decode(format!(
            "record is not an object: {}",
            other
        ))),
        Err(e) => Err(BackendError::Decode(format!("record: {}", e))),
    }
}

fn validate_segment(segment: &str) -> Result<(), BackendError> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains('/') {
        return Err(BackendError::InvalidInput(format!(
            "invalid path segment: {:?}",
            segment
        )));
    }
    Ok(())
}

/// Path of a collection: `users` or `users/{uid}/notes`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    segments: Vec<String>,
}

/// Path of a document: `users/{uid}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl CollectionPath {
    pub fn root(collection_id: &str) -> Result<Self, BackendError> {
        validate_segment(collection_id)?;
        Ok(Self {
            segments: vec![collection_id.to_string()],
        })
    }

    pub fn doc(&self, document_id: &str) -> Result<DocumentPath, BackendError> {
        validate_segment(document_id)?;
        let mut segments = self.segments.clone();
        segments.push(document_id.to_string());
        Ok(DocumentPath { segments })
    }

    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Owning document, `None` for top-level collections
    pub fn parent(&self) -> Option<DocumentPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(DocumentPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl DocumentPath {
    pub fn collection(&self, collection_id: &str) -> Result<CollectionPath, BackendError> {
        validate_segment(collection_id)?;
        let mut segments = self.segments.clone();
        segments.push(collection_id.to_string());
        Ok(CollectionPath { segments })
    }

    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filter on a single field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Query over the documents of one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: CollectionPath,
    pub filter: Option<FieldFilter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl Query {
    pub fn new(collection: CollectionPath) -> Self {
        Self {
            collection,
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Some(FieldFilter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
