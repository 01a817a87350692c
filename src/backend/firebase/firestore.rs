use super::token::AccessTokens;
use super::value::{decode_fields, encode_fields, encode_value};
use crate::backend::documents::{
    CollectionPath, Direction, Document, DocumentPath, DocumentStore, Fields, Query,
};
use crate::backend::error::BackendError;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Cloud Firestore over the REST API
pub struct Firestore {
    http: reqwest::Client,
    tokens: Arc<AccessTokens>,
    documents_url: Url,
}

#[derive(Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Option<Value>,
}

#[derive(Deserialize)]
struct RunQueryResponse {
    #[serde(default)]
    document: Option<FirestoreDocument>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl FirestoreDocument {
    fn into_document(self) -> Result<Document, BackendError> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let fields = match &self.fields {
            Some(fields) => decode_fields(fields)?,
            None => Fields::new(),
        };
        Ok(Document { id, fields })
    }
}

/// Body of a `:runQuery` request
fn structured_query(query: &Query) -> Value {
    let mut structured = Map::new();
    structured.insert(
        "from".to_string(),
        json!([{ "collectionId": query.collection.id() }]),
    );

    if let Some(filter) = &query.filter {
        structured.insert(
            "where".to_string(),
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": filter.field },
                    "op": "EQUAL",
                    "value": encode_value(&filter.value),
                }
            }),
        );
    }

    if let Some(order) = &query.order_by {
        let direction = match order.direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        structured.insert(
            "orderBy".to_string(),
            json!([{ "field": { "fieldPath": order.field }, "direction": direction }]),
        );
    }

    if let Some(limit) = query.limit {
        structured.insert("limit".to_string(), json!(limit));
    }

    json!({ "structuredQuery": structured })
}

impl Firestore {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<AccessTokens>,
        endpoint: &str,
        project_id: &str,
    ) -> Result<Self, BackendError> {
        let documents_url = Url::parse(&format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            endpoint.trim_end_matches('/'),
            project_id
        ))
        .map_err(|e| BackendError::Config(format!("invalid Firestore endpoint: {}", e)))?;

        Ok(Self {
            http,
            tokens,
            documents_url,
        })
    }

    /// Resource URL for `segments` below the documents root, with an optional
    /// `:method` suffix on the last segment
    fn url(&self, segments: &[String], method: Option<&str>) -> Result<Url, BackendError> {
        let mut url = self.documents_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                BackendError::Config("Firestore endpoint cannot be a base".to_string())
            })?;
            path.extend(segments);
            if let Some(method) = method {
                let last = segments.last().map(String::as_str).unwrap_or("documents");
                path.pop();
                path.push(&format!("{}:{}", last, method));
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<reqwest::Response, BackendError> {
        let response = request
            .bearer_auth(self.tokens.bearer().await?)
            .send()
            .await
            .map_err(|e| BackendError::http(url.as_str(), e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        tracing::debug!("Firestore returned {} for {}: {}", status, url, message);
        Err(BackendError::Upstream {
            service: "firestore",
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl DocumentStore for Firestore {
    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), BackendError> {
        let url = self.url(path.segments(), None)?;
        tracing::debug!("Setting document {}", path);

        let request = self
            .http
            .patch(url.clone())
            .json(&json!({ "fields": encode_fields(&fields) }));
        self.send(request, &url).await?;
        Ok(())
    }

    async fn add(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<String, BackendError> {
        let url = self.url(collection.segments(), None)?;
        tracing::debug!("Adding document to {}", collection);

        let request = self
            .http
            .post(url.clone())
            .json(&json!({ "fields": encode_fields(&fields) }));
        let document: FirestoreDocument = self
            .send(request, &url)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("created document: {}", e)))?;

        Ok(document.into_document()?.id)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, BackendError> {
        let parent: Vec<String> = query
            .collection
            .parent()
            .map(|doc| doc.segments().to_vec())
            .unwrap_or_default();
        let url = self.url(&parent, Some("runQuery"))?;
        tracing::debug!("Querying {}", query.collection);

        let request = self.http.post(url.clone()).json(&structured_query(query));
        let results: Vec<RunQueryResponse> = self
            .send(request, &url)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("query response: {}", e)))?;

        // Entries without a document only carry progress metadata
        results
            .into_iter()
            .filter_map(|result| result.document)
            .map(FirestoreDocument::into_document)
            .collect()
    }
}
