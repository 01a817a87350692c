use super::documents::{
    CollectionPath, Direction, Document, DocumentPath, DocumentStore, Fields, Query,
};
use super::error::BackendError;
use super::identity::{
    EMAIL_EXISTS_MESSAGE, INVALID_EMAIL_MESSAGE, IdentityProvider, MIN_PASSWORD_LEN,
    WEAK_PASSWORD_MESSAGE,
};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::ValidateEmail;

/// In-memory identity provider for testing/development
#[derive(Clone, Default)]
pub struct InMemoryIdentity {
    // Keyed by lowercased email
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

#[derive(Clone)]
struct Account {
    uid: String,
    password_hash: String,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_password(uid: &str, password: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(uid.as_bytes());
        hasher.update(b":");
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait::async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn create_user(&self, email: &str, password: &str) -> Result<String, BackendError> {
        if !email.to_string().validate_email() {
            return Err(BackendError::InvalidInput(INVALID_EMAIL_MESSAGE.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BackendError::InvalidInput(WEAK_PASSWORD_MESSAGE.to_string()));
        }

        let key = email.to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(BackendError::InvalidInput(EMAIL_EXISTS_MESSAGE.to_string()));
        }

        let uid = uuid::Uuid::new_v4().simple().to_string();
        let password_hash = Self::hash_password(&uid, password);
        accounts.insert(
            key,
            Account {
                uid: uid.clone(),
                password_hash,
            },
        );

        Ok(uid)
    }

    async fn delete_user(&self, uid: &str) -> Result<(), BackendError> {
        let mut accounts = self.accounts.write().await;
        accounts.retain(|_, account| account.uid != uid);
        Ok(())
    }

    async fn verify_password(&self, email: &str, password: &str) -> Result<String, BackendError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(&email.to_lowercase())
            .ok_or(BackendError::InvalidCredentials)?;

        if Self::hash_password(&account.uid, password) != account.password_hash {
            return Err(BackendError::InvalidCredentials);
        }

        Ok(account.uid.clone())
    }
}

/// In-memory document store for testing/development
#[derive(Clone, Default)]
pub struct InMemoryDocuments {
    // Collection path -> documents ordered by id
    collections: Arc<RwLock<HashMap<String, BTreeMap<String, Fields>>>>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cross-type ordering: null < bool < number < string < array < object
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocuments {
    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), BackendError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(path.parent().to_string())
            .or_default()
            .insert(path.id().to_string(), fields);
        Ok(())
    }

    async fn add(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<String, BackendError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, BackendError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(&query.collection.to_string()) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<Document> = documents
            .iter()
            .filter(|(_, fields)| match &query.filter {
                Some(filter) => fields.get(&filter.field) == Some(&filter.value),
                None => true,
            })
            // Documents missing the order field are excluded, as in Firestore
            .filter(|(_, fields)| match &query.order_by {
                Some(order) => fields.contains_key(&order.field),
                None => true,
            })
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();

        if let Some(order) = &query.order_by {
            results.sort_by(|a, b| {
                let ordering = compare_values(&a.fields[&order.field], &b.fields[&order.field])
                    .then_with(|| a.id.cmp(&b.id));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            results.truncate(limit as usize);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_create_and_verify_user() {
        let identity = InMemoryIdentity::new();
        let uid = identity.create_user("a@x.com", "secret123").await.unwrap();

        assert_eq!(
            identity.verify_password("a@x.com", "secret123").await.unwrap(),
            uid
        );
        assert_eq!(
            identity.verify_password("A@X.com", "secret123").await.unwrap(),
            uid
        );
        assert!(matches!(
            identity.verify_password("a@x.com", "wrong-password").await,
            Err(BackendError::InvalidCredentials)
        ));
        assert!(matches!(
            identity.verify_password("nope@x.com", "secret123").await,
            Err(BackendError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_input() {
        let identity = InMemoryIdentity::new();

        assert!(matches!(
            identity.create_user("not-an-email", "secret123").await,
            Err(BackendError::InvalidInput(msg)) if msg == INVALID_EMAIL_MESSAGE
        ));
        assert!(matches!(
            identity.create_user("a@x.com", "123").await,
            Err(BackendError::InvalidInput(msg)) if msg == WEAK_PASSWORD_MESSAGE
        ));

        identity.create_user("a@x.com", "secret123").await.unwrap();
        assert!(matches!(
            identity.create_user("A@x.com", "other-secret").await,
            Err(BackendError::InvalidInput(msg)) if msg == EMAIL_EXISTS_MESSAGE
        ));
    }

    #[tokio::test]
    async fn test_delete_user_frees_email() {
        let identity = InMemoryIdentity::new();
        let uid = identity.create_user("a@x.com", "secret123").await.unwrap();
        identity.delete_user(&uid).await.unwrap();

        assert!(matches!(
            identity.verify_password("a@x.com", "secret123").await,
            Err(BackendError::InvalidCredentials)
        ));
        assert!(identity.create_user("a@x.com", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_set_replaces_document() {
        let store = InMemoryDocuments::new();
        let users = CollectionPath::root("users").unwrap();
        let path = users.doc("U1").unwrap();

        store
            .set(&path, fields(json!({"email": "a@x.com", "extra": true})))
            .await
            .unwrap();
        store
            .set(&path, fields(json!({"email": "b@x.com"})))
            .await
            .unwrap();

        let documents = store.query(&Query::new(users)).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "U1");
        assert_eq!(documents[0].fields, fields(json!({"email": "b@x.com"})));
    }

    #[tokio::test]
    async fn test_query_filter_and_limit() {
        let store = InMemoryDocuments::new();
        let users = CollectionPath::root("users").unwrap();

        for (id, email) in [("U1", "a@x.com"), ("U2", "b@x.com"), ("U3", "a@x.com")] {
            store
                .set(&users.doc(id).unwrap(), fields(json!({ "email": email })))
                .await
                .unwrap();
        }

        let all = store
            .query(&Query::new(users.clone()).where_eq("email", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let one = store
            .query(&Query::new(users).where_eq("email", "a@x.com").limit(1))
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "U1");
    }

    #[tokio::test]
    async fn test_query_orders_descending_and_skips_missing_field() {
        let store = InMemoryDocuments::new();
        let notes = CollectionPath::root("users")
            .unwrap()
            .doc("U1")
            .unwrap()
            .collection("notes")
            .unwrap();

        for date in [
            "2025-01-02T00:00:00.000Z",
            "2025-01-03T00:00:00.000Z",
            "2025-01-01T00:00:00.000Z",
        ] {
            store
                .add(&notes, fields(json!({"text": "t", "date": date})))
                .await
                .unwrap();
        }
        store
            .add(&notes, fields(json!({"text": "undated"})))
            .await
            .unwrap();

        let results = store
            .query(&Query::new(notes).order_by("date", Direction::Descending))
            .await
            .unwrap();
        let dates: Vec<&str> = results
            .iter()
            .map(|d| d.fields["date"].as_str().unwrap())
            .collect();
        assert_eq!(
            dates,
            vec![
                "2025-01-03T00:00:00.000Z",
                "2025-01-02T00:00:00.000Z",
                "2025-01-01T00:00:00.000Z",
            ]
        );
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryDocuments::new();
        let users = CollectionPath::root("users").unwrap();
        let notes_u1 = users.doc("U1").unwrap().collection("notes").unwrap();
        let notes_u2 = users.doc("U2").unwrap().collection("notes").unwrap();

        store
            .add(&notes_u1, fields(json!({"text": "mine"})))
            .await
            .unwrap();

        assert!(store.query(&Query::new(notes_u2)).await.unwrap().is_empty());
        assert_eq!(store.query(&Query::new(notes_u1)).await.unwrap().len(), 1);
    }

    #[test]
    fn test_compare_values_across_types() {
        assert_eq!(compare_values(&json!(1), &json!(2.5)), Ordering::Less);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&json!(null), &json!("a")), Ordering::Less);
        assert_eq!(compare_values(&json!(true), &json!(1)), Ordering::Less);
    }
}
