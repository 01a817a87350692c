use crate::backend::{BackendError, CollectionPath, Direction, DocumentStore, Query, to_fields};
use crate::types::{Note, NoteRecord, UserRecord};
use std::sync::Arc;

const USERS: &str = "users";
const NOTES: &str = "notes";

/// Users and their notes, laid out as `users/{uid}/notes/{noteId}`
#[derive(Clone)]
pub struct Repository {
    documents: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    fn users() -> Result<CollectionPath, BackendError> {
        CollectionPath::root(USERS)
    }

    fn notes(uid: &str) -> Result<CollectionPath, BackendError> {
        Self::users()?.doc(uid)?.collection(NOTES)
    }

    pub async fn save_user(&self, uid: &str, user: &UserRecord) -> Result<(), BackendError> {
        let path = Self::users()?.doc(uid)?;
        self.documents.set(&path, to_fields(user)?).await
    }

    /// Id of the first user document whose `email` matches exactly
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<String>, BackendError> {
        let query = Query::new(Self::users()?).where_eq("email", email).limit(1);
        let documents = self.documents.query(&query).await?;
        Ok(documents.into_iter().next().map(|document| document.id))
    }

    /// All notes of a user, newest first
    pub async fn list_notes(&self, uid: &str) -> Result<Vec<Note>, BackendError> {
        let query = Query::new(Self::notes(uid)?).order_by("date", Direction::Descending);
        self.documents
            .query(&query)
            .await?
            .into_iter()
            .map(|document| -> Result<Note, BackendError> {
                Ok(Note {
                    record: document.decode()?,
                    id: document.id,
                })
            })
            .collect()
    }

    pub async fn add_note(&self, uid: &str, record: NoteRecord) -> Result<Note, BackendError> {
        let id = self
            .documents
            .add(&Self::notes(uid)?, to_fields(&record)?)
            .await?;
        Ok(Note { id, record })
    }
}
