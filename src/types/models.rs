use serde::{Deserialize, Serialize};

/// Body of `POST /register`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /notes/{uid}`
#[derive(Debug, Clone, Deserialize)]
pub struct AddNoteRequest {
    pub text: String,
}

/// Response of register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub display_name: String,
}

/// Fields of a `users/{uid}` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub email: String,
    pub created_at: String,
}

/// Fields of a `users/{uid}/notes/{id}` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub text: String,
    pub date: String,
}

/// A stored note together with its document id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(flatten)]
    pub record: NoteRecord,
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2025-01-31T09:15:02.120Z`
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
