pub mod error;
mod models;

pub use models::{
    AddNoteRequest, LoginRequest, Note, NoteRecord, RegisterRequest, UserRecord, UserResponse,
    timestamp_now,
};
