mod auth;
mod firestore;
mod token;
mod value;

pub use auth::FirebaseAuth;
pub use firestore::Firestore;
pub use token::AccessTokens;
