mod add_note;
mod list_notes;
mod login;
mod not_found;
mod register;
mod root;

pub use add_note::add_note;
pub use list_notes::list_notes;
pub use login::login;
pub use not_found::not_found;
pub use register::register;
pub use root::{LIVENESS_MESSAGE, root};
