//! Data models for Notefold

mod folder;
mod note;
mod user;

pub use folder::{Folder, FolderId};
pub use note::{Note, NoteDraft, NoteEdit, NoteId, Priority, DEFAULT_NOTE_COLOR};
pub(crate) use user::ProfileUpdateBody;
pub use user::{SignUpRequest, UserProfile};
