//! notefold-core - Core library for Notefold
//!
//! This crate contains the shared models, the remote API client, and the
//! client-side note session engine (aggregation, grouping, optimistic
//! mutations, focus-driven refresh) used by Notefold front ends.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod session;
pub mod state;
pub mod util;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AccessToken, CredentialStore, MemoryCredentialStore};
pub use error::{Error, ErrorKind, Result};
pub use models::{Folder, FolderId, Note, NoteDraft, NoteEdit, NoteId, Priority};
pub use session::{FocusOutcome, NoteSession, RefreshController, RefreshOutcome};
pub use state::{Notice, NoticeLevel};
pub use view::{project, GroupedView};
