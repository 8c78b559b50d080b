//! Remote notes API.
//!
//! `NoteService` is the seam between the session engine and the network; the
//! session only ever talks to the trait, and `HttpNoteService` is the
//! production implementation.

mod http;
mod transport;

use async_trait::async_trait;

use crate::auth::AccessToken;
use crate::models::{Folder, FolderId, Note, NoteDraft, NoteId};
use crate::Result;

pub use http::HttpNoteService;
pub use transport::ApiTransport;

/// Note and folder operations exposed by the remote service.
#[async_trait]
pub trait NoteService: Send + Sync {
    async fn list_folders(&self, token: &AccessToken) -> Result<Vec<Folder>>;

    async fn create_folder(&self, token: &AccessToken, name: &str) -> Result<Folder>;

    async fn delete_folder(&self, token: &AccessToken, folder_id: &FolderId) -> Result<()>;

    async fn delete_all_folders(&self, token: &AccessToken) -> Result<()>;

    /// Notes without a folder.
    async fn list_unfiled_notes(&self, token: &AccessToken) -> Result<Vec<Note>>;

    async fn list_folder_notes(
        &self,
        token: &AccessToken,
        folder_id: &FolderId,
    ) -> Result<Vec<Note>>;

    async fn create_note(&self, token: &AccessToken, draft: &NoteDraft) -> Result<Note>;

    async fn update_title(&self, token: &AccessToken, note_id: &NoteId, title: &str)
        -> Result<()>;

    async fn update_content(
        &self,
        token: &AccessToken,
        note_id: &NoteId,
        content: &str,
    ) -> Result<()>;

    async fn delete_note(&self, token: &AccessToken, note_id: &NoteId) -> Result<()>;

    async fn toggle_favorite(&self, token: &AccessToken, note_id: &NoteId) -> Result<()>;

    /// Server-side favorites listing. May include non-favorites; callers filter.
    async fn list_favorites(&self, token: &AccessToken) -> Result<Vec<Note>>;
}
