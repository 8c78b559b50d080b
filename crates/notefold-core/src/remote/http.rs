//! `reqwest` implementation of [`NoteService`].

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::transport::ApiTransport;
use super::NoteService;
use crate::auth::AccessToken;
use crate::config::ClientConfig;
use crate::models::{Folder, FolderId, Note, NoteDraft, NoteId};
use crate::Result;

const PATH_LIST_FOLDERS: &str = "/obtenercarpetausuario";
const PATH_CREATE_FOLDER: &str = "/crearcarpeta";
const PATH_DELETE_FOLDER: &str = "/borrarcarpeta";
const PATH_DELETE_ALL_FOLDERS: &str = "/borrartodaslascarpetas";
const PATH_LIST_UNFILED_NOTES: &str = "/obtenernotas";
const PATH_LIST_FOLDER_NOTES: &str = "/obtenernotasdecarpeta";
const PATH_CREATE_NOTE: &str = "/crearnota";
const PATH_UPDATE_TITLE: &str = "/modificartitulo";
const PATH_UPDATE_CONTENT: &str = "/modifynotecontenido";
const PATH_DELETE_NOTE: &str = "/borrarnotaid";
const PATH_TOGGLE_FAVORITE: &str = "/togglefavorite";
const PATH_LIST_FAVORITES: &str = "/getFavoriteNotes";

/// HTTP client for the notes API.
#[derive(Debug, Clone)]
pub struct HttpNoteService {
    transport: ApiTransport,
}

impl HttpNoteService {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: ApiTransport::new(config)?,
        })
    }

    #[must_use]
    pub const fn from_transport(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

#[derive(Serialize)]
struct FolderNameBody<'a> {
    #[serde(rename = "folderName")]
    folder_name: &'a str,
}

#[derive(Serialize)]
struct FolderIdBody<'a> {
    #[serde(rename = "folderId")]
    folder_id: &'a FolderId,
}

#[derive(Serialize)]
struct NoteIdBody<'a> {
    #[serde(rename = "noteId")]
    note_id: &'a NoteId,
}

#[derive(Serialize)]
struct TitleBody<'a> {
    #[serde(rename = "noteId")]
    note_id: &'a NoteId,
    #[serde(rename = "newTitle")]
    new_title: &'a str,
}

#[derive(Serialize)]
struct ContentBody<'a> {
    #[serde(rename = "noteId")]
    note_id: &'a NoteId,
    #[serde(rename = "newContent")]
    new_content: &'a str,
}

fn with_segment(path: &str, segment: &str) -> String {
    format!("{path}/{}", urlencoding::encode(segment))
}

#[async_trait]
impl NoteService for HttpNoteService {
    async fn list_folders(&self, token: &AccessToken) -> Result<Vec<Folder>> {
        let request = self
            .transport
            .request(Method::GET, PATH_LIST_FOLDERS, Some(token));
        self.transport.send_json("list_folders", request).await
    }

    async fn create_folder(&self, token: &AccessToken, name: &str) -> Result<Folder> {
        let request = self
            .transport
            .request(Method::POST, PATH_CREATE_FOLDER, Some(token))
            .json(&FolderNameBody { folder_name: name });
        self.transport.send_json("create_folder", request).await
    }

    async fn delete_folder(&self, token: &AccessToken, folder_id: &FolderId) -> Result<()> {
        let request = self
            .transport
            .request(Method::DELETE, PATH_DELETE_FOLDER, Some(token))
            .json(&FolderIdBody { folder_id });
        self.transport.send_empty("delete_folder", request).await
    }

    async fn delete_all_folders(&self, token: &AccessToken) -> Result<()> {
        let request = self
            .transport
            .request(Method::DELETE, PATH_DELETE_ALL_FOLDERS, Some(token));
        self.transport.send_empty("delete_all_folders", request).await
    }

    async fn list_unfiled_notes(&self, token: &AccessToken) -> Result<Vec<Note>> {
        let request = self
            .transport
            .request(Method::GET, PATH_LIST_UNFILED_NOTES, Some(token));
        self.transport.send_json("list_unfiled_notes", request).await
    }

    async fn list_folder_notes(
        &self,
        token: &AccessToken,
        folder_id: &FolderId,
    ) -> Result<Vec<Note>> {
        let path = with_segment(PATH_LIST_FOLDER_NOTES, folder_id.as_str());
        let request = self.transport.request(Method::GET, &path, Some(token));
        self.transport.send_json("list_folder_notes", request).await
    }

    async fn create_note(&self, token: &AccessToken, draft: &NoteDraft) -> Result<Note> {
        let request = self
            .transport
            .request(Method::POST, PATH_CREATE_NOTE, Some(token))
            .json(draft);
        self.transport.send_json("create_note", request).await
    }

    async fn update_title(
        &self,
        token: &AccessToken,
        note_id: &NoteId,
        title: &str,
    ) -> Result<()> {
        let request = self
            .transport
            .request(Method::PUT, PATH_UPDATE_TITLE, Some(token))
            .json(&TitleBody {
                note_id,
                new_title: title,
            });
        self.transport.send_empty("update_title", request).await
    }

    async fn update_content(
        &self,
        token: &AccessToken,
        note_id: &NoteId,
        content: &str,
    ) -> Result<()> {
        let request = self
            .transport
            .request(Method::PUT, PATH_UPDATE_CONTENT, Some(token))
            .json(&ContentBody {
                note_id,
                new_content: content,
            });
        self.transport.send_empty("update_content", request).await
    }

    async fn delete_note(&self, token: &AccessToken, note_id: &NoteId) -> Result<()> {
        let request = self
            .transport
            .request(Method::DELETE, PATH_DELETE_NOTE, Some(token))
            .json(&NoteIdBody { note_id });
        self.transport.send_empty("delete_note", request).await
    }

    async fn toggle_favorite(&self, token: &AccessToken, note_id: &NoteId) -> Result<()> {
        let path = with_segment(PATH_TOGGLE_FAVORITE, note_id.as_str());
        let request = self
            .transport
            .request(Method::POST, &path, Some(token))
            .json(&serde_json::json!({}));
        self.transport.send_empty("toggle_favorite", request).await
    }

    async fn list_favorites(&self, token: &AccessToken) -> Result<Vec<Note>> {
        let request = self
            .transport
            .request(Method::GET, PATH_LIST_FAVORITES, Some(token));
        self.transport.send_json("list_favorites", request).await
    }
}
