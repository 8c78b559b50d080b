//! In-process `NoteService` double for session tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::auth::AccessToken;
use crate::models::{Folder, FolderId, Note, NoteDraft, NoteId, Priority};
use crate::remote::NoteService;
use crate::{Error, Result};

pub fn note(id: &str, folder: Option<&str>) -> Note {
    note_with_priority(id, folder, Priority::Low)
}

pub fn note_with_priority(id: &str, folder: Option<&str>, priority: Priority) -> Note {
    Note {
        id: NoteId::new(id),
        title: format!("Title {id}"),
        description: format!("Body {id}"),
        folder_id: folder.map(FolderId::new),
        priority,
        is_favorite: false,
    }
}

#[derive(Default)]
struct FakeData {
    folders: Vec<Folder>,
    unfiled: Vec<Note>,
    by_folder: HashMap<FolderId, Vec<Note>>,
    favorites_listing: Option<Vec<Note>>,
    failures: HashMap<String, u16>,
    holds: HashMap<String, Arc<Semaphore>>,
    arrivals: Vec<String>,
    calls: Vec<String>,
    next_id: u32,
}

impl FakeData {
    fn all_notes_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.unfiled
            .iter_mut()
            .chain(self.by_folder.values_mut().flatten())
    }
}

/// Records every call as `operation` or `operation:<id>` and fails calls
/// whose key (or bare operation name) was registered with [`Self::failing`].
///
/// [`Self::hold`] parks an operation on a semaphore: listings park after
/// reading their data, `toggle_favorite` parks before touching it.
#[derive(Clone, Default)]
pub struct FakeNoteService {
    data: Arc<Mutex<FakeData>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeNoteService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(self, folder: Folder, notes: Vec<Note>) -> Self {
        {
            let mut data = self.data();
            data.by_folder.insert(folder.id.clone(), notes);
            data.folders.push(folder);
        }
        self
    }

    pub fn with_unfiled(self, notes: Vec<Note>) -> Self {
        self.data().unfiled = notes;
        self
    }

    /// Serve this exact list from `list_favorites` instead of deriving it.
    pub fn with_favorites_listing(self, notes: Vec<Note>) -> Self {
        self.data().favorites_listing = Some(notes);
        self
    }

    pub fn failing(self, key: &str, status: u16) -> Self {
        self.fail(key, status);
        self
    }

    /// Block every `list_folders` call until a permit is added to `gate`.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Park every later `operation` call until a permit is added to `gate`.
    pub fn hold(&self, operation: &str, gate: Arc<Semaphore>) {
        self.data().holds.insert(operation.to_string(), gate);
    }

    pub fn release_hold(&self, operation: &str) {
        self.data().holds.remove(operation);
    }

    /// Number of `operation` calls that reached their hold point.
    pub fn arrivals(&self, operation: &str) -> usize {
        self.data()
            .arrivals
            .iter()
            .filter(|arrived| arrived.as_str() == operation)
            .count()
    }

    pub fn add_unfiled(&self, note: Note) {
        self.data().unfiled.push(note);
    }

    pub fn fail(&self, key: &str, status: u16) {
        self.data().failures.insert(key.to_string(), status);
    }

    pub fn clear_failures(&self) {
        self.data().failures.clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.data().calls.clone()
    }

    /// Number of recorded calls to `operation`, regardless of target id.
    pub fn call_count(&self, operation: &str) -> usize {
        self.data()
            .calls
            .iter()
            .filter(|call| call.split(':').next() == Some(operation))
            .count()
    }

    pub fn remote_note(&self, id: &str) -> Option<Note> {
        let mut data = self.data();
        let id = NoteId::new(id);
        let found = data.all_notes_mut().find(|note| note.id == id).cloned();
        found
    }

    fn data(&self) -> MutexGuard<'_, FakeData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn pause(&self, operation: &str) -> Result<()> {
        let gate = {
            let mut data = self.data();
            data.arrivals.push(operation.to_string());
            data.holds.get(operation).cloned()
        };
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|error| Error::Config(error.to_string()))?
                .forget();
        }
        Ok(())
    }

    fn record(&self, operation: &str, target: Option<&str>) -> Result<()> {
        let key = target.map_or_else(|| operation.to_string(), |id| format!("{operation}:{id}"));
        let mut data = self.data();
        data.calls.push(key.clone());
        let status = data
            .failures
            .get(&key)
            .or_else(|| data.failures.get(operation))
            .copied();
        match status {
            Some(401 | 403) => Err(Error::Auth("rejected by fake service".to_string())),
            Some(status) => Err(Error::Api {
                status,
                message: format!("{key} failed"),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NoteService for FakeNoteService {
    async fn list_folders(&self, _token: &AccessToken) -> Result<Vec<Folder>> {
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|error| Error::Config(error.to_string()))?
                .forget();
        }
        self.record("list_folders", None)?;
        Ok(self.data().folders.clone())
    }

    async fn create_folder(&self, _token: &AccessToken, name: &str) -> Result<Folder> {
        self.record("create_folder", None)?;
        let mut data = self.data();
        data.next_id += 1;
        let folder = Folder::new(format!("folder-{}", data.next_id), name);
        data.by_folder.insert(folder.id.clone(), Vec::new());
        data.folders.push(folder.clone());
        Ok(folder)
    }

    async fn delete_folder(&self, _token: &AccessToken, folder_id: &FolderId) -> Result<()> {
        self.record("delete_folder", Some(folder_id.as_str()))?;
        let mut data = self.data();
        data.folders.retain(|folder| &folder.id != folder_id);
        data.by_folder.remove(folder_id);
        Ok(())
    }

    async fn delete_all_folders(&self, _token: &AccessToken) -> Result<()> {
        self.record("delete_all_folders", None)?;
        let mut data = self.data();
        data.folders.clear();
        data.by_folder.clear();
        Ok(())
    }

    async fn list_unfiled_notes(&self, _token: &AccessToken) -> Result<Vec<Note>> {
        self.record("list_unfiled_notes", None)?;
        let notes = self.data().unfiled.clone();
        self.pause("list_unfiled_notes").await?;
        Ok(notes)
    }

    async fn list_folder_notes(
        &self,
        _token: &AccessToken,
        folder_id: &FolderId,
    ) -> Result<Vec<Note>> {
        self.record("list_folder_notes", Some(folder_id.as_str()))?;
        let notes = self
            .data()
            .by_folder
            .get(folder_id)
            .cloned()
            .unwrap_or_default();
        self.pause("list_folder_notes").await?;
        Ok(notes)
    }

    async fn create_note(&self, _token: &AccessToken, draft: &NoteDraft) -> Result<Note> {
        self.record("create_note", None)?;
        let mut data = self.data();
        data.next_id += 1;
        let note = Note {
            id: NoteId::new(format!("note-{}", data.next_id)),
            title: draft.title.clone(),
            description: draft.description.clone(),
            folder_id: draft.folder_id.clone(),
            priority: draft.priority,
            is_favorite: false,
        };
        match &note.folder_id {
            Some(folder_id) => data
                .by_folder
                .entry(folder_id.clone())
                .or_default()
                .push(note.clone()),
            None => data.unfiled.push(note.clone()),
        }
        Ok(note)
    }

    async fn update_title(
        &self,
        _token: &AccessToken,
        note_id: &NoteId,
        title: &str,
    ) -> Result<()> {
        self.record("update_title", Some(note_id.as_str()))?;
        if let Some(note) = self.data().all_notes_mut().find(|note| &note.id == note_id) {
            note.title = title.to_string();
        }
        Ok(())
    }

    async fn update_content(
        &self,
        _token: &AccessToken,
        note_id: &NoteId,
        content: &str,
    ) -> Result<()> {
        self.record("update_content", Some(note_id.as_str()))?;
        if let Some(note) = self.data().all_notes_mut().find(|note| &note.id == note_id) {
            note.description = content.to_string();
        }
        Ok(())
    }

    async fn delete_note(&self, _token: &AccessToken, note_id: &NoteId) -> Result<()> {
        self.record("delete_note", Some(note_id.as_str()))?;
        let mut data = self.data();
        data.unfiled.retain(|note| &note.id != note_id);
        for notes in data.by_folder.values_mut() {
            notes.retain(|note| &note.id != note_id);
        }
        Ok(())
    }

    async fn toggle_favorite(&self, _token: &AccessToken, note_id: &NoteId) -> Result<()> {
        self.pause("toggle_favorite").await?;
        self.record("toggle_favorite", Some(note_id.as_str()))?;
        if let Some(note) = self.data().all_notes_mut().find(|note| &note.id == note_id) {
            note.is_favorite = !note.is_favorite;
        }
        Ok(())
    }

    async fn list_favorites(&self, _token: &AccessToken) -> Result<Vec<Note>> {
        self.record("list_favorites", None)?;
        let mut data = self.data();
        if let Some(listing) = &data.favorites_listing {
            return Ok(listing.clone());
        }
        let favorites = data
            .all_notes_mut()
            .filter(|note| note.is_favorite)
            .map(|note| note.clone())
            .collect();
        Ok(favorites)
    }
}
