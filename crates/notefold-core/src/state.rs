//! Owned session state and its transitions.
//!
//! Every change to the in-memory notes goes through [`SessionState::apply`],
//! which swaps whole notes in one step so siblings never observe a half
//! applied mutation.
//!
//! While a refresh is reading the remote service, every local change is
//! recorded against it so the snapshot it publishes cannot undo that change.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Folder, FolderId, Note, NoteId};

/// De-duplicated, insertion-ordered note collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    /// Build from listings, keeping the first occurrence of each id.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut seen = HashSet::new();
        let notes = notes
            .into_iter()
            .filter(|note| seen.insert(note.id.clone()))
            .collect();
        Self { notes }
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.get(id).is_some()
    }

    /// Append unless the id is already present. Returns whether it was added.
    fn insert(&mut self, note: Note) -> bool {
        if self.contains(&note.id) {
            return false;
        }
        self.notes.push(note);
        true
    }

    fn remove(&mut self, id: &NoteId) -> Option<Note> {
        let index = self.notes.iter().position(|note| &note.id == id)?;
        Some(self.notes.remove(index))
    }

    /// Apply `patch` to one note and return the patch that undoes it.
    fn patch(&mut self, id: &NoteId, patch: &NotePatch) -> Option<NotePatch> {
        let slot = self.notes.iter_mut().find(|note| &note.id == id)?;
        let (updated, inverse) = patch.apply_to(slot);
        *slot = updated;
        Some(inverse)
    }
}

/// Local delta over a note's mutable fields.
///
/// Content fields are absolute. The favorite flag is a relative flip, so the
/// inverse of a flip is another flip whatever else happened in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub flip_favorite: bool,
}

impl NotePatch {
    #[must_use]
    pub const fn flip_favorite() -> Self {
        Self {
            title: None,
            description: None,
            flip_favorite: true,
        }
    }

    #[must_use]
    pub const fn content(title: Option<String>, description: Option<String>) -> Self {
        Self {
            title,
            description,
            flip_favorite: false,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && !self.flip_favorite
    }

    /// Return the patched copy of `note` and the exact inverse delta.
    #[must_use]
    pub fn apply_to(&self, note: &Note) -> (Note, Self) {
        let mut updated = note.clone();
        let mut inverse = Self::default();

        if let Some(title) = &self.title {
            inverse.title = Some(std::mem::replace(&mut updated.title, title.clone()));
        }
        if let Some(description) = &self.description {
            inverse.description = Some(std::mem::replace(
                &mut updated.description,
                description.clone(),
            ));
        }
        if self.flip_favorite {
            updated.is_favorite = !updated.is_favorite;
            inverse.flip_favorite = true;
        }

        (updated, inverse)
    }
}

/// State transitions, one per session operation.
#[derive(Debug, Clone)]
pub enum Transition {
    /// A complete aggregation result replaces everything.
    Refreshed { folders: Vec<Folder>, notes: Vec<Note> },
    NoteCreated(Note),
    NotePatched { id: NoteId, patch: NotePatch },
    NoteDeleted(NoteId),
    FolderCreated(Folder),
    FoldersReplaced(Vec<Folder>),
}

/// What a refresh must take from local state instead of its snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalChanges {
    notes: HashSet<NoteId>,
    folders: bool,
}

impl LocalChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && !self.folders
    }

    fn record(&mut self, transition: &Transition) {
        match transition {
            Transition::Refreshed { .. } => {}
            Transition::NoteCreated(note) => {
                self.notes.insert(note.id.clone());
            }
            Transition::NotePatched { id, .. } | Transition::NoteDeleted(id) => {
                self.notes.insert(id.clone());
            }
            Transition::FolderCreated(_) | Transition::FoldersReplaced(_) => self.folders = true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible notification produced by a session operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Everything a note screen displays.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    notes: NoteCollection,
    folders: Vec<Folder>,
    notices: Vec<Notice>,
    last_refreshed_at: Option<DateTime<Utc>>,
    open_refreshes: HashMap<u64, LocalChanges>,
    pending: HashMap<NoteId, usize>,
}

impl SessionState {
    pub const fn notes(&self) -> &NoteCollection {
        &self.notes
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.iter().find(|folder| &folder.id == id)
    }

    pub const fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed_at
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Start recording local changes for the refresh tagged `epoch`.
    pub fn open_refresh(&mut self, epoch: u64) {
        self.open_refreshes.insert(epoch, LocalChanges::default());
    }

    /// Stop recording for `epoch` and return what changed meanwhile.
    pub fn close_refresh(&mut self, epoch: u64) -> Option<LocalChanges> {
        self.open_refreshes.remove(&epoch)
    }

    pub fn begin_pending(&mut self, id: &NoteId) {
        *self.pending.entry(id.clone()).or_default() += 1;
    }

    pub fn end_pending(&mut self, id: &NoteId) {
        if let Some(count) = self.pending.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(id);
            }
        }
    }

    /// Note ids with an optimistic change still waiting on the remote.
    #[must_use]
    pub fn pending_notes(&self) -> impl Iterator<Item = &NoteId> {
        self.pending.keys()
    }

    /// Replace notes and folders with a refresh result.
    ///
    /// Notes changed locally since the refresh opened, or still pending, keep
    /// their local version (or stay deleted). Folders keep the local list if
    /// it changed. Returns the published note and folder counts.
    pub fn publish_refresh(
        &mut self,
        changes: &LocalChanges,
        folders: Vec<Folder>,
        notes: Vec<Note>,
    ) -> (usize, usize) {
        let mut local_ids = changes.notes.clone();
        local_ids.extend(self.pending.keys().cloned());

        let folders = if changes.folders {
            self.folders.clone()
        } else {
            folders
        };
        let mut merged = NoteCollection::from_notes(notes.into_iter().filter_map(|note| {
            if local_ids.contains(&note.id) {
                self.notes.get(&note.id).cloned()
            } else {
                Some(note)
            }
        }));
        for note in self.notes.as_slice() {
            if local_ids.contains(&note.id) {
                merged.insert(note.clone());
            }
        }
        if !local_ids.is_empty() {
            tracing::debug!(kept = local_ids.len(), "Kept local notes over refresh snapshot");
        }

        let counts = (merged.len(), folders.len());
        self.apply(Transition::Refreshed {
            folders,
            notes: merged.notes,
        });
        counts
    }

    /// Apply one transition.
    ///
    /// For `NotePatched` the inverse delta is returned; `None` means the note
    /// was not present and nothing changed.
    pub fn apply(&mut self, transition: Transition) -> Option<NotePatch> {
        let recorded = match &transition {
            Transition::NotePatched { id, .. } => self.notes.contains(id),
            _ => true,
        };
        if recorded {
            for changes in self.open_refreshes.values_mut() {
                changes.record(&transition);
            }
        }

        match transition {
            Transition::Refreshed { folders, notes } => {
                self.folders = folders;
                self.notes = NoteCollection::from_notes(notes);
                self.last_refreshed_at = Some(Utc::now());
                None
            }
            Transition::NoteCreated(note) => {
                if !self.notes.insert(note) {
                    tracing::debug!("Created note already present locally");
                }
                None
            }
            Transition::NotePatched { id, patch } => self.notes.patch(&id, &patch),
            Transition::NoteDeleted(id) => {
                self.notes.remove(&id);
                None
            }
            Transition::FolderCreated(folder) => {
                if self.folder(&folder.id).is_none() {
                    self.folders.push(folder);
                }
                None
            }
            Transition::FoldersReplaced(folders) => {
                self.folders = folders;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Priority;

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: NoteId::new(id),
            title: title.to_string(),
            description: format!("{title} body"),
            folder_id: None,
            priority: Priority::Low,
            is_favorite: false,
        }
    }

    #[test]
    fn from_notes_keeps_first_occurrence() {
        let collection = NoteCollection::from_notes(vec![
            note("a", "first"),
            note("b", "other"),
            note("a", "duplicate"),
        ]);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(&NoteId::new("a")).unwrap().title, "first");
    }

    #[test]
    fn patch_then_inverse_restores_original() {
        let original = note("a", "Title");
        let patch = NotePatch {
            title: Some("New".to_string()),
            description: None,
            flip_favorite: true,
        };
        let (patched, inverse) = patch.apply_to(&original);
        assert_eq!(patched.title, "New");
        assert!(patched.is_favorite);
        assert_eq!(patched.description, original.description);

        let (restored, _) = inverse.apply_to(&patched);
        assert_eq!(restored, original);
    }

    #[test]
    fn patched_transition_on_missing_note_is_noop() {
        let mut state = SessionState::default();
        state.apply(Transition::Refreshed {
            folders: vec![],
            notes: vec![note("a", "A")],
        });
        let inverse = state.apply(Transition::NotePatched {
            id: NoteId::new("missing"),
            patch: NotePatch::flip_favorite(),
        });
        assert!(inverse.is_none());
        assert_eq!(state.notes().as_slice(), &[note("a", "A")]);
    }

    #[test]
    fn created_note_is_not_duplicated() {
        let mut state = SessionState::default();
        state.apply(Transition::NoteCreated(note("a", "A")));
        state.apply(Transition::NoteCreated(note("a", "A again")));
        assert_eq!(state.notes().len(), 1);
    }

    #[test]
    fn refresh_replaces_folders_and_notes() {
        let mut state = SessionState::default();
        state.apply(Transition::NoteCreated(note("old", "Old")));
        state.apply(Transition::Refreshed {
            folders: vec![Folder::new("f1", "Work")],
            notes: vec![note("new", "New")],
        });
        assert_eq!(state.folders().len(), 1);
        assert!(!state.notes().contains(&NoteId::new("old")));
        assert!(state.last_refreshed_at().is_some());
    }

    #[test]
    fn deleted_note_is_removed() {
        let mut state = SessionState::default();
        state.apply(Transition::NoteCreated(note("a", "A")));
        state.apply(Transition::NoteDeleted(NoteId::new("a")));
        assert!(state.notes().is_empty());
    }

    #[test]
    fn overlapping_flips_undo_independently() {
        let mut state = SessionState::default();
        state.apply(Transition::NoteCreated(note("a", "A")));
        let id = NoteId::new("a");
        let flip = || Transition::NotePatched {
            id: NoteId::new("a"),
            patch: NotePatch::flip_favorite(),
        };

        let first = state.apply(flip()).unwrap();
        let second = state.apply(flip()).unwrap();
        state.apply(Transition::NotePatched {
            id: id.clone(),
            patch: first,
        });
        assert!(state.notes().get(&id).unwrap().is_favorite);
        state.apply(Transition::NotePatched {
            id: id.clone(),
            patch: second,
        });
        assert!(!state.notes().get(&id).unwrap().is_favorite);
    }

    #[test]
    fn refresh_keeps_notes_changed_while_it_was_open() {
        let mut state = SessionState::default();
        state.apply(Transition::Refreshed {
            folders: vec![],
            notes: vec![note("a", "A"), note("b", "B"), note("c", "C")],
        });
        state.open_refresh(7);
        state.apply(Transition::NoteDeleted(NoteId::new("b")));
        state.apply(Transition::NotePatched {
            id: NoteId::new("c"),
            patch: NotePatch::content(Some("Edited".to_string()), None),
        });
        state.apply(Transition::NoteCreated(note("d", "D")));
        state.apply(Transition::FolderCreated(Folder::new("f1", "Work")));

        let changes = state.close_refresh(7).unwrap();
        let counts = state.publish_refresh(
            &changes,
            vec![],
            vec![note("a", "A2"), note("b", "B"), note("c", "C")],
        );

        assert_eq!(counts, (3, 1));
        let titles = state
            .notes()
            .as_slice()
            .iter()
            .map(|note| note.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["A2", "Edited", "D"]);
        assert_eq!(state.folders().len(), 1);
    }

    #[test]
    fn refresh_keeps_pending_optimistic_value() {
        let mut state = SessionState::default();
        state.apply(Transition::NoteCreated(note("a", "A")));
        let id = NoteId::new("a");
        state.apply(Transition::NotePatched {
            id: id.clone(),
            patch: NotePatch::flip_favorite(),
        });
        state.begin_pending(&id);

        state.open_refresh(1);
        let changes = state.close_refresh(1).unwrap();
        assert!(changes.is_empty());
        state.publish_refresh(&changes, vec![], vec![note("a", "A")]);
        assert!(state.notes().get(&id).unwrap().is_favorite);

        state.end_pending(&id);
        assert_eq!(state.pending_notes().count(), 0);
    }

    #[test]
    fn take_notices_drains_queue() {
        let mut state = SessionState::default();
        state.push_notice(Notice::error("boom"));
        assert_eq!(state.take_notices().len(), 1);
        assert!(state.notices().is_empty());
    }
}
