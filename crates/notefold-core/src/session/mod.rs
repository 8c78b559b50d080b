//! Note session: the in-memory notes of one screen visit and every
//! operation that reads or changes them.
//!
//! A [`NoteSession`] owns a [`SessionState`] behind a short-lived lock. Remote
//! calls never run under the lock; results are folded in afterwards as one
//! [`Transition`]. Failures become a [`Notice`] plus a `warn!` and are
//! returned to the caller, leaving the notes as they were before the call.
//!
//! Refreshes and mutations may interleave freely. A refresh publishes its
//! snapshot with every note changed locally since it started carried over,
//! so a stale read never undoes a committed or pending mutation.

mod aggregate;
mod refresh;

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::auth::{require_token, AccessToken, CredentialStore};
use crate::models::{Folder, FolderId, Note, NoteDraft, NoteEdit, NoteId};
use crate::remote::NoteService;
use crate::state::{Notice, NotePatch, SessionState, Transition};
use crate::view::{self, GroupedView};
use crate::{Error, Result};

pub use aggregate::{fetch_snapshot, merge_listings, Snapshot};
pub use refresh::{FocusOutcome, RefreshController, RefreshPhase, RefreshTarget};

/// What happened to a completed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot replaced the session's notes and folders.
    Applied { notes: usize, folders: usize },
    /// A newer refresh started after this one; this result was dropped.
    Stale,
    /// The session was unmounted while the refresh was in flight.
    Unmounted,
}

/// Session over one remote note service and credential store.
///
/// Clones share the same state.
pub struct NoteSession<S, C> {
    service: Arc<S>,
    store: C,
    state: Arc<Mutex<SessionState>>,
    refresh_epoch: Arc<AtomicU64>,
    mounted: Arc<AtomicBool>,
}

impl<S, C: Clone> Clone for NoteSession<S, C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            store: self.store.clone(),
            state: Arc::clone(&self.state),
            refresh_epoch: Arc::clone(&self.refresh_epoch),
            mounted: Arc::clone(&self.mounted),
        }
    }
}

impl<S, C> NoteSession<S, C>
where
    S: NoteService,
    C: CredentialStore,
{
    pub fn new(service: S, store: C) -> Self {
        Self::from_shared(Arc::new(service), store)
    }

    pub fn from_shared(service: Arc<S>, store: C) -> Self {
        Self {
            service,
            store,
            state: Arc::new(Mutex::new(SessionState::default())),
            refresh_epoch: Arc::new(AtomicU64::new(0)),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub const fn store(&self) -> &C {
        &self.store
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn mount(&self) {
        self.mounted.store(true, Ordering::SeqCst);
    }

    /// Drop the visit's state and ignore every in-flight resolution.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.refresh_epoch.fetch_add(1, Ordering::SeqCst);
        *self.lock_state() = SessionState::default();
        tracing::debug!("Note session unmounted");
    }

    pub fn notes(&self) -> Vec<Note> {
        self.lock_state().notes().as_slice().to_vec()
    }

    pub fn folders(&self) -> Vec<Folder> {
        self.lock_state().folders().to_vec()
    }

    pub fn note(&self, id: &NoteId) -> Option<Note> {
        self.lock_state().notes().get(id).cloned()
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.lock_state().last_refreshed_at()
    }

    pub fn grouped_view(&self) -> GroupedView {
        let state = self.lock_state();
        view::project(state.notes().as_slice(), state.folders())
    }

    /// Favorites filtered from the aggregated collection.
    pub fn favorites_view(&self) -> Vec<Note> {
        view::favorites(self.lock_state().notes().as_slice())
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.lock_state().take_notices()
    }

    /// Re-read everything from the remote service.
    ///
    /// Only the most recently started refresh may publish; an older one that
    /// resolves later is discarded, successful or not.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        const ACTION: &str = "load notes";

        let token = self.token(ACTION)?;
        let window = self.begin_refresh();
        let result = fetch_snapshot(self.service.as_ref(), &token).await;

        if let Some(outcome) = self.discard_reason(window.epoch) {
            tracing::debug!(epoch = window.epoch, ?outcome, "Discarding refresh result");
            return Ok(outcome);
        }
        let snapshot = self.report(ACTION, result)?;
        Ok(self.publish_snapshot(&window, snapshot))
    }

    /// Create a note remotely and append the stored note on success.
    pub async fn create_note(&self, draft: NoteDraft) -> Result<Note> {
        const ACTION: &str = "create the note";

        let draft = self.report(ACTION, validate_draft(draft))?;
        let token = self.token(ACTION)?;
        let result = self.service.create_note(&token, &draft).await;
        let note = self.report(ACTION, result)?;

        self.commit(Transition::NoteCreated(note.clone()));
        tracing::info!(note_id = %note.id, "Created note");
        Ok(note)
    }

    /// Send changed fields (title first, then content) and commit locally
    /// once every call succeeded.
    pub async fn update_note(&self, id: &NoteId, edit: NoteEdit) -> Result<Note> {
        const ACTION: &str = "update the note";

        let token = self.token(ACTION)?;
        let current = self.report(ACTION, self.require_note(id))?;
        let changes = edit.changes_against(&current);
        if changes.is_empty() {
            return Ok(current);
        }
        if changes.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return self.report(
                ACTION,
                Err(Error::InvalidInput("note title is required".to_string())),
            );
        }

        let result = self.send_edit(&token, id, &changes).await;
        self.report(ACTION, result)?;

        let patch = NotePatch::content(changes.title, changes.description);
        let (updated, _) = patch.apply_to(&current);
        self.commit(Transition::NotePatched {
            id: id.clone(),
            patch,
        });
        tracing::info!(note_id = %id, "Updated note");
        Ok(updated)
    }

    /// Flip the favorite flag locally, then remotely; flips back on failure.
    ///
    /// Overlapping toggles on one note each undo only their own flip, so the
    /// local flag ends equal to the remote one. Returns the flag value right
    /// after this call's flip.
    pub async fn toggle_favorite(&self, id: &NoteId) -> Result<bool> {
        const ACTION: &str = "update the favorite";

        let token = self.token(ACTION)?;
        let flipped = self
            .optimistic(ACTION, id, NotePatch::flip_favorite(), || {
                self.service.toggle_favorite(&token, id)
            })
            .await?;
        Ok(flipped.is_favorite)
    }

    /// Delete remotely first; the local note goes only on success.
    pub async fn delete_note(&self, id: &NoteId) -> Result<()> {
        const ACTION: &str = "delete the note";

        let token = self.token(ACTION)?;
        let result = self.service.delete_note(&token, id).await;
        self.report(ACTION, result)?;

        self.commit(Transition::NoteDeleted(id.clone()));
        tracing::info!(note_id = %id, "Deleted note");
        Ok(())
    }

    /// Favorites from the dedicated remote listing.
    ///
    /// Independent of the aggregated collection, which is left untouched.
    pub async fn load_favorites(&self) -> Result<Vec<Note>> {
        const ACTION: &str = "load favorites";

        let token = self.token(ACTION)?;
        let result = self.service.list_favorites(&token).await;
        let notes = self.report(ACTION, result)?;
        Ok(notes.into_iter().filter(|note| note.is_favorite).collect())
    }

    pub async fn create_folder(&self, name: &str) -> Result<Folder> {
        const ACTION: &str = "create the folder";

        let name = name.trim();
        if name.is_empty() {
            return self.report(
                ACTION,
                Err(Error::InvalidInput("folder name is required".to_string())),
            );
        }
        let token = self.token(ACTION)?;
        let result = self.service.create_folder(&token, name).await;
        let folder = self.report(ACTION, result)?;

        self.commit(Transition::FolderCreated(folder.clone()));
        tracing::info!(folder_id = %folder.id, "Created folder");
        Ok(folder)
    }

    pub async fn delete_folder(&self, id: &FolderId) -> Result<()> {
        const ACTION: &str = "delete the folder";

        let token = self.token(ACTION)?;
        let result = self.service.delete_folder(&token, id).await;
        self.report(ACTION, result)?;
        tracing::info!(folder_id = %id, "Deleted folder");
        self.reload_folders(&token).await
    }

    pub async fn delete_all_folders(&self) -> Result<()> {
        const ACTION: &str = "delete folders";

        let token = self.token(ACTION)?;
        let result = self.service.delete_all_folders(&token).await;
        self.report(ACTION, result)?;
        tracing::info!("Deleted all folders");
        self.reload_folders(&token).await
    }

    async fn reload_folders(&self, token: &AccessToken) -> Result<()> {
        let result = self.service.list_folders(token).await;
        let folders = self.report("reload folders", result)?;
        self.commit(Transition::FoldersReplaced(folders));
        Ok(())
    }

    async fn send_edit(&self, token: &AccessToken, id: &NoteId, changes: &NoteEdit) -> Result<()> {
        if let Some(title) = &changes.title {
            self.service.update_title(token, id, title).await?;
        }
        if let Some(description) = &changes.description {
            self.service.update_content(token, id, description).await?;
        }
        Ok(())
    }

    /// Apply `patch`, run `remote`, and apply the inverse if it fails.
    ///
    /// Returns the note as patched locally. The note counts as pending until
    /// `remote` settles.
    async fn optimistic<F, Fut>(
        &self,
        action: &str,
        id: &NoteId,
        patch: NotePatch,
        remote: F,
    ) -> Result<Note>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let Some((inverse, patched)) = self.begin_optimistic(id, patch) else {
            return self.report(action, Err(Error::NotFound(format!("note {id}"))));
        };

        let result = remote().await;
        self.lock_state().end_pending(id);
        match result {
            Ok(()) => Ok(patched),
            Err(error) => {
                self.commit(Transition::NotePatched {
                    id: id.clone(),
                    patch: inverse,
                });
                self.report(action, Err(error))
            }
        }
    }

    fn begin_optimistic(&self, id: &NoteId, patch: NotePatch) -> Option<(NotePatch, Note)> {
        if !self.is_mounted() {
            return None;
        }
        let mut state = self.lock_state();
        let inverse = state.apply(Transition::NotePatched {
            id: id.clone(),
            patch,
        })?;
        let patched = state.notes().get(id).cloned()?;
        state.begin_pending(id);
        Some((inverse, patched))
    }

    fn begin_refresh(&self) -> RefreshWindow {
        let epoch = self.refresh_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_state().open_refresh(epoch);
        RefreshWindow {
            epoch,
            state: Arc::clone(&self.state),
        }
    }

    fn discard_reason(&self, epoch: u64) -> Option<RefreshOutcome> {
        if !self.is_mounted() {
            Some(RefreshOutcome::Unmounted)
        } else if self.refresh_epoch.load(Ordering::SeqCst) != epoch {
            Some(RefreshOutcome::Stale)
        } else {
            None
        }
    }

    fn publish_snapshot(&self, window: &RefreshWindow, snapshot: Snapshot) -> RefreshOutcome {
        let mut state = self.lock_state();
        // Re-check under the lock so two resolutions cannot both publish.
        if let Some(outcome) = self.discard_reason(window.epoch) {
            return outcome;
        }
        let changes = state.close_refresh(window.epoch).unwrap_or_default();

        let (notes, folders) = state.publish_refresh(&changes, snapshot.folders, snapshot.notes);
        let outcome = RefreshOutcome::Applied { notes, folders };
        tracing::info!(?outcome, "Published refreshed notes");
        outcome
    }

    /// Apply a transition unless the session was unmounted meanwhile.
    fn commit(&self, transition: Transition) -> Option<NotePatch> {
        if !self.is_mounted() {
            tracing::debug!("Ignoring transition on unmounted session");
            return None;
        }
        self.lock_state().apply(transition)
    }

    fn token(&self, action: &str) -> Result<AccessToken> {
        self.report(action, require_token(&self.store))
    }

    fn require_note(&self, id: &NoteId) -> Result<Note> {
        self.note(id)
            .ok_or_else(|| Error::NotFound(format!("note {id}")))
    }

    fn report<T>(&self, action: &str, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            tracing::warn!(action, error = %error, "Note operation failed");
            if self.is_mounted() {
                self.lock_state()
                    .push_notice(Notice::error(format!("Could not {action}: {error}")));
            }
        }
        result
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Local changes are recorded against a refresh while this is alive.
struct RefreshWindow {
    epoch: u64,
    state: Arc<Mutex<SessionState>>,
}

impl Drop for RefreshWindow {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .close_refresh(self.epoch);
    }
}

fn validate_draft(mut draft: NoteDraft) -> Result<NoteDraft> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("note title is required".to_string()));
    }
    draft.title = title.to_string();
    Ok(draft)
}
