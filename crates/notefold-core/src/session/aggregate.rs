//! Aggregation of the remote note listings into one collection.

use futures::future::try_join_all;

use crate::auth::AccessToken;
use crate::models::{Folder, Note};
use crate::remote::NoteService;
use crate::state::NoteCollection;
use crate::Result;

/// One complete, consistent read of folders and notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub folders: Vec<Folder>,
    pub notes: Vec<Note>,
}

/// Fetch folders, then unfiled and per-folder notes concurrently.
///
/// Any failed listing fails the whole read; nothing partial is returned.
pub async fn fetch_snapshot<S>(service: &S, token: &AccessToken) -> Result<Snapshot>
where
    S: NoteService + ?Sized,
{
    let folders = service.list_folders(token).await?;

    let unfiled = service.list_unfiled_notes(token);
    let per_folder = try_join_all(
        folders
            .iter()
            .map(|folder| service.list_folder_notes(token, &folder.id)),
    );
    let (unfiled, per_folder) = futures::try_join!(unfiled, per_folder)?;

    let notes = merge_listings(std::iter::once(unfiled).chain(per_folder));
    tracing::debug!(
        folders = folders.len(),
        notes = notes.len(),
        "Fetched notes snapshot"
    );
    Ok(Snapshot { folders, notes })
}

/// Concatenate listings in order, dropping repeated note ids.
pub fn merge_listings(listings: impl IntoIterator<Item = Vec<Note>>) -> Vec<Note> {
    let merged = NoteCollection::from_notes(listings.into_iter().flatten());
    merged.as_slice().to_vec()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{FolderId, NoteId};
    use crate::testing::{note, FakeNoteService};

    fn token() -> AccessToken {
        AccessToken::new("token").unwrap()
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|note| note.id.as_str()).collect()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn snapshot_merges_unfiled_then_folders_in_order() {
        let service = FakeNoteService::new()
            .with_folder(Folder::new("f1", "Work"), vec![note("n1", Some("f1"))])
            .with_folder(Folder::new("f2", "Home"), vec![note("n2", Some("f2"))])
            .with_unfiled(vec![note("n0", None)]);

        let snapshot = fetch_snapshot(&service, &token()).await.unwrap();

        assert_eq!(snapshot.folders.len(), 2);
        assert_eq!(ids(&snapshot.notes), vec!["n0", "n1", "n2"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn duplicate_note_across_listings_appears_once() {
        let shared = note("dup", Some("f1"));
        let service = FakeNoteService::new()
            .with_unfiled(vec![shared.clone(), note("n1", None)])
            .with_folder(Folder::new("f1", "Work"), vec![shared, note("n2", Some("f1"))]);

        let snapshot = fetch_snapshot(&service, &token()).await.unwrap();

        assert_eq!(ids(&snapshot.notes), vec!["dup", "n1", "n2"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_folder_listing_fails_snapshot() {
        let service = FakeNoteService::new()
            .with_folder(Folder::new("f1", "A"), vec![note("a", Some("f1"))])
            .with_folder(Folder::new("f2", "B"), vec![note("b", Some("f2"))])
            .with_folder(Folder::new("f3", "C"), vec![note("c", Some("f3"))])
            .failing("list_folder_notes:f3", 500);

        assert!(fetch_snapshot(&service, &token()).await.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn folder_listing_failure_skips_note_fetches() {
        let service = FakeNoteService::new()
            .with_folder(Folder::new("f1", "A"), vec![])
            .failing("list_folders", 503);

        assert!(fetch_snapshot(&service, &token()).await.is_err());
        assert_eq!(service.calls(), vec!["list_folders".to_string()]);
    }

    #[test]
    fn merge_listings_keeps_first_occurrence() {
        let mut first = note("x", None);
        first.title = "first".to_string();
        let mut second = note("x", Some("f1"));
        second.title = "second".to_string();

        let merged = merge_listings(vec![vec![first], vec![second]]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "first");
        assert_eq!(merged[0].id, NoteId::new("x"));
        assert_eq!(merged[0].folder_id, None::<FolderId>);
    }
}
