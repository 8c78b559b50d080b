//! Display projection: folder grouping and priority ordering.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::models::{Folder, FolderId, Note};

/// Sentinel group key for notes without a folder.
pub const UNFILED_KEY: &str = "unfiled";
/// Label for the unfiled group.
pub const UNFILED_LABEL: &str = "No folder";
/// Label for notes whose folder is not in the folder list.
pub const UNKNOWN_FOLDER_LABEL: &str = "Unknown folder";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FolderKey {
    Folder(FolderId),
    Unfiled,
}

impl Serialize for FolderKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FolderKey {
    #[must_use]
    pub fn of(note: &Note) -> Self {
        note.folder_id
            .clone()
            .map_or(Self::Unfiled, Self::Folder)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Folder(id) => id.as_str(),
            Self::Unfiled => UNFILED_KEY,
        }
    }
}

impl fmt::Display for FolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteGroup {
    pub key: FolderKey,
    pub label: String,
    pub notes: Vec<Note>,
}

/// Folder-grouped, priority-ordered notes. Rebuilt from scratch on change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedView {
    pub groups: Vec<NoteGroup>,
}

impl GroupedView {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_notes(&self) -> usize {
        self.groups.iter().map(|group| group.notes.len()).sum()
    }

    pub fn group(&self, key: &FolderKey) -> Option<&NoteGroup> {
        self.groups.iter().find(|group| &group.key == key)
    }

    /// Iterate notes in display order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.groups.iter().flat_map(|group| group.notes.iter())
    }
}

/// Group `notes` by folder and order each group by priority.
///
/// Groups appear in order of their first note in `notes`. Within a group,
/// notes are sorted by ascending priority rank; equal ranks keep input order.
pub fn project(notes: &[Note], folders: &[Folder]) -> GroupedView {
    let mut index_by_key: HashMap<FolderKey, usize> = HashMap::new();
    let mut groups: Vec<NoteGroup> = Vec::new();

    for note in notes {
        let key = FolderKey::of(note);
        let index = *index_by_key.entry(key.clone()).or_insert_with(|| {
            groups.push(NoteGroup {
                label: folder_label(&key, folders),
                key,
                notes: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].notes.push(note.clone());
    }

    for group in &mut groups {
        group.notes.sort_by_key(|note| note.priority.rank());
    }

    GroupedView { groups }
}

/// Favorites from the local collection, in input order.
pub fn favorites(notes: &[Note]) -> Vec<Note> {
    notes.iter().filter(|note| note.is_favorite).cloned().collect()
}

fn folder_label(key: &FolderKey, folders: &[Folder]) -> String {
    match key {
        FolderKey::Unfiled => UNFILED_LABEL.to_string(),
        FolderKey::Folder(id) => folders
            .iter()
            .find(|folder| &folder.id == id)
            .map_or_else(|| UNKNOWN_FOLDER_LABEL.to_string(), |folder| folder.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{NoteId, Priority};

    fn note(id: &str, folder: Option<&str>, priority: Priority) -> Note {
        Note {
            id: NoteId::new(id),
            title: id.to_uppercase(),
            description: String::new(),
            folder_id: folder.map(FolderId::new),
            priority,
            is_favorite: false,
        }
    }

    fn ids(group: &NoteGroup) -> Vec<&str> {
        group.notes.iter().map(|note| note.id.as_str()).collect()
    }

    #[test]
    fn groups_by_folder_and_orders_by_priority() {
        let folders = vec![Folder::new("f1", "Work"), Folder::new("f2", "Home")];
        let notes = vec![
            note("n1", Some("f1"), Priority::Low),
            note("n2", Some("f1"), Priority::High),
            note("n3", None, Priority::Medium),
        ];

        let view = project(&notes, &folders);

        assert_eq!(view.groups.len(), 2);
        assert_eq!(view.groups[0].key, FolderKey::Folder(FolderId::new("f1")));
        assert_eq!(view.groups[0].label, "Work");
        assert_eq!(ids(&view.groups[0]), vec!["n2", "n1"]);
        assert_eq!(view.groups[1].key, FolderKey::Unfiled);
        assert_eq!(view.groups[1].label, UNFILED_LABEL);
        assert_eq!(ids(&view.groups[1]), vec!["n3"]);
    }

    #[test]
    fn equal_priorities_keep_input_order() {
        let notes = vec![
            note("a", None, Priority::Low),
            note("b", None, Priority::High),
            note("c", None, Priority::Low),
            note("d", None, Priority::High),
            note("e", None, Priority::Medium),
        ];
        let view = project(&notes, &[]);
        assert_eq!(ids(&view.groups[0]), vec!["b", "d", "e", "a", "c"]);
    }

    #[test]
    fn partitions_every_note_exactly_once() {
        let priorities = [Priority::High, Priority::Medium, Priority::Low];
        let folders = [None, Some("f1"), Some("f2"), Some("ghost")];
        let notes = (0..40)
            .map(|i| {
                note(
                    &format!("n{i}"),
                    folders[i % folders.len()],
                    priorities[(i * 7) % priorities.len()],
                )
            })
            .collect::<Vec<_>>();

        let view = project(&notes, &[Folder::new("f1", "Work"), Folder::new("f2", "Home")]);

        assert_eq!(view.total_notes(), notes.len());
        let unique = view.notes().map(|note| note.id.clone()).collect::<HashSet<_>>();
        assert_eq!(unique.len(), notes.len());
        for group in &view.groups {
            assert!(group
                .notes
                .windows(2)
                .all(|pair| pair[0].priority.rank() <= pair[1].priority.rank()));
            assert!(group.notes.iter().all(|note| FolderKey::of(note) == group.key));
        }
    }

    #[test]
    fn missing_folder_uses_placeholder_label() {
        let view = project(&[note("n1", Some("gone"), Priority::Low)], &[]);
        assert_eq!(view.groups[0].label, UNKNOWN_FOLDER_LABEL);
    }

    #[test]
    fn empty_input_yields_empty_view() {
        let view = project(&[], &[Folder::new("f1", "Work")]);
        assert!(view.is_empty());
        assert_eq!(view.total_notes(), 0);
    }

    #[test]
    fn favorites_filters_locally() {
        let mut liked = note("a", None, Priority::Low);
        liked.is_favorite = true;
        let notes = vec![liked.clone(), note("b", None, Priority::High)];
        assert_eq!(favorites(&notes), vec![liked]);
    }

    #[test]
    fn folder_key_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_value(FolderKey::Unfiled).unwrap(),
            serde_json::json!(UNFILED_KEY)
        );
        assert_eq!(
            serde_json::to_value(FolderKey::Folder(FolderId::new("f1"))).unwrap(),
            serde_json::json!("f1")
        );
    }
}
