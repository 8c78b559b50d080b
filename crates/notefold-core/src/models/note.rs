//! Note model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::FolderId;

/// Color the remote service stores on every note created by this client.
pub const DEFAULT_NOTE_COLOR: &str = "E2DCC6";

/// Remote-assigned note identifier. Opaque; never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Note priority. Display order is `High`, `Medium`, `Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    /// Sort rank; lower ranks are listed first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "unknown priority '{other}' (expected high, medium or low)"
            )),
        }
    }
}

/// A note as returned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Remote identifier
    #[serde(rename = "_id")]
    pub id: NoteId,
    pub title: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    /// Owning folder; `None` means unfiled
    #[serde(
        rename = "noteFolder",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "folder_id_or_unfiled"
    )]
    pub folder_id: Option<FolderId>,
    #[serde(default, deserialize_with = "priority_or_default")]
    pub priority: Priority,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: bool,
}

impl Note {
    #[must_use]
    pub const fn is_unfiled(&self) -> bool {
        self.folder_id.is_none()
    }

    /// Title collapsed to a single line and truncated to `max_chars`.
    #[must_use]
    pub fn title_preview(&self, max_chars: usize) -> String {
        let collapsed = self.title.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= max_chars {
            collapsed
        } else {
            let mut truncated = collapsed
                .chars()
                .take(max_chars.saturating_sub(3))
                .collect::<String>();
            truncated.push_str("...");
            truncated
        }
    }
}

/// Empty strings, `null` and non-string values all mean unfiled.
fn folder_id_or_unfiled<'de, D>(deserializer: D) -> Result<Option<FolderId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(id) if !id.trim().is_empty() => Some(FolderId::new(id)),
        _ => None,
    })
}

/// Unknown or missing priorities fall back to the default.
fn priority_or_default<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::String(raw) => raw.parse().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        tracing::debug!(priority = %value, "Unrecognized note priority; using default");
        Priority::default()
    }))
}

/// Input for creating a note. The id is assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    #[serde(rename = "noteName")]
    pub title: String,
    #[serde(rename = "noteDescription")]
    pub description: String,
    #[serde(rename = "noteColor")]
    pub color: String,
    pub priority: Priority,
    #[serde(rename = "noteFolder", skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
}

impl NoteDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color: DEFAULT_NOTE_COLOR.to_string(),
            priority: Priority::default(),
            folder_id: None,
        }
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn in_folder(mut self, folder_id: Option<FolderId>) -> Self {
        self.folder_id = folder_id;
        self
    }
}

/// Requested content changes for an existing note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl NoteEdit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Drop fields that already match `note`; only real changes hit the wire.
    #[must_use]
    pub fn changes_against(&self, note: &Note) -> Self {
        Self {
            title: self.title.clone().filter(|title| *title != note.title),
            description: self
                .description
                .clone()
                .filter(|description| *description != note.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_parses_remote_payload() {
        let payload = r#"{
            "_id": "65f1c0",
            "title": "Groceries",
            "desc": "milk, eggs",
            "noteFolder": "f1",
            "priority": "high",
            "isFavorite": true,
            "noteColor": "E2DCC6",
            "__v": 0
        }"#;
        let note: Note = serde_json::from_str(payload).unwrap();
        assert_eq!(note.id.as_str(), "65f1c0");
        assert_eq!(note.description, "milk, eggs");
        assert_eq!(note.folder_id, Some(FolderId::new("f1")));
        assert_eq!(note.priority, Priority::High);
        assert!(note.is_favorite);
    }

    #[test]
    fn note_defaults_missing_optional_fields() {
        let note: Note = serde_json::from_str(r#"{"_id": "n1", "title": "t"}"#).unwrap();
        assert!(note.is_unfiled());
        assert_eq!(note.priority, Priority::Low);
        assert!(!note.is_favorite);
        assert_eq!(note.description, "");
    }

    #[test]
    fn blank_or_null_folder_means_unfiled() {
        for folder in [r#""""#, r#""  ""#, "null", "false"] {
            let payload = format!(r#"{{"_id": "n1", "title": "t", "noteFolder": {folder}}}"#);
            let note: Note = serde_json::from_str(&payload).unwrap();
            assert!(note.is_unfiled(), "noteFolder {folder} should be unfiled");
        }
    }

    #[test]
    fn unreadable_priority_does_not_fail_listing() {
        let payload = r#"[
            {"_id": "n1", "title": "t", "priority": null},
            {"_id": "n2", "title": "u", "priority": "urgent"},
            {"_id": "n3", "title": "v", "priority": "Medium"}
        ]"#;
        let notes: Vec<Note> = serde_json::from_str(payload).unwrap();
        let priorities = notes.iter().map(|note| note.priority).collect::<Vec<_>>();
        assert_eq!(priorities, vec![Priority::Low, Priority::Low, Priority::Medium]);
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn draft_serializes_wire_field_names() {
        let draft = NoteDraft::new("Title", "Body")
            .with_priority(Priority::Medium)
            .in_folder(Some(FolderId::new("f9")));
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["noteName"], "Title");
        assert_eq!(value["noteDescription"], "Body");
        assert_eq!(value["noteColor"], DEFAULT_NOTE_COLOR);
        assert_eq!(value["priority"], "medium");
        assert_eq!(value["noteFolder"], "f9");
    }

    #[test]
    fn draft_without_folder_omits_folder_field() {
        let value = serde_json::to_value(NoteDraft::new("a", "b")).unwrap();
        assert!(value.get("noteFolder").is_none());
    }

    #[test]
    fn edit_changes_against_drops_unchanged_fields() {
        let note = Note {
            id: NoteId::new("n1"),
            title: "Same".to_string(),
            description: "Old".to_string(),
            folder_id: None,
            priority: Priority::Low,
            is_favorite: false,
        };
        let edit = NoteEdit {
            title: Some("Same".to_string()),
            description: Some("New".to_string()),
        };
        let changes = edit.changes_against(&note);
        assert_eq!(changes.title, None);
        assert_eq!(changes.description.as_deref(), Some("New"));
        assert!(NoteEdit::default().changes_against(&note).is_empty());
    }

    #[test]
    fn title_preview_truncates_with_ellipsis() {
        let note = Note {
            id: NoteId::new("n1"),
            title: "This is a very long   title that should be shortened".to_string(),
            description: String::new(),
            folder_id: None,
            priority: Priority::Low,
            is_favorite: false,
        };
        assert_eq!(note.title_preview(20), "This is a very lo...");
    }
}
