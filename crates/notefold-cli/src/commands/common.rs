use chrono::{DateTime, Utc};
use notefold_core::auth::AccountClient;
use notefold_core::remote::HttpNoteService;
use notefold_core::view::NoteGroup;
use notefold_core::{Folder, GroupedView, Note, NoteSession, Notice, NoticeLevel};
use serde::Serialize;

use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::credentials::KeyringCredentialStore;
use crate::error::CliError;

pub type CliSession = NoteSession<HttpNoteService, KeyringCredentialStore>;

const SHORT_ID_LEN: usize = 10;

/// Resolved profile name plus its stored settings.
#[derive(Debug, Clone)]
pub struct ProfileContext {
    pub name: String,
    pub profile: CliProfile,
}

impl ProfileContext {
    pub fn resolve(global_profile: Option<&str>) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load().map_err(CliError::Config)?;
        let name = config.resolve_profile_name(global_profile);
        let profile = config.profile(&name).cloned().unwrap_or_default();
        Ok(Self { name, profile })
    }

    pub fn credentials(&self) -> KeyringCredentialStore {
        KeyringCredentialStore::new(&self.name)
    }

    pub fn open_session(&self) -> Result<CliSession, CliError> {
        let config = self.profile.client_config()?;
        let service = HttpNoteService::new(&config)?;
        tracing::debug!(profile = %self.name, api = service.base_url(), "Opened note session");
        Ok(NoteSession::new(service, self.credentials()))
    }

    pub fn account_client(&self) -> Result<AccountClient<KeyringCredentialStore>, CliError> {
        let config = self.profile.client_config()?;
        Ok(AccountClient::new(&config, self.credentials())?)
    }
}

/// Open a session and load every note; a fresh "mount" of the note screen.
pub async fn load_session(global_profile: Option<&str>) -> Result<CliSession, CliError> {
    let session = ProfileContext::resolve(global_profile)?.open_session()?;
    session.refresh().await?;
    Ok(session)
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub folder_id: Option<String>,
    pub priority: String,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct FolderListItem {
    pub id: String,
    pub name: String,
    pub notes: usize,
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        description: note.description.clone(),
        folder_id: note.folder_id.as_ref().map(ToString::to_string),
        priority: note.priority.to_string(),
        favorite: note.is_favorite,
    }
}

pub fn folder_to_list_item(folder: &Folder, view: &GroupedView) -> FolderListItem {
    let notes = view
        .groups
        .iter()
        .find(|group| group.key.as_str() == folder.id.as_str())
        .map_or(0, |group| group.notes.len());
    FolderListItem {
        id: folder.id.to_string(),
        name: folder.name.clone(),
        notes,
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    notes.iter().map(format_note_line).collect()
}

fn format_note_line(note: &Note) -> String {
    let marker = if note.is_favorite { '*' } else { ' ' };
    format!(
        "{:<width$}  {marker} {:<6}  {}",
        short_id(note.id.as_str()),
        note.priority.as_str(),
        note.title_preview(48),
        width = SHORT_ID_LEN,
    )
}

pub fn format_group_lines(view: &GroupedView) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.total_notes() + view.groups.len());
    for group in &view.groups {
        lines.push(format_group_header(group));
        lines.extend(
            group
                .notes
                .iter()
                .map(|note| format!("  {}", format_note_line(note))),
        );
    }
    lines
}

fn format_group_header(group: &NoteGroup) -> String {
    format!("{} ({})", group.label, group.notes.len())
}

pub fn format_notice(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!("[{}] {level}: {}", notice.at.format("%H:%M:%S"), notice.message)
}

pub fn print_notes(notes: &[Note], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let items = notes.iter().map(note_to_list_item).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if notes.is_empty() {
        println!("No notes.");
    } else {
        for line in format_note_lines(notes) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn print_grouped(view: &GroupedView) {
    if view.is_empty() {
        println!("No notes.");
        return;
    }
    for line in format_group_lines(view) {
        println!("{line}");
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Match a full note ID or a unique ID prefix against loaded notes.
pub fn resolve_note(notes: &[Note], query: &str) -> Result<Note, CliError> {
    let query = normalize_note_identifier(query)?;
    if let Some(note) = notes.iter().find(|note| note.id.as_str() == query) {
        return Ok(note.clone());
    }

    let matches = notes
        .iter()
        .filter(|note| note.id.as_str().starts_with(&query))
        .collect::<Vec<_>>();
    match matches.as_slice() {
        [] => Err(CliError::NoteNotFound(query)),
        [note] => Ok((*note).clone()),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|note| short_id(note.id.as_str()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Match a folder by exact ID, case-insensitive name, or unique ID prefix.
pub fn resolve_folder(folders: &[Folder], query: &str) -> Result<Folder, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::FolderNotFound(String::new()));
    }
    if let Some(folder) = folders.iter().find(|folder| folder.id.as_str() == query) {
        return Ok(folder.clone());
    }

    let by_name = folders
        .iter()
        .filter(|folder| folder.name.eq_ignore_ascii_case(query))
        .collect::<Vec<_>>();
    let candidates = if by_name.is_empty() {
        folders
            .iter()
            .filter(|folder| folder.id.as_str().starts_with(query))
            .collect::<Vec<_>>()
    } else {
        by_name
    };

    match candidates.as_slice() {
        [] => Err(CliError::FolderNotFound(query.to_string())),
        [folder] => Ok((*folder).clone()),
        _ => {
            let options = candidates
                .iter()
                .map(|folder| format!("{} ({})", folder.name, short_id(folder.id.as_str())))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousFolder(format!(
                "Folder '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub const fn require_confirmation(confirmed: bool, action: &'static str) -> Result<(), CliError> {
    if confirmed {
        Ok(())
    } else {
        Err(CliError::ConfirmationRequired(action))
    }
}

pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - then).num_seconds().max(0);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else {
        format!("{}d ago", diff / day)
    }
}
