use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notefold_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error("Folder not found: {0}")]
    FolderNotFound(String),
    #[error("{0}")]
    AmbiguousFolder(String),
    #[error("Nothing to change; pass --title and/or --description")]
    EmptyEdit,
    #[error("Refusing to {0} without --yes")]
    ConfirmationRequired(&'static str),
    #[error("Configuration error: {0}")]
    Config(String),
}
