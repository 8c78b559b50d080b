use notefold_core::NoteEdit;

use crate::commands::common::{load_session, resolve_note};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<String>,
    description: Option<String>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let edit = NoteEdit { title, description };
    if edit.is_empty() {
        return Err(CliError::EmptyEdit);
    }

    let session = load_session(global_profile).await?;
    let note = resolve_note(&session.notes(), id)?;
    let updated = session.update_note(&note.id, edit).await?;

    println!("{}", updated.id);
    Ok(())
}
