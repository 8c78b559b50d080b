use crate::commands::common::{load_session, resolve_note};
use crate::error::CliError;

pub async fn run_delete(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let session = load_session(global_profile).await?;
    let note = resolve_note(&session.notes(), id)?;

    session.delete_note(&note.id).await?;
    println!("{}", note.id);
    Ok(())
}
