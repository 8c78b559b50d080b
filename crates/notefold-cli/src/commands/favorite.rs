use crate::commands::common::{load_session, resolve_note};
use crate::error::CliError;

pub async fn run_toggle_favorite(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let session = load_session(global_profile).await?;
    let note = resolve_note(&session.notes(), id)?;

    let favorite = session.toggle_favorite(&note.id).await?;
    let state = if favorite { "favorite" } else { "not favorite" };
    println!("{} is now {state}", note.id);
    Ok(())
}
