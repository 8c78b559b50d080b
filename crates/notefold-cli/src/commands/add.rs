use notefold_core::{NoteDraft, Priority};

use crate::commands::common::{load_session, resolve_folder, ProfileContext};
use crate::error::CliError;

pub async fn run_add(
    title: &str,
    description: &str,
    priority: Priority,
    folder: Option<&str>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let session = match folder {
        Some(_) => load_session(global_profile).await?,
        None => ProfileContext::resolve(global_profile)?.open_session()?,
    };
    let folder_id = folder
        .map(|query| resolve_folder(&session.folders(), query))
        .transpose()?
        .map(|folder| folder.id);

    let draft = NoteDraft::new(title, description)
        .with_priority(priority)
        .in_folder(folder_id);
    let note = session.create_note(draft).await?;

    println!("{}", note.id);
    Ok(())
}
