use crate::cli::FolderCommands;
use crate::commands::common::{
    folder_to_list_item, load_session, require_confirmation, resolve_folder, ProfileContext,
};
use crate::error::CliError;

pub async fn run_folders(
    command: FolderCommands,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    match command {
        FolderCommands::List { json } => {
            let session = load_session(global_profile).await?;
            let view = session.grouped_view();
            let items = session
                .folders()
                .iter()
                .map(|folder| folder_to_list_item(folder, &view))
                .collect::<Vec<_>>();

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("No folders.");
            } else {
                for item in items {
                    println!("{:<24}  {:>4}  {}", item.id, item.notes, item.name);
                }
            }
            Ok(())
        }
        FolderCommands::Create { name } => {
            let session = ProfileContext::resolve(global_profile)?.open_session()?;
            let folder = session.create_folder(&name).await?;
            println!("{}", folder.id);
            Ok(())
        }
        FolderCommands::Delete { folder } => {
            let session = load_session(global_profile).await?;
            let folder = resolve_folder(&session.folders(), &folder)?;
            session.delete_folder(&folder.id).await?;
            println!("Deleted folder '{}'", folder.name);
            Ok(())
        }
        FolderCommands::Clear { yes } => {
            require_confirmation(yes, "delete every folder")?;
            let session = ProfileContext::resolve(global_profile)?.open_session()?;
            session.delete_all_folders().await?;
            println!("All folders deleted");
            Ok(())
        }
    }
}
