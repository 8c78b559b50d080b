use notefold_core::models::UserProfile;

use crate::cli::ProfileCommands;
use crate::commands::common::{require_confirmation, ProfileContext};
use crate::error::CliError;

pub async fn run_profile(
    command: ProfileCommands,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let client = ProfileContext::resolve(global_profile)?.account_client()?;
    match command {
        ProfileCommands::Show { json } => {
            let profile = client.fetch_profile().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                for line in format_profile_lines(&profile) {
                    println!("{line}");
                }
            }
            Ok(())
        }
        ProfileCommands::Update {
            name,
            last_name,
            email,
            username,
        } => {
            let current = client.fetch_profile().await?;
            let updated = merge_profile(current, name, last_name, email, username);
            client.update_profile(&updated).await?;
            println!("Profile updated");
            Ok(())
        }
    }
}

pub async fn run_purge(confirmed: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    require_confirmation(confirmed, "delete every note")?;
    let client = ProfileContext::resolve(global_profile)?.account_client()?;
    client.delete_all_notes().await?;
    println!("All notes deleted");
    Ok(())
}

pub async fn run_delete_account(
    confirmed: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    require_confirmation(confirmed, "delete the account")?;
    let context = ProfileContext::resolve(global_profile)?;
    context.account_client()?.delete_account().await?;
    println!("Account deleted; profile '{}' signed out", context.name);
    Ok(())
}

pub fn merge_profile(
    current: UserProfile,
    name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    username: Option<String>,
) -> UserProfile {
    let keep = |value: Option<String>, fallback: String| {
        notefold_core::util::normalize_text_option(value).unwrap_or(fallback)
    };
    UserProfile {
        name: keep(name, current.name),
        last_name: keep(last_name, current.last_name),
        username: keep(username, current.username),
        email: keep(email, current.email),
    }
}

pub fn format_profile_lines(profile: &UserProfile) -> Vec<String> {
    vec![
        format!("Name:     {} {}", profile.name, profile.last_name),
        format!("Username: {}", profile.username),
        format!("Email:    {}", profile.email),
    ]
}
