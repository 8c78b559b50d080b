//! Notefold CLI - folder-organized notes from the terminal.
//!
//! Each invocation mounts the note screen once; `notefold watch` keeps it
//! mounted and refreshes on an interval.

mod cli;
mod commands;
mod config_profiles;
mod credentials;
mod error;


use clap::Parser;
use notefold_core::models::SignUpRequest;

use crate::cli::{Cli, Commands};
use crate::commands::{
    account, add, auth_cmd, completions, config, delete, edit, favorite, folders, list, watch,
};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Login { email, password } => auth_cmd::run_login(&email, &password, profile).await,
        Commands::Register {
            name,
            last_name,
            email,
            username,
            password,
        } => {
            let request = SignUpRequest {
                name,
                last_name,
                email,
                username,
                password,
            };
            auth_cmd::run_register(request, profile).await
        }
        Commands::Logout => auth_cmd::run_logout(profile),
        Commands::Status => auth_cmd::run_status(profile).await,
        Commands::Profile { command } => account::run_profile(command, profile).await,
        Commands::List { json } => list::run_list(json, profile).await,
        Commands::Favorites { local, json } => list::run_favorites(local, json, profile).await,
        Commands::Add {
            title,
            description,
            priority,
            folder,
        } => add::run_add(&title, &description, priority, folder.as_deref(), profile).await,
        Commands::Edit {
            id,
            title,
            description,
        } => edit::run_edit(&id, title, description, profile).await,
        Commands::Delete { id } => delete::run_delete(&id, profile).await,
        Commands::Fav { id } => favorite::run_toggle_favorite(&id, profile).await,
        Commands::Folders { command } => folders::run_folders(command, profile).await,
        Commands::Purge { yes } => account::run_purge(yes, profile).await,
        Commands::DeleteAccount { yes } => account::run_delete_account(yes, profile).await,
        Commands::Watch { interval } => watch::run_watch(interval, profile).await,
        Commands::Config { command } => config::run_config(command, profile),
        Commands::Completions { shell, output } => {
            completions::run_completions(shell, output.as_deref())
        }
    }
}

fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "notefold=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
