use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use notefold_core::Priority;

#[derive(Parser)]
#[command(name = "notefold")]
#[command(about = "Folder-organized notes from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name (API endpoint and stored credentials)
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email/password and store the token in the keychain
    Login {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "LAST_NAME")]
        last_name: String,
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Forget the stored token for this profile
    Logout,
    /// Show sign-in status for this profile
    Status,
    /// Show or update the account profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// List notes grouped by folder, highest priority first
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List favorite notes
    Favorites {
        /// Filter the aggregated notes instead of asking the favorites endpoint
        #[arg(long)]
        local: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        title: String,
        /// Note body
        #[arg(short, long, default_value = "")]
        description: String,
        /// high, medium or low
        #[arg(short, long, default_value = "low")]
        priority: Priority,
        /// Folder name or ID
        #[arg(long, value_name = "FOLDER")]
        folder: Option<String>,
    },
    /// Edit a note's title and/or body
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Toggle a note's favorite flag
    Fav {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Manage folders
    Folders {
        #[command(subcommand)]
        command: FolderCommands,
    },
    /// Delete every note in the account
    Purge {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Delete the account and sign out
    DeleteAccount {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Keep refreshing the grouped note list
    Watch {
        /// Seconds between refreshes
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Print the account profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change profile fields; omitted fields keep their current value
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_name = "LAST_NAME")]
        last_name: Option<String>,
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum FolderCommands {
    /// List folders with their note counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a folder
    Create {
        /// Folder name
        name: String,
    },
    /// Delete a folder
    Delete {
        /// Folder name or ID
        folder: String,
    },
    /// Delete every folder
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Notes API base URL
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        /// HTTP request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved configuration for a profile
    Show,
}
