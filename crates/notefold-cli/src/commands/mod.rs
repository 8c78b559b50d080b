pub mod account;
pub mod add;
pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod edit;
pub mod favorite;
pub mod folders;
pub mod list;
pub mod watch;
