use notefold_core::models::SignUpRequest;
use notefold_core::CredentialStore;

use crate::commands::common::ProfileContext;
use crate::error::CliError;

pub async fn run_login(
    email: &str,
    password: &str,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let context = ProfileContext::resolve(global_profile)?;
    let client = context.account_client()?;
    client.sign_in(email, password).await?;
    println!("Signed in profile '{}' as {}", context.name, email.trim());
    Ok(())
}

pub async fn run_register(
    request: SignUpRequest,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let context = ProfileContext::resolve(global_profile)?;
    let client = context.account_client()?;
    let username = client.sign_up(&request).await?;
    println!("Registered '{username}'. Run `notefold login --email <email> --password <password>`.");
    Ok(())
}

pub fn run_logout(global_profile: Option<&str>) -> Result<(), CliError> {
    let context = ProfileContext::resolve(global_profile)?;
    context.account_client()?.sign_out()?;
    println!("Signed out profile '{}'", context.name);
    Ok(())
}

pub async fn run_status(global_profile: Option<&str>) -> Result<(), CliError> {
    let context = ProfileContext::resolve(global_profile)?;
    if context.credentials().load_token()?.is_none() {
        println!("Profile '{}' is not signed in.", context.name);
        return Ok(());
    }

    let profile = context.account_client()?.fetch_profile().await?;
    println!(
        "Profile '{}' is signed in as {} <{}>",
        context.name, profile.username, profile.email
    );
    Ok(())
}
