use notefold_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_url,
            timeout,
            no_activate,
        } => run_config_init(global_profile, api_url, timeout, no_activate),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_url: Option<String>,
    timeout: Option<u64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    apply_profile_init(&mut config, &profile_name, api_url, timeout, no_activate)?;

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    Ok(())
}

/// Merge explicit values into the named profile and optionally activate it.
pub fn apply_profile_init(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    api_url: Option<String>,
    timeout: Option<u64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let profile = config.profile_mut_or_default(profile_name);
    if let Some(url) = normalize_text_option(api_url) {
        profile.api_base_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(timeout) = timeout {
        profile.request_timeout_secs = Some(timeout);
    }
    profile.validate().map_err(CliError::Config)?;

    if !no_activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}

pub fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let resolved = profile.client_config()?;

    println!("Profile:  {profile_name}");
    println!("API URL:  {}", resolved.api_base_url);
    println!("Timeout:  {}s", resolved.request_timeout.as_secs());
    if config.profile(&profile_name).is_none() {
        println!("(profile not saved; using defaults and environment)");
    }
    Ok(())
}
