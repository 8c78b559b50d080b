use crate::commands::common::{load_session, print_grouped, print_notes, ProfileContext};
use crate::error::CliError;

pub async fn run_list(as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let session = load_session(global_profile).await?;
    let view = session.grouped_view();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_grouped(&view);
    }
    Ok(())
}

pub async fn run_favorites(
    local: bool,
    as_json: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let favorites = if local {
        load_session(global_profile).await?.favorites_view()
    } else {
        let session = ProfileContext::resolve(global_profile)?.open_session()?;
        session.load_favorites().await?
    };
    print_notes(&favorites, as_json)
}
