use std::time::Duration;

use chrono::Utc;
use notefold_core::{ErrorKind, FocusOutcome, RefreshController, RefreshOutcome};
use tokio::time::MissedTickBehavior;

use crate::commands::common::{
    format_notice, format_relative_time, print_grouped, CliSession, ProfileContext,
};
use crate::error::CliError;

/// Mount the note screen, then fire a focus event every `interval_secs`
/// until Ctrl-C.
pub async fn run_watch(interval_secs: u64, global_profile: Option<&str>) -> Result<(), CliError> {
    let session = ProfileContext::resolve(global_profile)?.open_session()?;
    let controller = RefreshController::new(session);

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    let outcome = controller.mount().await;
    report_focus(controller.target(), outcome)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let outcome = controller.focus().await;
                report_focus(controller.target(), outcome)?;
            }
        }
    }

    controller.unmount();
    tracing::info!("Stopped watching");
    Ok(())
}

fn report_focus(session: &CliSession, outcome: FocusOutcome) -> Result<(), CliError> {
    match outcome {
        FocusOutcome::Completed {
            result: Ok(RefreshOutcome::Applied { .. }),
            runs,
        } => {
            let refreshed = session
                .last_refreshed_at()
                .map_or_else(|| "never".to_string(), |at| format_relative_time(at, Utc::now()));
            println!("--- refreshed {refreshed} ({runs} run(s)) ---");
            print_grouped(&session.grouped_view());
        }
        FocusOutcome::Completed {
            result: Err(error), ..
        } if error.kind() == ErrorKind::Auth => return Err(error.into()),
        FocusOutcome::Completed { .. } | FocusOutcome::Coalesced | FocusOutcome::Unmounted => {}
    }

    for notice in session.drain_notices() {
        eprintln!("{}", format_notice(&notice));
    }
    Ok(())
}
