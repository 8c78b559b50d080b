//! Focus-driven refresh with coalescing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{NoteSession, RefreshOutcome};
use crate::auth::CredentialStore;
use crate::remote::NoteService;
use crate::Result;

/// Something a [`RefreshController`] can re-read on focus.
#[async_trait]
pub trait RefreshTarget: Send + Sync {
    async fn refresh(&self) -> Result<RefreshOutcome>;

    fn mount(&self);

    fn unmount(&self);
}

#[async_trait]
impl<S, C> RefreshTarget for NoteSession<S, C>
where
    S: NoteService + 'static,
    C: CredentialStore,
{
    async fn refresh(&self) -> Result<RefreshOutcome> {
        Self::refresh(self).await
    }

    fn mount(&self) {
        Self::mount(self);
    }

    fn unmount(&self) {
        Self::unmount(self);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Refreshing { rerun_requested: bool },
}

#[derive(Debug)]
pub enum FocusOutcome {
    /// This call drove the refresh. `runs` counts the initial run plus the
    /// coalesced rerun, if any; `result` is from the last run.
    Completed {
        runs: usize,
        result: Result<RefreshOutcome>,
    },
    /// A refresh was already running; one rerun is queued behind it.
    Coalesced,
    /// The controller is unmounted and started nothing.
    Unmounted,
}

/// Drives refreshes on mount and focus.
///
/// Focus events that arrive while a refresh is running collapse into a single
/// rerun that starts once the current one settles.
pub struct RefreshController<T> {
    target: T,
    phase: Mutex<RefreshPhase>,
    active: AtomicBool,
}

impl<T: RefreshTarget> RefreshController<T> {
    pub const fn new(target: T) -> Self {
        Self {
            target,
            phase: Mutex::new(RefreshPhase::Idle),
            active: AtomicBool::new(true),
        }
    }

    pub const fn target(&self) -> &T {
        &self.target
    }

    pub fn phase(&self) -> RefreshPhase {
        *self.lock_phase()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Mount the target and run the first refresh.
    pub async fn mount(&self) -> FocusOutcome {
        self.active.store(true, Ordering::SeqCst);
        self.target.mount();
        self.focus().await
    }

    /// Stop starting refreshes; in-flight results are ignored by the target.
    pub fn unmount(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.target.unmount();
    }

    pub async fn focus(&self) -> FocusOutcome {
        if !self.is_active() {
            return FocusOutcome::Unmounted;
        }

        {
            let mut phase = self.lock_phase();
            if let RefreshPhase::Refreshing { .. } = *phase {
                *phase = RefreshPhase::Refreshing {
                    rerun_requested: true,
                };
                tracing::debug!("Coalesced focus into pending rerun");
                return FocusOutcome::Coalesced;
            }
            *phase = RefreshPhase::Refreshing {
                rerun_requested: false,
            };
        }
        let _running = RunningGuard { phase: &self.phase };

        let mut runs = 0;
        loop {
            runs += 1;
            let result = self.target.refresh().await;

            let rerun = {
                let mut phase = self.lock_phase();
                let requested = matches!(
                    *phase,
                    RefreshPhase::Refreshing {
                        rerun_requested: true
                    }
                ) && self.is_active();
                *phase = if requested {
                    RefreshPhase::Refreshing {
                        rerun_requested: false,
                    }
                } else {
                    RefreshPhase::Idle
                };
                requested
            };

            if !rerun {
                return FocusOutcome::Completed { runs, result };
            }
        }
    }

    fn lock_phase(&self) -> MutexGuard<'_, RefreshPhase> {
        lock_phase(&self.phase)
    }
}

/// Returns the controller to `Idle` when the driving `focus` call finishes
/// or is dropped mid-refresh.
struct RunningGuard<'a> {
    phase: &'a Mutex<RefreshPhase>,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *lock_phase(self.phase) = RefreshPhase::Idle;
    }
}

fn lock_phase(phase: &Mutex<RefreshPhase>) -> MutexGuard<'_, RefreshPhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}
