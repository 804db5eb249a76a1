//! Synthetic progress: time-based percent shown while the real task runs.
//!
//! The backend only reports pending/complete, so the presenter walks percent
//! up in fixed steps and stops at `SYNTHETIC_CEILING`. Only the poller may
//! set 100. The presenter exits as soon as the shared phase turns terminal.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::workflow::messages::phrase_for;
use crate::workflow::state::{PollPhase, ProgressState, SYNTHETIC_CEILING};

/// Percentage points added per step.
pub const STEP: u8 = 10;

/// Applies one presenter step. Returns `true` if the state changed.
///
/// No-op once the workflow is complete or exhausted, or once percent sits at
/// the ceiling. The band phrase only replaces the message while polling
/// normally, so a retry notice stays visible until the next check starts.
pub fn advance(state: &mut ProgressState) -> bool {
    if state.is_complete || state.phase.is_terminal() || state.percent >= SYNTHETIC_CEILING {
        return false;
    }

    state.percent = state.percent.saturating_add(STEP).min(SYNTHETIC_CEILING);
    if state.phase == PollPhase::Polling {
        state.message = phrase_for(state.percent).to_string();
    }
    true
}

/// Whether another presenter step is worth scheduling.
fn should_reschedule(state: &ProgressState) -> bool {
    !state.phase.is_terminal() && state.percent < SYNTHETIC_CEILING
}

pub struct SyntheticProgress<'a> {
    state: &'a watch::Sender<ProgressState>,
    interval: Duration,
}

impl<'a> SyntheticProgress<'a> {
    pub fn new(state: &'a watch::Sender<ProgressState>, interval: Duration) -> Self {
        Self { state, interval }
    }

    /// Steps immediately, then once per interval until the ceiling or a
    /// terminal phase is reached.
    pub async fn run(self) {
        let mut rx = self.state.subscribe();

        loop {
            self.state.send_if_modified(advance);

            if !should_reschedule(&self.state.borrow()) {
                debug!(percent = self.state.borrow().percent, "Synthetic progress stopped");
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = wait_for_terminal(&mut rx) => {
                    debug!("Workflow finished, synthetic progress exiting early");
                    return;
                }
            }
        }
    }
}

/// Resolves once the shared phase is terminal (or the state is gone).
pub(crate) async fn wait_for_terminal(rx: &mut watch::Receiver<ProgressState>) {
    loop {
        if rx.borrow_and_update().phase.is_terminal() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
