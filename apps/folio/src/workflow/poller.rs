//! Status poller: the state machine that watches the status endpoint.
//!
//! Polling → Polling          pending response, check_count += 1
//! Polling → Complete         status complete: percent 100, one redirect
//! Polling → ErrorRetrying    transport / HTTP / parse failure, error_count += 1
//! ErrorRetrying → Polling    when the next check starts
//! * → FailedExhausted        attempt budget spent: timeout message, warning style
//!
//! Requests are strictly sequential: the next check is scheduled only after
//! the previous one has been handled.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::StatusError;
use crate::workflow::client::StatusSource;
use crate::workflow::config::WorkflowConfig;
use crate::workflow::messages::{phrase_for, RETRY_MESSAGE, SUCCESS_MESSAGE, TIMEOUT_MESSAGE};
use crate::workflow::navigator::Navigator;
use crate::workflow::state::{PollPhase, ProgressState, ProgressStyle, StatusReport};

/// What the poller does after handling one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Complete,
    Exhausted,
}

/// How a workflow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Generation finished and the redirect was issued.
    Complete { redirect_url: String },
    /// The attempt budget ran out before completion was observed.
    Exhausted {
        checks: u32,
        errors: u32,
        /// Page to restart generation from, if configured.
        retry_url: Option<String>,
    },
}

/// Applies one status check result to the progress state.
pub fn apply_check(
    state: &mut ProgressState,
    result: &Result<StatusReport, StatusError>,
    config: &WorkflowConfig,
) -> Transition {
    match result {
        Ok(report) if report.status.is_complete() => {
            state.percent = 100;
            state.message = SUCCESS_MESSAGE.to_string();
            state.is_complete = true;
            state.phase = PollPhase::Complete;
            return Transition::Complete;
        }
        Ok(_) => {
            state.check_count = state.check_count.saturating_add(1);
            state.phase = PollPhase::Polling;
        }
        Err(_) => {
            state.error_count = state.error_count.saturating_add(1);
            state.phase = PollPhase::ErrorRetrying;
            state.message = RETRY_MESSAGE.to_string();
        }
    }

    if config.budget_exhausted(state) {
        exhaust(state);
        Transition::Exhausted
    } else {
        Transition::Continue
    }
}

fn exhaust(state: &mut ProgressState) {
    state.phase = PollPhase::FailedExhausted;
    state.message = TIMEOUT_MESSAGE.to_string();
    state.style = ProgressStyle::Warning;
}

/// Clears a retry notice before the next check goes out.
fn begin_check(state: &mut ProgressState) -> bool {
    if state.phase != PollPhase::ErrorRetrying {
        return false;
    }
    state.phase = PollPhase::Polling;
    state.message = phrase_for(state.percent).to_string();
    true
}

pub struct StatusPoller<'a, S: ?Sized, N: ?Sized> {
    source: &'a S,
    navigator: &'a N,
    state: &'a watch::Sender<ProgressState>,
    config: &'a WorkflowConfig,
}

impl<'a, S, N> StatusPoller<'a, S, N>
where
    S: StatusSource + ?Sized,
    N: Navigator + ?Sized,
{
    pub fn new(
        source: &'a S,
        navigator: &'a N,
        state: &'a watch::Sender<ProgressState>,
        config: &'a WorkflowConfig,
    ) -> Self {
        Self {
            source,
            navigator,
            state,
            config,
        }
    }

    /// Polls until completion or until the attempt budget is spent.
    pub async fn run(self) -> WorkflowOutcome {
        let portfolio_id = self.config.portfolio_id.as_str();
        info!(
            portfolio_id,
            max_attempts = self.config.max_attempts,
            policy = ?self.config.attempt_policy,
            "Polling generation status"
        );

        loop {
            let exhausted = self.config.budget_exhausted(&self.state.borrow());
            if exhausted {
                self.state.send_modify(exhaust);
                return self.exhausted();
            }

            self.state.send_if_modified(begin_check);

            let result = self.source.fetch().await;
            match &result {
                Ok(report) => debug!(
                    portfolio_id,
                    status = report.status.as_str(),
                    detail = report.message.as_deref().unwrap_or(""),
                    "Status check answered"
                ),
                Err(e) => warn!(
                    portfolio_id,
                    error = %e,
                    http_status = ?e.status_code(),
                    "Status check failed, retrying"
                ),
            }

            let mut transition = Transition::Continue;
            self.state
                .send_modify(|s| transition = apply_check(s, &result, self.config));

            match transition {
                Transition::Continue => {
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                Transition::Complete => {
                    info!(portfolio_id, "Portfolio generation complete");
                    tokio::time::sleep(self.config.redirect_delay).await;
                    self.navigator
                        .navigate(&self.config.view_portfolio_url)
                        .await;
                    return WorkflowOutcome::Complete {
                        redirect_url: self.config.view_portfolio_url.clone(),
                    };
                }
                Transition::Exhausted => return self.exhausted(),
            }
        }
    }

    fn exhausted(&self) -> WorkflowOutcome {
        let (checks, errors) = {
            let state = self.state.borrow();
            (state.check_count, state.error_count)
        };
        warn!(
            portfolio_id = self.config.portfolio_id.as_str(),
            checks,
            errors,
            "Gave up waiting for portfolio generation"
        );
        WorkflowOutcome::Exhausted {
            checks,
            errors,
            retry_url: self.config.templates_url.clone(),
        }
    }
}
