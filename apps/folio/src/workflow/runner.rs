//! Generation workflow: presenter and poller sharing one progress state.

use tokio::sync::watch;
use tracing::info;

use crate::workflow::client::StatusSource;
use crate::workflow::config::WorkflowConfig;
use crate::workflow::navigator::Navigator;
use crate::workflow::poller::{StatusPoller, WorkflowOutcome};
use crate::workflow::presenter::SyntheticProgress;
use crate::workflow::state::ProgressState;

/// One page session's worth of generation tracking.
///
/// The watch sender is the only writer handle to `ProgressState`; callers get
/// read-only receivers via [`GenerationWorkflow::subscribe`]. Dropping the
/// future returned by [`GenerationWorkflow::run`] cancels both timer loops and
/// any in-flight status request.
pub struct GenerationWorkflow<S, N> {
    config: WorkflowConfig,
    source: S,
    navigator: N,
    state: watch::Sender<ProgressState>,
}

impl<S, N> GenerationWorkflow<S, N>
where
    S: StatusSource,
    N: Navigator,
{
    pub fn new(config: WorkflowConfig, source: S, navigator: N) -> Self {
        let (state, _) = watch::channel(ProgressState::new());
        Self {
            config,
            source,
            navigator,
            state,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ProgressState {
        self.state.borrow().clone()
    }

    /// Runs the presenter and the poller side by side until the poller
    /// reaches a terminal state.
    pub async fn run(&self) -> WorkflowOutcome {
        info!(
            portfolio_id = self.config.portfolio_id.as_str(),
            status_url = self.config.check_status_url.as_str(),
            "Starting generation workflow"
        );

        let presenter = SyntheticProgress::new(&self.state, self.config.progress_interval);
        let poller = StatusPoller::new(&self.source, &self.navigator, &self.state, &self.config);

        let ((), outcome) = tokio::join!(presenter.run(), poller.run());
        outcome
    }
}

/// Logs every progress change until the workflow reaches a terminal phase
/// or is dropped. Returns the last state it logged.
pub async fn log_progress(mut rx: watch::Receiver<ProgressState>) -> ProgressState {
    let mut last = rx.borrow_and_update().clone();
    while rx.changed().await.is_ok() {
        last = rx.borrow_and_update().clone();
        info!(
            percent = last.percent,
            phase = ?last.phase,
            style = ?last.style,
            checks = last.check_count,
            errors = last.error_count,
            "{}",
            last.message
        );
        if last.phase.is_terminal() {
            break;
        }
    }
    last
}
