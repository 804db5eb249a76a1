use std::str::FromStr;
use std::time::Duration;

use anyhow::bail;

use crate::workflow::state::ProgressState;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(1);

/// Which status checks count against `max_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptPolicy {
    /// Pending responses and failed checks share one budget.
    #[default]
    SharedBudget,
    /// Only pending responses count. Failed checks retry forever.
    ErrorsExempt,
}

impl FromStr for AttemptPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" | "shared-budget" => Ok(AttemptPolicy::SharedBudget),
            "errors-exempt" | "exempt" => Ok(AttemptPolicy::ErrorsExempt),
            other => bail!("unknown attempt policy '{other}' (expected 'shared' or 'errors-exempt')"),
        }
    }
}

/// Everything one generation workflow needs, handed in at construction.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub portfolio_id: String,
    /// Redirect destination once generation completes.
    pub view_portfolio_url: String,
    pub check_status_url: String,
    /// Where the user restarts generation after the workflow gives up.
    pub templates_url: Option<String>,
    pub progress_interval: Duration,
    pub poll_interval: Duration,
    pub redirect_delay: Duration,
    pub max_attempts: u32,
    pub attempt_policy: AttemptPolicy,
}

impl WorkflowConfig {
    pub fn new(
        portfolio_id: impl Into<String>,
        view_portfolio_url: impl Into<String>,
        check_status_url: impl Into<String>,
    ) -> Self {
        Self {
            portfolio_id: portfolio_id.into(),
            view_portfolio_url: view_portfolio_url.into(),
            check_status_url: check_status_url.into(),
            templates_url: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_policy: AttemptPolicy::default(),
        }
    }

    /// Checks spent against `max_attempts` under the configured policy.
    pub fn attempts_spent(&self, state: &ProgressState) -> u32 {
        match self.attempt_policy {
            AttemptPolicy::SharedBudget => state.check_count.saturating_add(state.error_count),
            AttemptPolicy::ErrorsExempt => state.check_count,
        }
    }

    pub fn budget_exhausted(&self, state: &ProgressState) -> bool {
        self.attempts_spent(state) >= self.max_attempts
    }
}
