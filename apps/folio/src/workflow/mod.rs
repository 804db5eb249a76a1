// Generation status workflow: synthetic progress + status polling + redirect.
// Presenter and poller share one ProgressState through a watch channel; the
// poller alone may mark completion.

pub mod client;
pub mod config;
pub mod messages;
pub mod navigator;
pub mod poller;
pub mod presenter;
pub mod runner;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpStatusSource, StatusSource};
pub use config::{AttemptPolicy, WorkflowConfig};
pub use navigator::{Navigator, StdoutNavigator};
pub use poller::WorkflowOutcome;
pub use runner::{log_progress, GenerationWorkflow};
pub use state::{GenerationStatus, PollPhase, ProgressState, ProgressStyle, StatusReport};
