//! Scripted collaborators shared by the workflow unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::errors::StatusError;
use crate::workflow::client::StatusSource;
use crate::workflow::navigator::Navigator;
use crate::workflow::state::{GenerationStatus, StatusReport};

pub fn pending() -> Result<StatusReport, StatusError> {
    Ok(StatusReport {
        status: GenerationStatus::Processing,
        message: Some("Starting portfolio generation...".to_string()),
    })
}

pub fn complete() -> Result<StatusReport, StatusError> {
    Ok(StatusReport {
        status: GenerationStatus::Complete,
        message: None,
    })
}

pub fn server_error() -> Result<StatusReport, StatusError> {
    Err(StatusError::Status { status: 503 })
}

/// Replays queued results in order; answers `pending` once the script runs out.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<StatusReport, StatusError>>>,
    calls: AtomicUsize,
    call_times: Mutex<Vec<Instant>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<StatusReport, StatusError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            call_times: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self) -> Result<StatusReport, StatusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(pending)
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<(String, Instant)>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<(String, Instant)> {
        self.visits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, url: &str) {
        self.visits
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
    }
}
