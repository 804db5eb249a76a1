//! Status board: process-wide generation statuses keyed by portfolio id.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::workflow::state::GenerationStatus;

pub const STARTING_MESSAGE: &str = "Starting portfolio generation...";
pub const COMPLETED_MESSAGE: &str = "Portfolio generated successfully!";
pub const PANICKED_MESSAGE: &str = "Portfolio generation task panicked";
pub const CANCELLED_MESSAGE: &str = "Portfolio generation was cancelled";

#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub status: GenerationStatus,
    pub message: String,
    pub updated_at: DateTime<Utc>,
}

impl StatusEntry {
    fn new(status: GenerationStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Shared, cloneable handle to the status map.
#[derive(Clone, Default)]
pub struct StatusBoard {
    entries: Arc<RwLock<HashMap<String, StatusEntry>>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self, portfolio_id: &str) {
        self.set(
            portfolio_id,
            StatusEntry::new(GenerationStatus::Processing, STARTING_MESSAGE),
        )
        .await;
    }

    pub async fn complete(&self, portfolio_id: &str) {
        self.set(
            portfolio_id,
            StatusEntry::new(GenerationStatus::Complete, COMPLETED_MESSAGE),
        )
        .await;
    }

    pub async fn fail(&self, portfolio_id: &str, message: impl Into<String>) {
        self.set(portfolio_id, StatusEntry::new(GenerationStatus::Error, message))
            .await;
    }

    pub async fn get(&self, portfolio_id: &str) -> Option<StatusEntry> {
        self.entries.read().await.get(portfolio_id).cloned()
    }

    /// Drops an entry. Pollers then fall back to the portfolio index.
    pub async fn forget(&self, portfolio_id: &str) -> Option<StatusEntry> {
        self.entries.write().await.remove(portfolio_id)
    }

    async fn set(&self, portfolio_id: &str, entry: StatusEntry) {
        self.entries
            .write()
            .await
            .insert(portfolio_id.to_string(), entry);
    }
}

/// Marks `portfolio_id` as processing and runs `job` on its own task,
/// recording `complete` or `error` when it finishes. A job that panics or is
/// cancelled is recorded as `error`, never left as `processing`.
pub async fn track_generation<F, E>(
    board: StatusBoard,
    portfolio_id: String,
    job: F,
) -> JoinHandle<()>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    board.begin(&portfolio_id).await;
    info!(portfolio_id = %portfolio_id, "Portfolio generation started");

    let job = tokio::spawn(job);
    tokio::spawn(async move {
        match job.await {
            Ok(Ok(())) => {
                board.complete(&portfolio_id).await;
                info!(portfolio_id = %portfolio_id, "Portfolio generation finished");
            }
            Ok(Err(e)) => {
                error!(portfolio_id = %portfolio_id, error = %e, "Portfolio generation failed");
                board.fail(&portfolio_id, e.to_string()).await;
            }
            Err(join_err) => {
                let message = if join_err.is_panic() {
                    PANICKED_MESSAGE
                } else {
                    CANCELLED_MESSAGE
                };
                error!(portfolio_id = %portfolio_id, error = %join_err, "Portfolio generation task died");
                board.fail(&portfolio_id, message).await;
            }
        }
    })
}
