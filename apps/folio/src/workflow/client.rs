//! Status endpoint client.
//!
//! `StatusSource` is the seam the poller talks through. `HttpStatusSource`
//! is the production implementation; tests script their own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use tracing::debug;

use crate::errors::StatusError;
use crate::workflow::state::StatusReport;

/// One status check against the generation backend.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusReport, StatusError>;
}

/// GETs the status URL and decodes `{"status": ..}` from the body.
///
/// Non-2xx responses become `StatusError::Status`; malformed bodies and a
/// missing `status` field become `StatusError::Parse`.
#[derive(Clone)]
pub struct HttpStatusSource {
    client: Client,
    url: String,
}

impl HttpStatusSource {
    /// Builds the client. `timeout` of `None` leaves requests unbounded.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, StatusError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<StatusReport, StatusError> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let report: StatusReport = serde_json::from_str(&body)?;

        debug!(url = %self.url, status = report.status.as_str(), "Status check succeeded");
        Ok(report)
    }
}
