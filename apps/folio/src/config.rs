use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::workflow::config::{
    AttemptPolicy, WorkflowConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_REDIRECT_DELAY,
};

pub const DEFAULT_STATUS_PORT: u16 = 8000;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub portfolio_id: String,
    pub view_portfolio_url: String,
    pub check_status_url: String,
    pub templates_url: Option<String>,
    pub max_attempts: u32,
    pub poll_interval: Duration,
    pub progress_interval: Duration,
    pub redirect_delay: Duration,
    pub attempt_policy: AttemptPolicy,
    pub request_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_attempts = parse_or(&lookup, "FOLIO_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            bail!("FOLIO_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            portfolio_id: require(&lookup, "FOLIO_PORTFOLIO_ID")?,
            view_portfolio_url: require(&lookup, "FOLIO_VIEW_PORTFOLIO_URL")?,
            check_status_url: require(&lookup, "FOLIO_CHECK_STATUS_URL")?,
            templates_url: lookup("FOLIO_TEMPLATES_URL").filter(|v| !v.trim().is_empty()),
            max_attempts,
            poll_interval: nonzero_millis_or(
                &lookup,
                "FOLIO_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL,
            )?,
            progress_interval: nonzero_millis_or(
                &lookup,
                "FOLIO_PROGRESS_INTERVAL_MS",
                DEFAULT_PROGRESS_INTERVAL,
            )?,
            redirect_delay: millis_or(&lookup, "FOLIO_REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY)?,
            attempt_policy: parse_or(&lookup, "FOLIO_ATTEMPT_POLICY", AttemptPolicy::default())?,
            request_timeout: lookup("FOLIO_REQUEST_TIMEOUT_SECS")
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map(Duration::from_secs)
                        .context("FOLIO_REQUEST_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn workflow(&self) -> WorkflowConfig {
        WorkflowConfig {
            portfolio_id: self.portfolio_id.clone(),
            view_portfolio_url: self.view_portfolio_url.clone(),
            check_status_url: self.check_status_url.clone(),
            templates_url: self.templates_url.clone(),
            progress_interval: self.progress_interval,
            poll_interval: self.poll_interval,
            redirect_delay: self.redirect_delay,
            max_attempts: self.max_attempts,
            attempt_policy: self.attempt_policy,
        }
    }
}

/// Configuration for the `folio-status` server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Portfolio ids reported as `complete` when the board has no entry.
    pub known_portfolios: Vec<String>,
    pub rust_log: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(ServerConfig {
            port: parse_or(&lookup, "FOLIO_STATUS_PORT", DEFAULT_STATUS_PORT)?,
            known_portfolios: lookup("FOLIO_KNOWN_PORTFOLIOS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} is invalid: {e}")),
        None => Ok(default),
    }
}

fn millis_or<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .with_context(|| format!("{key} must be a whole number of milliseconds")),
        None => Ok(default),
    }
}

/// Like [`millis_or`], but a zero interval is an error.
fn nonzero_millis_or<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let interval = millis_or(lookup, key, default)?;
    if interval.is_zero() {
        bail!("{key} must be greater than zero");
    }
    Ok(interval)
}
