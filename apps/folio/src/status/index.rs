use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

/// Lookup of portfolios that already exist in persistent storage.
///
/// Consulted when an id has no entry on the status board: a portfolio that
/// exists but is no longer tracked finished in an earlier process lifetime.
#[async_trait]
pub trait PortfolioIndex: Send + Sync {
    async fn exists(&self, portfolio_id: &str) -> Result<bool>;
}

/// Index with no portfolios. Every untracked id is `not_found`.
pub struct NoPortfolios;

#[async_trait]
impl PortfolioIndex for NoPortfolios {
    async fn exists(&self, _portfolio_id: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Fixed set of known portfolio ids.
#[derive(Default)]
pub struct KnownPortfolios {
    ids: HashSet<String>,
}

impl KnownPortfolios {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl PortfolioIndex for KnownPortfolios {
    async fn exists(&self, portfolio_id: &str) -> Result<bool> {
        Ok(self.ids.contains(portfolio_id))
    }
}
