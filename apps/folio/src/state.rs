use std::sync::Arc;

use crate::status::{NoPortfolios, PortfolioIndex, StatusBoard};

/// Shared application state injected into the status routes via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub board: StatusBoard,
    /// Fallback for ids the board no longer tracks.
    pub portfolios: Arc<dyn PortfolioIndex>,
}

impl AppState {
    pub fn new(board: StatusBoard, portfolios: Arc<dyn PortfolioIndex>) -> Self {
        Self { board, portfolios }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StatusBoard::new(), Arc::new(NoPortfolios))
    }
}
