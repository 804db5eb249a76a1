//! Axum route handlers for the status endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::status::board::{StatusBoard, COMPLETED_MESSAGE};
use crate::status::index::PortfolioIndex;
use crate::workflow::state::{GenerationStatus, StatusReport};

pub const NOT_FOUND_MESSAGE: &str = "Portfolio not found";

/// Status for one portfolio: the board entry if tracked, otherwise
/// `complete` for portfolios the index knows and `not_found` for the rest.
pub async fn resolve_status(
    board: &StatusBoard,
    index: &dyn PortfolioIndex,
    portfolio_id: &str,
) -> Result<StatusReport, AppError> {
    if let Some(entry) = board.get(portfolio_id).await {
        return Ok(StatusReport {
            status: entry.status,
            message: Some(entry.message),
        });
    }

    let report = if index.exists(portfolio_id).await? {
        StatusReport {
            status: GenerationStatus::Complete,
            message: Some(COMPLETED_MESSAGE.to_string()),
        }
    } else {
        StatusReport {
            status: GenerationStatus::NotFound,
            message: Some(NOT_FOUND_MESSAGE.to_string()),
        }
    };
    Ok(report)
}

/// GET /check-status/:portfolio_id
///
/// Always 200 with `{"status", "message"}`; unknown ids report `not_found`.
pub async fn handle_check_status(
    State(state): State<AppState>,
    Path(portfolio_id): Path<String>,
) -> Result<Json<StatusReport>, AppError> {
    let portfolio_id = portfolio_id.trim();
    if portfolio_id.is_empty() {
        return Err(AppError::Validation(
            "portfolio_id cannot be empty".to_string(),
        ));
    }

    let report = resolve_status(&state.board, state.portfolios.as_ref(), portfolio_id).await?;
    Ok(Json(report))
}
