use axum::{extract::State, Json};
use serde::Serialize;

use crate::catalog::Level;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PositionListResponse {
    /// Position names in workbook row order.
    pub positions: Vec<String>,
    /// The closed set of level labels, in evaluation order.
    pub levels: Vec<&'static str>,
}

/// GET /api/v1/positions
///
/// The selectable positions plus the level labels. Answers with the blocking
/// 503 notice while the workbook is unavailable.
pub async fn handle_list_positions(
    State(state): State<AppState>,
) -> Result<Json<PositionListResponse>, AppError> {
    let catalog = state.catalog()?;
    Ok(Json(PositionListResponse {
        positions: catalog.names().to_vec(),
        levels: Level::ALL.iter().map(|level| level.label()).collect(),
    }))
}
