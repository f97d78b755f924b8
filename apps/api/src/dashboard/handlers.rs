use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dashboard::{DashboardOverview, PanelState, Tab};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectTabRequest {
    pub tab: Tab,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTabResponse {
    pub active_tab: Tab,
    pub previous_tab: Tab,
}

#[derive(Debug, Serialize)]
pub struct PanelResponse {
    pub tab: Tab,
    #[serde(flatten)]
    pub state: PanelState,
}

/// GET /api/v1/dashboard
pub async fn handle_overview(State(state): State<AppState>) -> Json<DashboardOverview> {
    Json(state.dashboard.overview())
}

/// PUT /api/v1/dashboard/tab
///
/// Navigating away from a tab discards its panel state, including any in-flight result.
pub async fn handle_select_tab(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SelectTabResponse>, AppError> {
    let request: SelectTabRequest = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("invalid tab selection: {e}")))?;
    let previous_tab = state.dashboard.select(request.tab);
    Ok(Json(SelectTabResponse {
        active_tab: request.tab,
        previous_tab,
    }))
}

/// GET /api/v1/dashboard/panels/:tab
pub async fn handle_get_panel(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> Result<Json<PanelResponse>, AppError> {
    let tab: Tab = tab.parse().map_err(AppError::NotFound)?;
    Ok(Json(PanelResponse {
        tab,
        state: state.dashboard.panel(tab).snapshot(),
    }))
}
