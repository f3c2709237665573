use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::controllers::public_controller::{HealthStatus, PublicController};
use crate::dto::public_dto::PublicRouteView;
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppPath;

/// Rutas públicas, sin autenticación
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/bus/:bus_number", get(bus_status))
        .route("/health", get(health))
}

async fn bus_status(
    State(state): State<AppState>,
    AppPath(bus_number): AppPath<String>,
) -> Result<Json<ApiResponse<PublicRouteView>>, AppError> {
    let controller = PublicController::new(&state);
    Ok(Json(controller.bus_status(&bus_number).await?))
}

async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    Json(PublicController::new(&state).health())
}
