use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{
    AssignDriverRequest, CreateRouteRequest, RouteEnvelope, RouteResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::{admin_only_middleware, auth_middleware};
use crate::models::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath};

/// Rutas de autobús; todas requieren token, alta y asignación sólo admin
pub fn create_route_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_routes).merge(
                post(create_route).route_layer(middleware::from_fn(admin_only_middleware)),
            ),
        )
        .route("/:id", get(get_route))
        .route("/:id/status", put(update_route_status))
        .route(
            "/:id/driver",
            put(assign_driver).route_layer(middleware::from_fn(admin_only_middleware)),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_route(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RouteEnvelope>>), AppError> {
    let controller = RouteController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RouteResponse>>>, AppError> {
    let controller = RouteController::new(&state);
    Ok(Json(controller.list().await?))
}

async fn get_route(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<RouteEnvelope>>, AppError> {
    let controller = RouteController::new(&state);
    Ok(Json(controller.get(id).await?))
}

async fn update_route_status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<Value>,
) -> Result<Json<ApiResponse<RouteEnvelope>>, AppError> {
    let controller = RouteController::new(&state);
    Ok(Json(controller.update_status(&caller, id, body).await?))
}

async fn assign_driver(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<AssignDriverRequest>,
) -> Result<Json<ApiResponse<RouteEnvelope>>, AppError> {
    let controller = RouteController::new(&state);
    Ok(Json(controller.assign_driver(id, request).await?))
}
