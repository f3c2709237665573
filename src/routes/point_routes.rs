use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::point_controller::{PointController, RoutePointEnvelope};
use crate::dto::point_dto::{
    AddPointToRouteRequest, CreatePointRequest, PointDetailResponse, PointResponse,
    UpdatePointRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::{admin_only_middleware, auth_middleware};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath};

/// Paradas y asociación ruta ↔ parada
pub fn create_point_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_points).merge(
                post(create_point).route_layer(middleware::from_fn(admin_only_middleware)),
            ),
        )
        .route(
            "/route",
            post(add_point_to_route).route_layer(middleware::from_fn(admin_only_middleware)),
        )
        .route(
            "/route/:route_id/:point_id",
            delete(remove_point_from_route)
                .route_layer(middleware::from_fn(admin_only_middleware)),
        )
        .route(
            "/:id",
            get(get_point).merge(
                put(update_point).route_layer(middleware::from_fn(admin_only_middleware)),
            ),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_point(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreatePointRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PointResponse>>), AppError> {
    let controller = PointController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_points(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PointResponse>>>, AppError> {
    let controller = PointController::new(&state);
    Ok(Json(controller.list().await?))
}

async fn get_point(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<PointDetailResponse>>, AppError> {
    let controller = PointController::new(&state);
    Ok(Json(controller.get(id).await?))
}

async fn update_point(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdatePointRequest>,
) -> Result<Json<ApiResponse<PointResponse>>, AppError> {
    let controller = PointController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn add_point_to_route(
    State(state): State<AppState>,
    AppJson(request): AppJson<AddPointToRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoutePointEnvelope>>), AppError> {
    let controller = PointController::new(&state);
    let response = controller.add_to_route(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn remove_point_from_route(
    State(state): State<AppState>,
    AppPath((route_id, point_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PointController::new(&state);
    Ok(Json(controller.remove_from_route(route_id, point_id).await?))
}
