use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthResponse, LoginRequest, PromoteRequest, RegisterRequest, UserEnvelope};
use crate::dto::ApiResponse;
use crate::middleware::auth_middleware;
use crate::models::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

/// Configura las rutas de autenticación
pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/promote", post(promote))
        .route(
            "/profile",
            get(profile).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let controller = AuthController::new(&state);
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.login(request).await?))
}

async fn promote(
    State(state): State<AppState>,
    AppJson(request): AppJson<PromoteRequest>,
) -> Result<Json<ApiResponse<UserEnvelope>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.promote(request).await?))
}

async fn profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserEnvelope>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.profile(&caller).await?))
}
