pub mod auth_routes;
pub mod point_routes;
pub mod public_routes;
pub mod route_routes;

use axum::{
    http::{StatusCode, Uri},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{cors_middleware, rate_limit_middleware};
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(api_index))
        .nest("/auth", auth_routes::auth_routes(state.clone()))
        .nest("/routes", route_routes::create_route_router(state.clone()))
        .nest("/points", point_routes::create_point_router(state.clone()))
        .nest("/public", public_routes::create_public_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(banner))
        .nest("/api", api)
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(cors_middleware(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn banner() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Bus Fleet Status API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api"
    }))
}

async fn api_index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Bus Fleet Status API",
        "endpoints": {
            "auth": {
                "register": "POST /api/auth/register",
                "login": "POST /api/auth/login",
                "promote": "POST /api/auth/promote",
                "profile": "GET /api/auth/profile"
            },
            "routes": {
                "list": "GET /api/routes",
                "create": "POST /api/routes",
                "get": "GET /api/routes/:id",
                "updateStatus": "PUT /api/routes/:id/status",
                "assignDriver": "PUT /api/routes/:id/driver"
            },
            "points": {
                "list": "GET /api/points",
                "create": "POST /api/points",
                "get": "GET /api/points/:id",
                "update": "PUT /api/points/:id",
                "addToRoute": "POST /api/points/route",
                "removeFromRoute": "DELETE /api/points/route/:routeId/:pointId"
            },
            "public": {
                "busStatus": "GET /api/public/bus/:busNumber",
                "health": "GET /api/public/health"
            }
        }
    }))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Not Found",
            "message": format!("Route {} not found", uri.path()),
            "code": "NOT_FOUND"
        })),
    )
}
