//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::repositories::SharedStore;
use crate::services::{AuthService, PointService, RoutePointService, RouteService, RouteStatusEngine};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitState,
    pub auth: Arc<AuthService>,
    pub routes: Arc<RouteService>,
    pub route_status: Arc<RouteStatusEngine>,
    pub points: Arc<PointService>,
    pub route_points: Arc<RoutePointService>,
}

impl AppState {
    pub fn new(store: SharedStore, config: EnvironmentConfig) -> Self {
        let jwt = JwtConfig::from(&config);

        Self {
            auth: Arc::new(AuthService::new(
                store.clone(),
                jwt.clone(),
                config.admin_key.clone(),
            )),
            routes: Arc::new(RouteService::new(store.clone())),
            route_status: Arc::new(RouteStatusEngine::new(store.clone())),
            points: Arc::new(PointService::new(store.clone())),
            route_points: Arc::new(RoutePointService::new(store.clone())),
            rate_limit: RateLimitState::new(&config),
            jwt,
            store,
            config,
        }
    }
}
