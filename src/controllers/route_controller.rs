use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::route_dto::{
    AssignDriverRequest, CreateRouteRequest, RouteEnvelope, RouteResponse,
    UpdateRouteStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::{AuthenticatedUser, RouteStatusPatch};
use crate::repositories::SharedStore;
use crate::services::authorization_service::authorize;
use crate::services::{RouteService, RouteStatusEngine};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct RouteController {
    store: SharedStore,
    routes: Arc<RouteService>,
    engine: Arc<RouteStatusEngine>,
}

impl RouteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            routes: state.routes.clone(),
            engine: state.route_status.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateRouteRequest,
    ) -> AppResult<ApiResponse<RouteEnvelope>> {
        request.validate()?;
        let detail = self.routes.create(request.into()).await?;

        Ok(ApiResponse::success_with_message(
            detail.into(),
            "Route created successfully",
        ))
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<RouteResponse>>> {
        let routes = self.routes.list().await?;
        Ok(ApiResponse::success(
            routes.into_iter().map(RouteResponse::from).collect(),
        ))
    }

    pub async fn get(&self, route_id: Uuid) -> AppResult<ApiResponse<RouteEnvelope>> {
        let detail = self.routes.get(route_id).await?;
        Ok(ApiResponse::success(detail.into()))
    }

    /// Actualizar el estado de una ruta: primero se autoriza, luego se
    /// interpreta y valida el body y por último se aplica el patch
    pub async fn update_status(
        &self,
        caller: &AuthenticatedUser,
        route_id: Uuid,
        body: Value,
    ) -> AppResult<ApiResponse<RouteEnvelope>> {
        let grant = authorize(self.store.as_ref(), caller, route_id)
            .await?
            .into_result()?;

        let request: UpdateRouteStatusRequest = serde_json::from_value(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid status update: {}", e)))?;
        request.validate()?;
        let patch = RouteStatusPatch::from(request);

        info!(
            route_id = %route_id,
            caller_id = %caller.id,
            grant = ?grant,
            "🔄 Actualización de estado solicitada"
        );

        let detail = self.engine.update_status(route_id, patch).await?;

        Ok(ApiResponse::success_with_message(
            detail.into(),
            "Route status updated successfully",
        ))
    }

    pub async fn assign_driver(
        &self,
        route_id: Uuid,
        request: AssignDriverRequest,
    ) -> AppResult<ApiResponse<RouteEnvelope>> {
        let detail = self
            .routes
            .assign_driver(route_id, request.driver_id)
            .await?;

        let message = if request.driver_id.is_some() {
            "Driver assigned successfully"
        } else {
            "Driver unassigned successfully"
        };

        Ok(ApiResponse::success_with_message(detail.into(), message))
    }
}
