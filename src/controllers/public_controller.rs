use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dto::public_dto::PublicRouteView;
use crate::dto::ApiResponse;
use crate::repositories::SharedStore;
use crate::services::public_view_service::public_status;
use crate::state::AppState;
use crate::utils::errors::AppResult;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
}

pub struct PublicController {
    store: SharedStore,
    environment: String,
}

impl PublicController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            environment: state.config.environment.clone(),
        }
    }

    pub async fn bus_status(&self, bus_number: &str) -> AppResult<ApiResponse<PublicRouteView>> {
        let view = public_status(self.store.as_ref(), bus_number).await?;
        Ok(ApiResponse::success(view))
    }

    pub fn health(&self) -> ApiResponse<HealthStatus> {
        ApiResponse::success_with_message(
            HealthStatus {
                status: "ok",
                environment: self.environment.clone(),
                timestamp: Utc::now(),
            },
            "API is running",
        )
    }
}
