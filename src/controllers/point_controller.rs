use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::dto::point_dto::{
    AddPointToRouteRequest, CreatePointRequest, PointDetailResponse, PointResponse,
    RouteStopResponse, UpdatePointRequest,
};
use crate::dto::ApiResponse;
use crate::services::{PointService, RoutePointService};
use crate::state::AppState;
use crate::utils::errors::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePointEnvelope {
    pub route_point: RouteStopResponse,
}

pub struct PointController {
    points: Arc<PointService>,
    route_points: Arc<RoutePointService>,
}

impl PointController {
    pub fn new(state: &AppState) -> Self {
        Self {
            points: state.points.clone(),
            route_points: state.route_points.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreatePointRequest,
    ) -> AppResult<ApiResponse<PointResponse>> {
        request.validate()?;
        let point = self.points.create(request.into()).await?;

        Ok(ApiResponse::success_with_message(
            point.into(),
            "Point created successfully",
        ))
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<PointResponse>>> {
        let points = self.points.list_active().await?;
        Ok(ApiResponse::success(
            points.into_iter().map(PointResponse::from).collect(),
        ))
    }

    pub async fn get(&self, point_id: Uuid) -> AppResult<ApiResponse<PointDetailResponse>> {
        let detail = self.points.get(point_id).await?;
        Ok(ApiResponse::success(detail.into()))
    }

    pub async fn update(
        &self,
        point_id: Uuid,
        request: UpdatePointRequest,
    ) -> AppResult<ApiResponse<PointResponse>> {
        request.validate()?;
        let point = self.points.update(point_id, request.into()).await?;

        Ok(ApiResponse::success_with_message(
            point.into(),
            "Point updated successfully",
        ))
    }

    pub async fn add_to_route(
        &self,
        request: AddPointToRouteRequest,
    ) -> AppResult<ApiResponse<RoutePointEnvelope>> {
        request.validate()?;
        let stop = self.route_points.add_point_to_route(request.into()).await?;

        Ok(ApiResponse::success_with_message(
            RoutePointEnvelope {
                route_point: stop.into(),
            },
            "Point added to route successfully",
        ))
    }

    pub async fn remove_from_route(
        &self,
        route_id: Uuid,
        point_id: Uuid,
    ) -> AppResult<ApiResponse<()>> {
        self.route_points
            .remove_point_from_route(route_id, point_id)
            .await?;

        Ok(ApiResponse::message("Point removed from route successfully"))
    }
}
