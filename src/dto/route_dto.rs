use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::point_dto::RouteStopResponse;
use crate::models::{RouteStatusPatch, User};
use crate::services::route_service::{CreateRoute, RouteDetail};
use crate::services::route_status_service::occupancy_percentage;
use crate::utils::validation::{validate_display_name, validate_not_empty};

// Request para crear una ruta
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    #[validate(custom = "validate_display_name")]
    pub name: String,
    #[validate(length(max = 255), custom = "validate_not_empty")]
    pub bus_number: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub max_capacity: Option<i32>,
    pub driver_id: Option<Uuid>,
}

impl From<CreateRouteRequest> for CreateRoute {
    fn from(request: CreateRouteRequest) -> Self {
        Self {
            name: request.name,
            bus_number: request.bus_number,
            description: request.description,
            max_capacity: request.max_capacity,
            driver_id: request.driver_id,
        }
    }
}

/// Cuerpo de `PUT /routes/{id}/status`; los campos ausentes no se tocan
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteStatusRequest {
    #[validate(range(min = 0))]
    pub current_passengers: Option<i32>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0))]
    pub current_point_index: Option<i32>,
}

impl From<UpdateRouteStatusRequest> for RouteStatusPatch {
    fn from(request: UpdateRouteStatusRequest) -> Self {
        Self {
            current_passengers: request.current_passengers,
            is_active: request.is_active,
            current_point_index: request.current_point_index,
        }
    }
}

// `driverId: null` desasigna el conductor
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDriverRequest {
    pub driver_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DriverSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for DriverSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub id: Uuid,
    pub name: String,
    pub bus_number: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub current_passengers: i32,
    pub max_capacity: i32,
    pub occupancy_percentage: i32,
    pub current_point_index: i32,
    pub driver_id: Option<Uuid>,
    pub driver: Option<DriverSummary>,
    pub route_points: Vec<RouteStopResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RouteDetail> for RouteResponse {
    fn from(detail: RouteDetail) -> Self {
        let route = detail.route;
        Self {
            occupancy_percentage: occupancy_percentage(route.current_passengers, route.max_capacity),
            id: route.id,
            name: route.name,
            bus_number: route.bus_number,
            description: route.description,
            is_active: route.is_active,
            current_passengers: route.current_passengers,
            max_capacity: route.max_capacity,
            current_point_index: route.current_point_index,
            driver_id: route.driver_id,
            driver: detail.driver.map(Into::into),
            route_points: detail.stops.into_iter().map(Into::into).collect(),
            created_at: route.created_at,
            updated_at: route.updated_at,
        }
    }
}

/// `{ route }` dentro de `data`
#[derive(Debug, Serialize)]
pub struct RouteEnvelope {
    pub route: RouteResponse,
}

impl From<RouteDetail> for RouteEnvelope {
    fn from(detail: RouteDetail) -> Self {
        Self {
            route: detail.into(),
        }
    }
}
