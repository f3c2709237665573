use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewPoint, Point, PointPatch, RoutePoint, RouteStop};
use crate::services::point_service::PointDetail;
use crate::services::route_point_service::AddPointToRoute;
use crate::utils::validation::{validate_display_name, validate_latitude, validate_longitude};

// Request para crear una parada
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePointRequest {
    #[validate(custom = "validate_display_name")]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(custom = "validate_latitude")]
    pub latitude: Decimal,
    #[validate(custom = "validate_longitude")]
    pub longitude: Decimal,
}

impl From<CreatePointRequest> for NewPoint {
    fn from(request: CreatePointRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            description: request.description,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
        }
    }
}

// Request de actualización parcial
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePointRequest {
    #[validate(custom = "validate_display_name")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(custom = "validate_latitude")]
    pub latitude: Option<Decimal>,
    #[validate(custom = "validate_longitude")]
    pub longitude: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl From<UpdatePointRequest> for PointPatch {
    fn from(request: UpdatePointRequest) -> Self {
        Self {
            name: request.name.map(|name| name.trim().to_string()),
            description: request.description,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
            is_active: request.is_active,
        }
    }
}

// Request para asociar una parada a una ruta
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddPointToRouteRequest {
    pub route_id: Uuid,
    pub point_id: Uuid,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
    #[validate(range(min = 0))]
    pub estimated_time: Option<i32>,
}

impl From<AddPointToRouteRequest> for AddPointToRoute {
    fn from(request: AddPointToRouteRequest) -> Self {
        Self {
            route_id: request.route_id,
            point_id: request.point_id,
            order: request.order,
            estimated_time: request.estimated_time,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Point> for PointResponse {
    fn from(point: Point) -> Self {
        Self {
            id: point.id,
            name: point.name,
            description: point.description,
            address: point.address,
            latitude: point.latitude,
            longitude: point.longitude,
            is_active: point.is_active,
            created_at: point.created_at,
            updated_at: point.updated_at,
        }
    }
}

/// Asociación ruta ↔ parada, con la parada embebida
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStopResponse {
    pub id: Uuid,
    pub route_id: Uuid,
    pub order: i32,
    pub estimated_time: Option<i32>,
    pub is_passed: bool,
    pub point: PointResponse,
}

impl From<RouteStop> for RouteStopResponse {
    fn from(stop: RouteStop) -> Self {
        Self {
            id: stop.route_point.id,
            route_id: stop.route_point.route_id,
            order: stop.route_point.order,
            estimated_time: stop.route_point.estimated_time,
            is_passed: stop.route_point.is_passed,
            point: stop.point.into(),
        }
    }
}

/// Pertenencia de una parada a una ruta
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub route_id: Uuid,
    pub order: i32,
    pub estimated_time: Option<i32>,
    pub is_passed: bool,
}

impl From<RoutePoint> for MembershipResponse {
    fn from(route_point: RoutePoint) -> Self {
        Self {
            route_id: route_point.route_id,
            order: route_point.order,
            estimated_time: route_point.estimated_time,
            is_passed: route_point.is_passed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDetailResponse {
    #[serde(flatten)]
    pub point: PointResponse,
    pub routes: Vec<MembershipResponse>,
}

impl From<PointDetail> for PointDetailResponse {
    fn from(detail: PointDetail) -> Self {
        Self {
            point: detail.point.into(),
            routes: detail.memberships.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_point_coordinates_validated() {
        let request: CreatePointRequest = serde_json::from_value(serde_json::json!({
            "name": "Praça da Sé",
            "latitude": -23.5505,
            "longitude": -46.6333
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let out_of_range: CreatePointRequest = serde_json::from_value(serde_json::json!({
            "name": "Polo",
            "latitude": 91.0,
            "longitude": 0.0
        }))
        .unwrap();
        let errors = out_of_range.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("latitude"));
    }

    #[test]
    fn test_add_point_negative_order_rejected() {
        let request: AddPointToRouteRequest = serde_json::from_value(serde_json::json!({
            "routeId": Uuid::new_v4(),
            "pointId": Uuid::new_v4(),
            "order": -1
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }
}
