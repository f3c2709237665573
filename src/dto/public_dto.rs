//! Vista pública (sin autenticación) del estado de un autobús

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::RouteStop;

/// Parada tal como la ve el público
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStop {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub order: i32,
    pub is_passed: bool,
    pub estimated_time: Option<i32>,
}

impl From<&RouteStop> for PublicStop {
    fn from(stop: &RouteStop) -> Self {
        Self {
            id: stop.point.id,
            name: stop.point.name.clone(),
            description: stop.point.description.clone(),
            address: stop.point.address.clone(),
            latitude: stop.point.latitude,
            longitude: stop.point.longitude,
            order: stop.route_point.order,
            is_passed: stop.route_point.is_passed,
            estimated_time: stop.route_point.estimated_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRouteView {
    pub bus_number: String,
    pub route_name: String,
    pub is_active: bool,
    pub current_passengers: i32,
    pub max_capacity: i32,
    pub occupancy_percentage: i32,
    pub current_point: Option<PublicStop>,
    pub next_point: Option<PublicStop>,
    pub all_points: Vec<PublicStop>,
}
