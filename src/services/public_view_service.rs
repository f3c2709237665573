//! Vista pública del estado de un autobús
//!
//! Lectura pura: nunca modifica `is_passed`. Si el índice actual no coincide
//! con ningún `order` (ruta sin paradas, o autobús fuera del trazado), la
//! parada actual y la siguiente quedan ausentes; no es un error.

use crate::dto::public_dto::{PublicRouteView, PublicStop};
use crate::models::{Route, RouteStop};
use crate::repositories::FleetStore;
use crate::services::route_status_service::occupancy_percentage;
use crate::utils::errors::{AppError, AppResult};

/// Proyectar ruta y paradas en la vista pública
pub fn build_public_view(route: &Route, stops: &[RouteStop]) -> PublicRouteView {
    let mut all_points: Vec<PublicStop> = stops.iter().map(PublicStop::from).collect();
    all_points.sort_by_key(|stop| stop.order);

    let find_at = |order: i32| all_points.iter().find(|stop| stop.order == order).cloned();
    let current_point = find_at(route.current_point_index);
    let next_point = route.current_point_index.checked_add(1).and_then(find_at);

    PublicRouteView {
        bus_number: route.bus_number.clone(),
        route_name: route.name.clone(),
        is_active: route.is_active,
        current_passengers: route.current_passengers,
        max_capacity: route.max_capacity,
        occupancy_percentage: occupancy_percentage(route.current_passengers, route.max_capacity),
        current_point,
        next_point,
        all_points,
    }
}

/// Estado público de un autobús por su número
pub async fn public_status(store: &dyn FleetStore, bus_number: &str) -> AppResult<PublicRouteView> {
    let route = store
        .find_route_by_bus_number(bus_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bus '{}' not found", bus_number)))?;

    let stops = store.list_route_stops(route.id).await?;
    Ok(build_public_view(&route, &stops))
}
