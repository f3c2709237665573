//! Gestión de la asociación ruta ↔ parada (sólo administradores)
//!
//! Al quitar una parada no se renumeran las restantes: se permiten huecos
//! en `order`.

use tracing::info;
use uuid::Uuid;

use crate::models::{NewRoutePoint, RouteStop};
use crate::repositories::SharedStore;
use crate::utils::errors::{validation_error, AppError, AppResult};

/// Petición de alta de una parada en una ruta
#[derive(Debug, Clone)]
pub struct AddPointToRoute {
    pub route_id: Uuid,
    pub point_id: Uuid,
    pub order: Option<i32>,
    pub estimated_time: Option<i32>,
}

pub struct RoutePointService {
    store: SharedStore,
}

impl RoutePointService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn add_point_to_route(&self, request: AddPointToRoute) -> AppResult<RouteStop> {
        if request.order.is_some_and(|order| order < 0) {
            return Err(validation_error("order", "Order must be greater than or equal to 0"));
        }
        if request.estimated_time.is_some_and(|minutes| minutes < 0) {
            return Err(validation_error(
                "estimatedTime",
                "Estimated time must be greater than or equal to 0",
            ));
        }

        self.store
            .find_route_by_id(request.route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        let point = self
            .store
            .find_point_by_id(request.point_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;

        if self
            .store
            .find_route_point(request.route_id, request.point_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Point is already associated with this route".to_string(),
            ));
        }

        let order = match request.order {
            Some(order) => {
                if self
                    .store
                    .find_route_point_by_order(request.route_id, order)
                    .await?
                    .is_some()
                {
                    return Err(AppError::Conflict(format!(
                        "Order {} is already in use on this route",
                        order
                    )));
                }
                order
            }
            None => self
                .store
                .max_route_point_order(request.route_id)
                .await?
                .map_or(0, |max| max + 1),
        };

        let route_point = self
            .store
            .insert_route_point(NewRoutePoint {
                route_id: request.route_id,
                point_id: request.point_id,
                order,
                estimated_time: request.estimated_time,
            })
            .await?;

        info!(
            route_id = %request.route_id,
            point_id = %request.point_id,
            order,
            "📍 Parada añadida a la ruta"
        );

        Ok(RouteStop { route_point, point })
    }

    pub async fn remove_point_from_route(&self, route_id: Uuid, point_id: Uuid) -> AppResult<()> {
        if !self.store.delete_route_point(route_id, point_id).await? {
            return Err(AppError::NotFound(
                "Association between route and point not found".to_string(),
            ));
        }

        info!(route_id = %route_id, point_id = %point_id, "🗑️ Parada quitada de la ruta");
        Ok(())
    }
}
