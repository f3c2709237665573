//! Motor de estado de rutas
//!
//! Valida y aplica actualizaciones de estado (pasajeros, activa, parada
//! actual) y recalcula qué paradas ya fueron pasadas.
//!
//! La reclasificación de `is_passed` es un recálculo completo a partir del
//! nuevo índice: `order <= índice` ⇒ pasada, `order > índice` ⇒ pendiente.
//! Así, índices repetidos o que retroceden siempre convergen al mismo estado.

use tracing::info;
use uuid::Uuid;

use crate::models::{Route, RoutePoint, RouteStatusPatch};
use crate::repositories::SharedStore;
use crate::services::route_service::{load_route_detail, RouteDetail};
use crate::utils::errors::{validation_error, AppError, AppResult};

/// Porcentaje de ocupación redondeado (half-up) en aritmética entera
pub fn occupancy_percentage(current_passengers: i32, max_capacity: i32) -> i32 {
    if max_capacity <= 0 {
        return 0;
    }
    let current = i64::from(current_passengers.max(0));
    let max = i64::from(max_capacity);
    // round(current * 100 / max) == floor((current * 200 + max) / (2 * max))
    ((current * 200 + max) / (2 * max)) as i32
}

/// Una parada se considera pasada si su orden no supera el índice actual
pub fn is_passed_at(order: i32, current_point_index: i32) -> bool {
    order <= current_point_index
}

/// Recalcular `is_passed` de todas las paradas dadas para el índice
pub fn reclassify_passed<'a, I>(route_points: I, current_point_index: i32)
where
    I: IntoIterator<Item = &'a mut RoutePoint>,
{
    for route_point in route_points {
        route_point.is_passed = is_passed_at(route_point.order, current_point_index);
    }
}

/// Validar el patch y devolver la ruta resultante, sin persistir nada
pub fn apply_status_patch(route: &Route, patch: &RouteStatusPatch) -> AppResult<Route> {
    let mut next = route.clone();

    if let Some(passengers) = patch.current_passengers {
        if passengers < 0 {
            return Err(validation_error(
                "currentPassengers",
                "Passenger count must be greater than or equal to 0",
            ));
        }
        if passengers > route.max_capacity {
            return Err(AppError::CapacityExceeded {
                requested: passengers,
                max_capacity: route.max_capacity,
            });
        }
        next.current_passengers = passengers;
    }

    if let Some(index) = patch.current_point_index {
        if index < 0 {
            return Err(validation_error(
                "currentPointIndex",
                "Current point index must be greater than or equal to 0",
            ));
        }
        next.current_point_index = index;
    }

    if let Some(is_active) = patch.is_active {
        next.is_active = is_active;
    }

    Ok(next)
}

/// Motor que orquesta lectura, validación y escritura atómica del estado
pub struct RouteStatusEngine {
    store: SharedStore,
}

impl RouteStatusEngine {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Aplicar una actualización parcial de estado a la ruta.
    ///
    /// La autorización del llamante debe resolverse antes de invocar este método.
    pub async fn update_status(
        &self,
        route_id: Uuid,
        patch: RouteStatusPatch,
    ) -> AppResult<RouteDetail> {
        let route = self
            .store
            .find_route_by_id(route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        // Validación previa: un patch inválido nunca llega a escribir
        apply_status_patch(&route, &patch)?;

        let updated = self.store.apply_route_status(route_id, &patch).await?;

        info!(
            route_id = %route_id,
            bus_number = %updated.bus_number,
            current_passengers = ?patch.current_passengers,
            is_active = ?patch.is_active,
            current_point_index = ?patch.current_point_index,
            "🚌 Estado de ruta actualizado"
        );

        load_route_detail(self.store.as_ref(), updated).await
    }
}
