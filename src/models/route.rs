//! Modelo de Route
//!
//! Una ruta de autobús con su estado operativo: activa/inactiva, pasajeros
//! actuales, capacidad máxima, índice de la parada actual y conductor asignado.
//!
//! Invariante: `current_passengers <= max_capacity` en toda mutación.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Capacidad usada cuando la ruta se crea sin `maxCapacity`
pub const DEFAULT_MAX_CAPACITY: i32 = 50;

/// Route - mapea exactamente a la tabla routes
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub bus_number: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub current_passengers: i32,
    pub max_capacity: i32,
    pub current_point_index: i32,
    pub driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar una ruta
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub name: String,
    pub bus_number: String,
    pub description: Option<String>,
    pub max_capacity: i32,
    pub driver_id: Option<Uuid>,
}

/// Actualización parcial de estado; los campos `None` no se tocan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStatusPatch {
    pub current_passengers: Option<i32>,
    pub is_active: Option<bool>,
    pub current_point_index: Option<i32>,
}
