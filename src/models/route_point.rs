//! Asociación ordenada ruta → parada
//!
//! Cada fila guarda el orden de la parada en la ruta, el tiempo estimado
//! y si el autobús ya pasó por ella. `is_passed` sólo lo modifica el motor
//! de estado de rutas.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::point::Point;

/// RoutePoint - mapea a la tabla route_points (`order` se guarda como `sort_order`)
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RoutePoint {
    pub id: Uuid,
    pub route_id: Uuid,
    pub point_id: Uuid,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    /// Minutos estimados hasta la parada
    pub estimated_time: Option<i32>,
    pub is_passed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar una asociación
#[derive(Debug, Clone)]
pub struct NewRoutePoint {
    pub route_id: Uuid,
    pub point_id: Uuid,
    pub order: i32,
    pub estimated_time: Option<i32>,
}

/// Asociación junto con los datos de su parada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    pub route_point: RoutePoint,
    pub point: Point,
}

impl RouteStop {
    pub fn order(&self) -> i32 {
        self.route_point.order
    }
}
