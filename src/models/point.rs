//! Modelo de Point
//!
//! Paradas (waypoints) que pueden asociarse a una o varias rutas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Point - mapea exactamente a la tabla points
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Point {
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

/// Datos para insertar una parada
#[derive(Debug, Clone)]
pub struct NewPoint {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Actualización parcial de una parada
#[derive(Debug, Clone, Default)]
pub struct PointPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl PointPatch {
    /// Aplicar los campos presentes sobre una copia de la parada
    pub fn apply_to(&self, point: &Point) -> Point {
        Point {
            name: self.name.clone().unwrap_or_else(|| point.name.clone()),
            description: self.description.clone().or_else(|| point.description.clone()),
            address: self.address.clone().or_else(|| point.address.clone()),
            latitude: self.latitude.unwrap_or(point.latitude),
            longitude: self.longitude.unwrap_or(point.longitude),
            is_active: self.is_active.unwrap_or(point.is_active),
            ..point.clone()
        }
    }
}
