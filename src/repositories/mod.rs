//! Capa de persistencia
//!
//! `FleetStore` es el contrato que usan servicios y controladores. Hay dos
//! implementaciones: `PgFleetStore` (PostgreSQL vía sqlx) y `MemoryFleetStore`
//! (en memoria, para desarrollo sin base de datos y para tests).
//!
//! Las restricciones de unicidad (email, número de autobús, par ruta/parada,
//! par ruta/orden) se reportan como `AppError::Conflict` en ambas.

pub mod memory_store;
pub mod postgres_store;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    NewPoint, NewRoute, NewRoutePoint, NewUser, Point, PointPatch, Route, RoutePoint,
    RouteStatusPatch, RouteStop, User, UserRole,
};
use crate::utils::errors::AppResult;

pub use memory_store::MemoryFleetStore;
pub use postgres_store::PgFleetStore;

/// Store compartido entre handlers
pub type SharedStore = Arc<dyn FleetStore>;

#[async_trait]
pub trait FleetStore: Send + Sync {
    // Usuarios
    async fn create_user(&self, user: NewUser) -> AppResult<User>;
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn update_user_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>>;

    // Rutas
    async fn create_route(&self, route: NewRoute) -> AppResult<Route>;
    /// Todas las rutas, más recientes primero
    async fn list_routes(&self) -> AppResult<Vec<Route>>;
    async fn find_route_by_id(&self, id: Uuid) -> AppResult<Option<Route>>;
    async fn find_route_by_bus_number(&self, bus_number: &str) -> AppResult<Option<Route>>;
    async fn assign_driver(&self, route_id: Uuid, driver_id: Option<Uuid>)
        -> AppResult<Option<Route>>;

    /// Aplica una actualización de estado de forma atómica.
    ///
    /// Bloquea la ruta, revalida el patch contra el estado bloqueado, escribe
    /// los campos presentes y, si el patch trae `current_point_index`,
    /// reclasifica `is_passed` de todas sus paradas en la misma transacción.
    async fn apply_route_status(&self, route_id: Uuid, patch: &RouteStatusPatch)
        -> AppResult<Route>;

    // Paradas
    async fn create_point(&self, point: NewPoint) -> AppResult<Point>;
    /// Paradas activas ordenadas por nombre
    async fn list_active_points(&self) -> AppResult<Vec<Point>>;
    async fn find_point_by_id(&self, id: Uuid) -> AppResult<Option<Point>>;
    async fn update_point(&self, id: Uuid, patch: PointPatch) -> AppResult<Option<Point>>;

    // Asociaciones ruta/parada
    /// Paradas de una ruta ordenadas por `order` ascendente
    async fn list_route_stops(&self, route_id: Uuid) -> AppResult<Vec<RouteStop>>;
    async fn list_point_memberships(&self, point_id: Uuid) -> AppResult<Vec<RoutePoint>>;
    async fn find_route_point(&self, route_id: Uuid, point_id: Uuid)
        -> AppResult<Option<RoutePoint>>;
    async fn find_route_point_by_order(&self, route_id: Uuid, order: i32)
        -> AppResult<Option<RoutePoint>>;
    async fn max_route_point_order(&self, route_id: Uuid) -> AppResult<Option<i32>>;
    async fn insert_route_point(&self, route_point: NewRoutePoint) -> AppResult<RoutePoint>;
    /// `true` si existía y se borró
    async fn delete_route_point(&self, route_id: Uuid, point_id: Uuid) -> AppResult<bool>;
}
