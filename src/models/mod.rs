//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL (ver `migrations/`).

pub mod auth;
pub mod point;
pub mod route;
pub mod route_point;
pub mod user;

pub use auth::AuthenticatedUser;
pub use point::{NewPoint, Point, PointPatch};
pub use route::{NewRoute, Route, RouteStatusPatch, DEFAULT_MAX_CAPACITY};
pub use route_point::{NewRoutePoint, RoutePoint, RouteStop};
pub use user::{NewUser, User, UserRole};
