//! Services module
//!
//! Lógica de negocio de la aplicación. Los servicios reciben el store
//! compartido y devuelven `AppResult`, sin conocer HTTP.

pub mod auth_service;
pub mod authorization_service;
pub mod point_service;
pub mod public_view_service;
pub mod route_point_service;
pub mod route_service;
pub mod route_status_service;

pub use auth_service::AuthService;
pub use point_service::PointService;
pub use route_point_service::RoutePointService;
pub use route_service::RouteService;
pub use route_status_service::RouteStatusEngine;
