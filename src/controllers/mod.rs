pub mod auth_controller;
pub mod point_controller;
pub mod public_controller;
pub mod route_controller;
