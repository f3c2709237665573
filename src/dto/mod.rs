//! Formas JSON de requests y responses

pub mod api_response;
pub mod auth_dto;
pub mod point_dto;
pub mod public_dto;
pub mod route_dto;

pub use api_response::ApiResponse;
