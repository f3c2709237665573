//! Bus Fleet Status
//!
//! API de estado de flota de autobús: ocupación, parada actual y siguiente,
//! gestión de rutas y paradas, con vista pública por número de autobús.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
