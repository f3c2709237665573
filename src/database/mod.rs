//! Módulo de base de datos
//!
//! Selección del store y datos de demostración

pub mod connection;
pub mod seed;

pub use connection::connect_store;
pub use seed::seed_demo_data;
