//! Utilidades del sistema
//!
//! Manejo de errores, extractores, validación y JWT.

pub mod errors;
pub mod extract;
pub mod jwt;
pub mod validation;
