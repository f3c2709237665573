//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos.
//! Las funciones `validate_*` con firma `fn(&T) -> Result<(), ValidationError>`
//! se usan desde `#[validate(custom = "...")]` en los DTOs.

use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud mínima y máxima (sin contar espacios en los extremos)
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar latitud en [-90, 90]
pub fn validate_latitude(value: &Decimal) -> Result<(), ValidationError> {
    validate_range(*value, Decimal::from(-90), Decimal::from(90)).map_err(|mut error| {
        error.code = "latitude".into();
        error
    })
}

/// Validar longitud geográfica en [-180, 180]
pub fn validate_longitude(value: &Decimal) -> Result<(), ValidationError> {
    validate_range(*value, Decimal::from(-180), Decimal::from(180)).map_err(|mut error| {
        error.code = "longitude".into();
        error
    })
}

/// Validar nombre visible (rutas, paradas, usuarios): 2 a 100 caracteres
pub fn validate_display_name(value: &str) -> Result<(), ValidationError> {
    validate_not_empty(value)?;
    validate_length(value, 2, 100)
}
