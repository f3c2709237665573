//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen un valor por defecto razonable para desarrollo;
//! `JWT_SECRET` es obligatorio en producción.

use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Secreto usado solo cuando `JWT_SECRET` falta fuera de producción
const DEVELOPMENT_JWT_SECRET: &str = "development-only-jwt-secret-change-me";

/// Duración máxima de un token: un año
pub const MAX_JWT_EXPIRATION: u64 = 365 * 24 * 60 * 60;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    /// Duración del token en segundos
    pub jwt_expiration: u64,
    /// Clave para registrar o promover administradores; sin ella nadie puede hacerse admin
    pub admin_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    /// Ventana del rate limiting en segundos
    pub rate_limit_window: u64,
    /// Tomar la IP de `x-forwarded-for` (sólo detrás de un proxy de confianza)
    pub trust_proxy: bool,
    pub seed_demo_data: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            jwt_expiration: 86_400,
            admin_key: None,
            cors_origins: vec!["*".to_string()],
            rate_limit_requests: 100,
            rate_limit_window: 900,
            trust_proxy: false,
            seed_demo_data: false,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "production" => {
                return Err(ConfigError::Missing("JWT_SECRET"));
            }
            _ => {
                warn!("⚠️ JWT_SECRET no definido, usando secreto de desarrollo");
                defaults.jwt_secret
            }
        };

        Ok(Self {
            port: parse_or("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration: check_jwt_expiration(parse_or(
                "JWT_EXPIRATION",
                defaults.jwt_expiration,
            )?)?,
            admin_key: env::var("ADMIN_KEY").ok().filter(|k| !k.trim().is_empty()),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests)?,
            rate_limit_window: parse_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window)?,
            trust_proxy: parse_or("TRUST_PROXY", defaults.trust_proxy)?,
            seed_demo_data: parse_or("SEED_DEMO_DATA", defaults.seed_demo_data)?,
            environment,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CORS permisivo cuando no hay orígenes o se usa `*`
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Errores al cargar la configuración
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn check_jwt_expiration(seconds: u64) -> Result<u64, ConfigError> {
    if seconds == 0 || seconds > MAX_JWT_EXPIRATION {
        return Err(ConfigError::Invalid {
            key: "JWT_EXPIRATION",
            reason: format!("must be between 1 and {} seconds", MAX_JWT_EXPIRATION),
        });
    }
    Ok(seconds)
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => {
            info!("{} no definido, usando valor por defecto: {}", key, default);
            Ok(default)
        }
    }
}
