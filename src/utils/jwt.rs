//! Utilidades JWT
//!
//! Tokens HS256 firmados con `JWT_SECRET`. El rol va en los claims sólo a
//! título informativo: el middleware vuelve a leer el usuario del store.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::environment::EnvironmentConfig,
    models::{User, UserRole},
    utils::errors::AppError,
};

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Generar JWT token para un usuario
pub fn generate_token(user: &User, config: &JwtConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = i64::try_from(config.expiration)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            AppError::Jwt(format!("Token expiration out of range: {}s", config.expiration))
        })?;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generating token: {}", e)))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Access token required".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Driver,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_generate_and_verify() {
        let user = user();
        let token = generate_token(&user, &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.role, UserRole::Driver);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_out_of_range_expiration_is_an_error() {
        let config = JwtConfig {
            expiration: u64::MAX,
            ..config()
        };
        assert!(matches!(generate_token(&user(), &config), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_token(&user(), &config()).unwrap();
        let other = JwtConfig {
            secret: "other".to_string(),
            expiration: 3600,
        };
        assert!(matches!(verify_token(&token, &other), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
