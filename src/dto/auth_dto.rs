use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{User, UserRole};
use crate::services::auth_service::{Registration, Session};
use crate::utils::validation::validate_display_name;

// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom = "validate_display_name")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 255))]
    pub password: String,
    pub admin_key: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
            admin_key: request.admin_key,
        }
    }
}

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PromoteRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1))]
    pub admin_key: String,
}

// Usuario sin el hash de la contraseña
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

impl From<User> for UserEnvelope {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Maria Silva",
            "email": "maria@example.com",
            "password": "segredo"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "M",
            "email": "not-an-email",
            "password": "123"
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_user_response_hides_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            role: UserRole::Driver,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "driver");
        assert_eq!(json["isActive"], true);
    }
}
