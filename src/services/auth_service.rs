//! Servicio de autenticación
//!
//! Registro, login, promoción a administrador y perfil. Las contraseñas se
//! guardan con bcrypt; los tokens se firman con `utils::jwt`.

use bcrypt::{hash, verify};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{NewUser, User, UserRole};
use crate::repositories::SharedStore;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

/// Coste de bcrypt para los hashes nuevos
pub const BCRYPT_COST: u32 = 10;

/// Datos de registro ya validados por el DTO
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub admin_key: Option<String>,
}

/// Usuario autenticado junto con su token
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub struct AuthService {
    store: SharedStore,
    jwt: JwtConfig,
    admin_key: Option<String>,
}

impl AuthService {
    pub fn new(store: SharedStore, jwt: JwtConfig, admin_key: Option<String>) -> Self {
        Self {
            store,
            jwt,
            admin_key,
        }
    }

    /// Registrar un usuario; la clave de administrador correcta otorga el rol admin
    pub async fn register(&self, registration: Registration) -> AppResult<Session> {
        let email = normalize_email(&registration.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already in use".to_string()));
        }

        let role = match registration.admin_key.as_deref() {
            Some(key) if self.is_admin_key(key) => UserRole::Admin,
            _ => UserRole::Driver,
        };

        let password_hash =
            hash(&registration.password, BCRYPT_COST).map_err(|e| AppError::Hash(e.to_string()))?;

        let user = self
            .store
            .create_user(NewUser {
                name: registration.name.trim().to_string(),
                email,
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %user.id, role = user.role.as_str(), "✅ Usuario registrado");

        let token = generate_token(&user, &self.jwt)?;
        Ok(Session { user, token })
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .store
            .find_user_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid)?;

        if !user.is_active {
            warn!(user_id = %user.id, "🚫 Login de cuenta desactivada");
            return Err(AppError::Unauthorized("Account is deactivated".to_string()));
        }

        let valid =
            verify(password, &user.password_hash).map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            return Err(invalid());
        }

        info!(user_id = %user.id, "🔐 Login correcto");
        let token = generate_token(&user, &self.jwt)?;
        Ok(Session { user, token })
    }

    pub async fn promote_to_admin(&self, user_id: Uuid, admin_key: &str) -> AppResult<User> {
        if !self.is_admin_key(admin_key) {
            return Err(AppError::Forbidden("Invalid administrator key".to_string()));
        }

        let user = self
            .store
            .update_user_role(user_id, UserRole::Admin)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, "⬆️ Usuario promovido a administrador");
        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn is_admin_key(&self, candidate: &str) -> bool {
        matches!(&self.admin_key, Some(key) if !key.is_empty() && key == candidate)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::repositories::MemoryFleetStore;
    use crate::utils::jwt::verify_token;

    fn service() -> AuthService {
        let store: SharedStore = Arc::new(MemoryFleetStore::new());
        AuthService::new(
            store,
            JwtConfig {
                secret: "test-secret".to_string(),
                expiration: 3600,
            },
            Some("chave-admin".to_string()),
        )
    }

    fn registration(email: &str, admin_key: Option<&str>) -> Registration {
        Registration {
            name: "Carlos Lima".to_string(),
            email: email.to_string(),
            password: "segredo123".to_string(),
            admin_key: admin_key.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_register_roles() {
        let service = service();

        let driver = service.register(registration("driver@example.com", None)).await.unwrap();
        assert_eq!(driver.user.role, UserRole::Driver);

        let wrong_key = service
            .register(registration("other@example.com", Some("errada")))
            .await
            .unwrap();
        assert_eq!(wrong_key.user.role, UserRole::Driver);

        let admin = service
            .register(registration("admin@example.com", Some("chave-admin")))
            .await
            .unwrap();
        assert_eq!(admin.user.role, UserRole::Admin);

        let claims = verify_token(&admin.token, &service.jwt).unwrap();
        assert_eq!(claims.sub, admin.user.id);
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let service = service();
        service.register(registration("dup@example.com", None)).await.unwrap();

        let again = service.register(registration("DUP@example.com", None)).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login() {
        let service = service();
        service.register(registration("login@example.com", None)).await.unwrap();

        assert!(service.login("login@example.com", "segredo123").await.is_ok());
        assert!(matches!(
            service.login("login@example.com", "errada").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            service.login("nobody@example.com", "segredo123").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_promote_to_admin() {
        let service = service();
        let session = service.register(registration("p@example.com", None)).await.unwrap();

        assert!(matches!(
            service.promote_to_admin(session.user.id, "errada").await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.promote_to_admin(Uuid::new_v4(), "chave-admin").await,
            Err(AppError::NotFound(_))
        ));

        let promoted = service
            .promote_to_admin(session.user.id, "chave-admin")
            .await
            .unwrap();
        assert_eq!(promoted.role, UserRole::Admin);
    }
}
