use uuid::Uuid;

use crate::models::{AuthenticatedUser, Route};
use crate::repositories::FleetStore;
use crate::utils::errors::{forbidden_error, AppError, AppResult};

/// Resultado de una decisión de autorización
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(AccessGrant),
    Deny(DenyReason),
}

/// Motivo por el que se concede el acceso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGrant {
    /// Los administradores pueden modificar cualquier ruta
    Admin,
    /// Conductor asignado a la ruta
    RouteOwner,
}

/// Motivo por el que se deniega el acceso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    InactiveAccount,
    RouteNotFound,
    NotRouteOwner,
}

impl AccessDecision {
    /// Convertir la decisión en un resultado consumible con `?`
    pub fn into_result(self) -> AppResult<AccessGrant> {
        match self {
            AccessDecision::Allow(grant) => Ok(grant),
            AccessDecision::Deny(DenyReason::InactiveAccount) => {
                Err(AppError::Unauthorized("User not found or inactive".to_string()))
            }
            AccessDecision::Deny(DenyReason::RouteNotFound) => {
                Err(AppError::NotFound("Route not found".to_string()))
            }
            AccessDecision::Deny(DenyReason::NotRouteOwner) => Err(forbidden_error(
                "modify route",
                "drivers can only modify their own routes",
            )),
        }
    }
}

/// Decisión pura sobre una ruta ya consultada (o ausente)
pub fn decide(caller: &AuthenticatedUser, route: Option<&Route>) -> AccessDecision {
    if !caller.is_active {
        return AccessDecision::Deny(DenyReason::InactiveAccount);
    }

    if caller.is_admin() {
        return AccessDecision::Allow(AccessGrant::Admin);
    }

    match route {
        None => AccessDecision::Deny(DenyReason::RouteNotFound),
        Some(route) if route.driver_id == Some(caller.id) => {
            AccessDecision::Allow(AccessGrant::RouteOwner)
        }
        Some(_) => AccessDecision::Deny(DenyReason::NotRouteOwner),
    }
}

/// Decidir si el llamante puede modificar la ruta; sin efectos secundarios.
///
/// Los administradores no requieren consultar la ruta.
pub async fn authorize(
    store: &dyn FleetStore,
    caller: &AuthenticatedUser,
    route_id: Uuid,
) -> AppResult<AccessDecision> {
    if !caller.is_active || caller.is_admin() {
        return Ok(decide(caller, None));
    }

    let route = store.find_route_by_id(route_id).await?;
    Ok(decide(caller, route.as_ref()))
}

/// Puerta de acceso exclusiva para administradores
pub fn require_admin(caller: &AuthenticatedUser) -> AppResult<()> {
    if !caller.is_active {
        return Err(AppError::Unauthorized("User not found or inactive".to_string()));
    }
    if !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Access denied. Only administrators can access this resource".to_string(),
        ));
    }
    Ok(())
}
