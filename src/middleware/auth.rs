//! Middleware de autenticación JWT
//!
//! Resuelve el bearer token en un `AuthenticatedUser` y lo inyecta en las
//! extensions. El usuario se vuelve a leer del store en cada request, así que
//! un cambio de rol o una desactivación se aplican sin esperar a que caduque
//! el token.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::{
    models::AuthenticatedUser,
    services::authorization_service::require_admin,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Access token required".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt)?;

    let user = state
        .store
        .find_user_by_id(claims.sub)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| AppError::Unauthorized("User not found or inactive".to_string()))?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(&user));

    Ok(next.run(request).await)
}

/// Middleware que sólo deja pasar administradores; va detrás de `auth_middleware`
pub async fn admin_only_middleware(
    Extension(caller): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_admin(&caller)?;
    Ok(next.run(request).await)
}
