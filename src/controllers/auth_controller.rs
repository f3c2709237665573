use std::sync::Arc;

use validator::Validate;

use crate::dto::auth_dto::{
    AuthResponse, LoginRequest, PromoteRequest, RegisterRequest, UserEnvelope,
};
use crate::dto::ApiResponse;
use crate::models::AuthenticatedUser;
use crate::services::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct AuthController {
    auth: Arc<AuthService>,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> AppResult<ApiResponse<AuthResponse>> {
        request.validate()?;
        let session = self.auth.register(request.into()).await?;

        Ok(ApiResponse::success_with_message(
            session.into(),
            "User created successfully",
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<AuthResponse>> {
        request.validate()?;
        let session = self.auth.login(&request.email, &request.password).await?;

        Ok(ApiResponse::success_with_message(
            session.into(),
            "Login successful",
        ))
    }

    pub async fn promote(&self, request: PromoteRequest) -> AppResult<ApiResponse<UserEnvelope>> {
        request.validate()?;
        let user = self
            .auth
            .promote_to_admin(request.user_id, &request.admin_key)
            .await?;

        Ok(ApiResponse::success_with_message(
            user.into(),
            "User promoted to administrator successfully",
        ))
    }

    pub async fn profile(&self, caller: &AuthenticatedUser) -> AppResult<ApiResponse<UserEnvelope>> {
        let user = self.auth.profile(caller.id).await?;
        Ok(ApiResponse::success(user.into()))
    }
}
