//! Authentication endpoints and session bootstrap.

use tracing::warn;

use crate::api::types::{
    AuthResponse, ChangePasswordRequest, LoginCredentials, LogoutRequest, ProfileUpdate,
    RegisterRequest, User,
};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::SessionTokens;

/// `/api/auth/` endpoint group.
#[derive(Clone)]
pub struct AuthApi {
    http: ApiClient,
}

impl AuthApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// Log in and install the issued token pair as the active session.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.http.post("/api/auth/login/", credentials).await?;
        self.install_session(&response).await;
        Ok(response)
    }

    /// Register a new account. The backend issues tokens right away,
    /// so the new account is logged in on success.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.http.post("/api/auth/register/", request).await?;
        self.install_session(&response).await;
        Ok(response)
    }

    async fn install_session(&self, response: &AuthResponse) {
        self.http
            .session()
            .set_session(SessionTokens::new(
                response.tokens.access.clone(),
                response.tokens.refresh.clone(),
            ))
            .await;
    }

    /// Log out. The server-side blacklisting is best effort; the local
    /// session is dropped no matter what.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(refresh) = self.http.session().refresh_token().await {
            let request = LogoutRequest { refresh };
            if let Err(err) = self.http.post_unit("/api/auth/logout/", &request).await {
                warn!(
                    "Server-side logout failed, clearing local session anyway: {}",
                    err
                );
            }
        }
        self.http.session().clear().await;
        Ok(())
    }

    /// Profile of the logged-in user.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.http.get("/api/auth/me/").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.http.patch("/api/auth/me/", update).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), ApiError> {
        self.http
            .post_unit("/api/auth/change-password/", request)
            .await
    }
}

// ==================== Tests ====================
