use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::gateway::{ApiGateway, GatewayError};
use crate::models::{AuthUser, LoginResponse};

/// Login, identity, and password operations against `/auth/*`.
pub struct AuthApi {
    gateway: Arc<ApiGateway>,
}

impl AuthApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Authenticates and persists the bearer token in the session store, so
    /// every subsequent request on this gateway goes out authenticated.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, GatewayError> {
        let response: LoginResponse = self
            .gateway
            .post("/auth/login", &json!({ "email": email, "password": password }))
            .await?;

        self.gateway.session().set_token(&response.token);
        info!("logged in as {} ({})", response.user.email, response.user.role);
        Ok(response.user)
    }

    pub async fn me(&self) -> Result<AuthUser, GatewayError> {
        self.gateway.get("/auth/me").await
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), GatewayError> {
        let _: serde_json::Value = self
            .gateway
            .put(
                "/auth/change-password",
                &json!({ "currentPassword": current, "newPassword": new }),
            )
            .await?;
        Ok(())
    }

    /// Drops the stored token. Purely local; the backend keeps no session
    /// state to revoke. Returns whether a token was present.
    pub fn logout(&self) -> bool {
        let had_token = self.gateway.session().clear();
        if had_token {
            info!("logged out");
        }
        had_token
    }
}
