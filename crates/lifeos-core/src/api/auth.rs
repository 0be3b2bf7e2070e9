use async_trait::async_trait;
use tracing::info;

use super::HttpBackend;
use crate::error::CoreError;
use crate::models::{LoginRequest, LoginResponse, MessageResponse};

#[async_trait]
impl super::AuthApi for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, CoreError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.client().post("/api/auth/login", &request).await?;
        info!(user = %response.username, "logged in");
        Ok(response)
    }

    async fn refresh(&self) -> Result<bool, CoreError> {
        Ok(self.client().refresh_session().await)
    }

    async fn logout(&self) -> Result<(), CoreError> {
        let result: Result<MessageResponse, CoreError> =
            self.client().post("/api/auth/logout", &serde_json::json!({})).await;
        // cookies are dropped locally even when the backend call fails
        self.client().session().clear();
        result.map(|_| ())
    }
}
