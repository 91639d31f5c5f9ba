//! HTTP implementation of [`AuthApi`].

use upskill_core::api::AuthApi;
use upskill_core::error::UpskillResult;
use upskill_core::models::auth::{AuthResponse, SignInRequest, SignUpRequest};

use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: ApiClient,
}

impl HttpAuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl AuthApi for HttpAuthApi {
    async fn sign_up(&self, input: SignUpRequest) -> UpskillResult<AuthResponse> {
        self.client.post(&["auth", "signup"], &input, None).await
    }

    async fn sign_in(&self, input: SignInRequest) -> UpskillResult<AuthResponse> {
        self.client.post(&["auth", "login"], &input, None).await
    }
}
