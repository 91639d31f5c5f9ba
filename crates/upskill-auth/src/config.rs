//! Authentication configuration.

/// Configuration for the client session layer.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Organization sent with every sign-up/sign-in request
    /// (default: `UpSkillHub`).
    pub default_organization_name: String,
    /// Storage key holding the raw bearer token.
    pub token_key: String,
    /// Storage key holding the JSON-serialized user profile.
    pub user_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_organization_name: "UpSkillHub".into(),
            token_key: "auth_token".into(),
            user_key: "auth_user".into(),
        }
    }
}
