//! Request/response shapes of the remote auth service.

use serde::{Deserialize, Serialize};

use super::organization::{OrganizationMembership, OrganizationRole, OrganizationSummary};
use super::{opaque_id, opaque_id_opt};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub organization_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    pub organization_name: String,
}

/// User record as the auth service returns it, before normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opaque_id_opt")]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub role: Option<OrganizationRole>,
    #[serde(default)]
    pub organizations: Vec<OrganizationMembership>,
}

/// `{token, user, organization?}`; sign-in omits `organization`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
    #[serde(default)]
    pub organization: Option<OrganizationSummary>,
}
