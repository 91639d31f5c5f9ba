//! Organization membership model.
//!
//! Every account belongs to at least one organization; learners signing
//! up through the storefront land in the platform's default one.

use serde::{Deserialize, Serialize};

use super::{opaque_id, opaque_id_opt};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationRole {
    Owner,
    Admin,
    Instructor,
    Member,
    #[serde(other)]
    Unknown,
}

/// One `{id, name, role}` entry of a user's membership list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationMembership {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    pub role: OrganizationRole,
}

/// Organization as returned next to a freshly created account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationSummary {
    #[serde(default, deserialize_with = "opaque_id_opt")]
    pub id: Option<String>,
    pub name: String,
}
