//! User profile model.

use serde::{Deserialize, Serialize};

use super::opaque_id;
use super::organization::OrganizationMembership;

/// Normalized user profile, as held in memory and persisted next to the
/// bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub organizations: Vec<OrganizationMembership>,
}

impl User {
    /// Name to greet the user with, falling back to the email's local part.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::organization::OrganizationRole;

    #[test]
    fn persisted_shape_is_camel_case() {
        let user = User {
            id: "u1".into(),
            email: "a@b.com".into(),
            name: Some("Ada".into()),
            organization_id: Some("org-1".into()),
            organizations: vec![OrganizationMembership {
                id: "org-1".into(),
                name: "UpSkillHub".into(),
                role: OrganizationRole::Member,
            }],
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["organizationId"], "org-1");
        assert_eq!(json["organizations"][0]["role"], "member");
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let user: User = serde_json::from_str(r#"{"id": 7, "email": "a@b.com"}"#).unwrap();
        assert_eq!(user.id, "7");
        assert!(user.organizations.is_empty());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let user: User = serde_json::from_str(r#"{"id": "1", "email": "ada@b.com"}"#).unwrap();
        assert_eq!(user.display_name(), "ada");
    }
}
